//! `docsite landing` command implementation.

use std::path::PathBuf;

use clap::Args;
use docsite_landing::{LandingPage, default_features};

use super::{ConfigArgs, write_output};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the landing command.
#[derive(Args)]
pub(crate) struct LandingArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Write the HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl LandingArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let site = self.config.assemble()?;
        let start_href = site.sidebar().first_doc().map(|id| site.doc_url(id));
        let page = LandingPage::new(site.identity(), default_features(), start_href);

        write_output(self.output.as_ref(), &page.render_html())?;

        if let Some(path) = &self.output {
            Output::new().success(&format!("Landing page written to {}", path.display()));
        }
        Ok(())
    }
}
