//! `docsite export` command implementation.

use std::path::PathBuf;

use clap::Args;

use super::{ConfigArgs, write_output};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the export command.
#[derive(Args)]
pub(crate) struct ExportArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Write the JSON to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ExportArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let site = self.config.assemble()?;
        let json = serde_json::to_string_pretty(&site)?;

        write_output(self.output.as_ref(), &json)?;

        if let Some(path) = &self.output {
            Output::new().success(&format!("Site configuration written to {}", path.display()));
        }
        Ok(())
    }
}
