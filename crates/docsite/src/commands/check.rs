//! `docsite check` command implementation.

use clap::Args;

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    config: ConfigArgs,
}

impl CheckArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let site = self.config.assemble()?;

        let deployment = site.deployment();
        let sidebar = site.sidebar();

        output.highlight(&site.identity().title);
        output.info(&format!(
            "Deployment: {} ({})",
            deployment.name,
            deployment.site_root()
        ));
        output.info(&format!(
            "Sidebar: {} ({} documents, depth {})",
            site.sidebar_id(),
            sidebar.doc_count(),
            sidebar.depth()
        ));
        output.info(&format!(
            "Broken links: {} (markdown links: {})",
            site.broken_link_policy(),
            site.markdown_link_policy()
        ));
        output.success("Configuration is valid");
        Ok(())
    }
}
