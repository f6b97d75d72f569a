//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod export;
pub(crate) mod landing;

use std::path::PathBuf;

use clap::Args;
use docsite_config::{CliSettings, Config, SiteConfiguration, env_snapshot};

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use export::ExportArgs;
pub(crate) use landing::LandingArgs;

/// Options shared by every command that assembles the site configuration.
#[derive(Args, Debug, Default)]
pub(crate) struct ConfigArgs {
    /// Path to configuration file (default: auto-discover docsite.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sidebar file (overrides config).
    #[arg(long)]
    sidebar: Option<PathBuf>,

    /// Broken link policy: fail or warn (overrides config).
    #[arg(long, env = "DOCSITE_ON_BROKEN_LINKS")]
    on_broken_links: Option<String>,
}

impl ConfigArgs {
    /// Load the config files and assemble against the process environment.
    pub(crate) fn assemble(&self) -> Result<SiteConfiguration, CliError> {
        let cli_settings = CliSettings {
            sidebar_path: self.sidebar.clone(),
            on_broken_links: self.on_broken_links.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::debug!(config_path = ?config.config_path, "Loaded configuration");
        Ok(config.assemble(&env_snapshot())?)
    }
}

/// Write `content` to `path`, or to stdout when `path` is `None`.
pub(crate) fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), CliError> {
    use std::io::Write;

    match path {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{content}")?;
        }
    }
    Ok(())
}
