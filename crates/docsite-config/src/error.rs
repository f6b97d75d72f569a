//! Error types.

use std::path::PathBuf;

use docsite_sidebar::StructuralError;

use crate::deployment::ProfileName;

/// Invalid site settings detected while assembling a [`SiteConfiguration`].
///
/// [`SiteConfiguration`]: crate::SiteConfiguration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// Malformed sidebar declaration.
    #[error("Invalid sidebar: {0}")]
    Sidebar(#[from] StructuralError),
    /// Required field is empty.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
    /// Broken link policy is not one of the recognized values.
    #[error("Unrecognized policy \"{value}\" for {field} (expected \"fail\" or \"warn\")")]
    UnrecognizedPolicy { field: &'static str, value: String },
    /// Deployment profile violates its invariants.
    #[error("Invalid {profile} deployment profile: {reason}")]
    InvalidDeployment { profile: ProfileName, reason: String },
    /// URL field without an http(s) scheme.
    #[error("{field} must start with http:// or https://, got \"{value}\"")]
    InvalidUrl { field: &'static str, value: String },
    /// Default locale missing from the locale list.
    #[error("i18n.default_locale \"{0}\" is not listed in i18n.locales")]
    UnknownDefaultLocale(String),
}

/// Error loading configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// JSON sidebar parsing error.
    #[error("Sidebar JSON parse error in {}: {source}", path.display())]
    SidebarJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// YAML sidebar parsing error.
    #[error("Sidebar YAML parse error in {}: {source}", path.display())]
    SidebarYaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    /// Sidebar file extension is neither JSON nor YAML.
    #[error("Unsupported sidebar file format: {} (expected .json, .yaml or .yml)", .0.display())]
    UnsupportedSidebarFormat(PathBuf),
    /// Named sidebar file without the configured sidebar id.
    #[error("Sidebar \"{id}\" not found in {}", path.display())]
    MissingSidebar { id: String, path: PathBuf },
    /// Settings failed validation.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}
