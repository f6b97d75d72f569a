//! Deployment profile selection from build-time environment variables.

use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;

use serde::Serialize;

use crate::error::ConfigurationError;

/// Values of the deployment flag that select the primary host.
///
/// Matched exactly; anything else (including `"TRUE"` or `"yes"`) is falsy.
pub const TRUTHY_VALUES: [&str; 2] = ["1", "true"];

/// Default environment flag checked by [`DeploymentTargets::resolve`].
pub const DEFAULT_FLAG: &str = "VERCEL";

/// Named deployment profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileName {
    PrimaryHost,
    SecondaryHost,
}

impl fmt::Display for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrimaryHost => f.write_str("primary-host"),
            Self::SecondaryHost => f.write_str("secondary-host"),
        }
    }
}

/// Where the built site is served from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentProfile {
    /// Which profile this is.
    pub name: ProfileName,
    /// Absolute site origin, e.g. `https://example.github.io`.
    pub url: String,
    /// Path the site is served under; starts and ends with `/`.
    pub base_url: String,
}

impl DeploymentProfile {
    /// Check the profile invariants.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let invalid = |reason: &str| ConfigurationError::InvalidDeployment {
            profile: self.name,
            reason: reason.to_owned(),
        };

        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(invalid("url must start with http:// or https://"));
        }
        if self.url.ends_with('/') {
            return Err(invalid("url must not end with '/'"));
        }
        if !self.base_url.starts_with('/') || !self.base_url.ends_with('/') {
            return Err(invalid("base_url must start and end with '/'"));
        }
        Ok(())
    }

    /// Absolute URL of the site root (`url` joined with `base_url`).
    pub fn site_root(&self) -> String {
        format!("{}{}", self.url, self.base_url)
    }
}

/// The two deployment profiles and the flag that chooses between them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentTargets {
    flag: String,
    primary: DeploymentProfile,
    secondary: DeploymentProfile,
}

impl Default for DeploymentTargets {
    fn default() -> Self {
        Self {
            flag: DEFAULT_FLAG.to_owned(),
            primary: DeploymentProfile {
                name: ProfileName::PrimaryHost,
                url: "https://soltix-docs.vercel.app".to_owned(),
                base_url: "/".to_owned(),
            },
            secondary: DeploymentProfile {
                name: ProfileName::SecondaryHost,
                url: "https://guentoan.github.io".to_owned(),
                base_url: "/soltix-docs/".to_owned(),
            },
        }
    }
}

impl DeploymentTargets {
    /// Build validated targets.
    ///
    /// `primary` is used when `flag` is set to a truthy value, `secondary`
    /// otherwise.
    pub fn new(
        flag: impl Into<String>,
        primary: (String, String),
        secondary: (String, String),
    ) -> Result<Self, ConfigurationError> {
        let flag = flag.into();
        if flag.trim().is_empty() {
            return Err(ConfigurationError::EmptyField("deployment.flag"));
        }

        let targets = Self {
            flag,
            primary: DeploymentProfile {
                name: ProfileName::PrimaryHost,
                url: primary.0,
                base_url: primary.1,
            },
            secondary: DeploymentProfile {
                name: ProfileName::SecondaryHost,
                url: secondary.0,
                base_url: secondary.1,
            },
        };
        targets.primary.validate()?;
        targets.secondary.validate()?;
        Ok(targets)
    }

    /// Name of the environment flag.
    pub fn flag(&self) -> &str {
        &self.flag
    }

    /// Profile by name.
    pub fn profile(&self, name: ProfileName) -> &DeploymentProfile {
        match name {
            ProfileName::PrimaryHost => &self.primary,
            ProfileName::SecondaryHost => &self.secondary,
        }
    }

    /// Select the active profile from an environment snapshot.
    ///
    /// Never fails: a missing or unrecognized flag value selects the
    /// secondary host.
    pub fn resolve<S: BuildHasher>(&self, env: &HashMap<String, String, S>) -> DeploymentProfile {
        let value = env.get(&self.flag).map(String::as_str);
        let name = if value.is_some_and(is_truthy) {
            ProfileName::PrimaryHost
        } else {
            ProfileName::SecondaryHost
        };
        tracing::debug!(flag = %self.flag, ?value, profile = %name, "Resolved deployment profile");
        self.profile(name).clone()
    }
}

/// Select a profile using the default targets.
pub fn resolve<S: BuildHasher>(env: &HashMap<String, String, S>) -> DeploymentProfile {
    DeploymentTargets::default().resolve(env)
}

/// Snapshot of the process environment.
///
/// Variables whose name or value is not valid UTF-8 are skipped.
pub fn env_snapshot() -> HashMap<String, String> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

fn is_truthy(value: &str) -> bool {
    TRUTHY_VALUES.contains(&value)
}
