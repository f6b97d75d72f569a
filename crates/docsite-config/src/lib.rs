//! Site configuration for docsite.
//!
//! Parses `docsite.toml` with serde, loads the sidebar declaration it points
//! to, and assembles both into a validated [`SiteConfiguration`] for the
//! rendering engine.
//!
//! Loading and assembly are separate steps: [`Config::load`] does all file
//! I/O, while [`Config::assemble`] is a pure function of the loaded values and
//! an environment snapshot (see [`env_snapshot`]).
//!
//! ## Deployment selection
//!
//! The `[deployment]` section names an environment flag (`VERCEL` by
//! default). When the flag is exactly `1` or `true` the primary profile is
//! used, otherwise the secondary one.
//!
//! ```toml
//! [deployment]
//! flag = "VERCEL"
//!
//! [deployment.primary]
//! url = "https://soltix-docs.vercel.app"
//! base_url = "/"
//!
//! [deployment.secondary]
//! url = "https://guentoan.github.io"
//! base_url = "/soltix-docs/"
//! ```

mod deployment;
mod error;
mod site;

use std::collections::{BTreeSet, HashMap};
use std::hash::BuildHasher;
use std::path::{Path, PathBuf};

use docsite_sidebar::{RawSidebarFile, RawSidebarItem};
use serde::Deserialize;

pub use deployment::{
    DEFAULT_FLAG, DeploymentProfile, DeploymentTargets, ProfileName, TRUTHY_VALUES, env_snapshot,
    resolve,
};
pub use error::{ConfigError, ConfigurationError};
pub use site::{
    BrokenLinkPolicy, ColorModes, DEFAULT_SIDEBAR_ID, DOCS_ROUTE, I18nSettings, Logo,
    NavbarPosition, NavbarSettings, SiteAssembler, SiteConfiguration, SiteIdentity, ThemeSettings, assemble,
};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docsite.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override sidebar file path.
    pub sidebar_path: Option<PathBuf>,
    /// Override broken link policy.
    pub on_broken_links: Option<String>,
}

/// Contents of `docsite.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site identity.
    pub site: SiteSection,
    /// Deployment profiles.
    pub deployment: DeploymentSection,
    /// Presentation theme.
    pub theme: ThemeSection,
    /// Locales.
    pub i18n: I18nSection,
    /// Navigation bar.
    pub navbar: NavbarSection,
    /// Broken link handling.
    pub links: LinksSection,
    /// Sidebar file location.
    pub sidebar: SidebarSection,

    /// Sidebar entries read from the sidebar file (set after loading).
    #[serde(skip)]
    pub sidebar_items: Vec<RawSidebarItem>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
    /// Resolved sidebar file path (set after loading).
    #[serde(skip)]
    pub sidebar_path: Option<PathBuf>,
}

/// `[site]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    pub title: String,
    pub tagline: String,
    pub organization_name: String,
    pub project_name: String,
    pub favicon: Option<String>,
    pub edit_url: Option<String>,
    /// Social card image.
    pub image: Option<String>,
}

/// `[deployment]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeploymentSection {
    /// Environment flag selecting the primary profile.
    pub flag: String,
    pub primary: ProfileSection,
    pub secondary: ProfileSection,
}

impl Default for DeploymentSection {
    fn default() -> Self {
        let targets = DeploymentTargets::default();
        let section = |name| {
            let profile = targets.profile(name);
            ProfileSection {
                url: profile.url.clone(),
                base_url: profile.base_url.clone(),
            }
        };
        Self {
            flag: targets.flag().to_owned(),
            primary: section(ProfileName::PrimaryHost),
            secondary: section(ProfileName::SecondaryHost),
        }
    }
}

/// `[deployment.primary]` / `[deployment.secondary]`.
#[derive(Debug, Deserialize)]
pub struct ProfileSection {
    pub url: String,
    pub base_url: String,
}

/// `[theme]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ThemeSection {
    pub syntax_languages: Vec<String>,
    pub light: String,
    pub dark: String,
}

impl Default for ThemeSection {
    fn default() -> Self {
        let modes = ColorModes::default();
        Self {
            syntax_languages: Vec::new(),
            light: modes.light,
            dark: modes.dark,
        }
    }
}

/// `[i18n]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct I18nSection {
    pub default_locale: String,
    pub locales: Vec<String>,
}

impl Default for I18nSection {
    fn default() -> Self {
        let i18n = I18nSettings::default();
        Self {
            default_locale: i18n.default_locale,
            locales: i18n.locales,
        }
    }
}

/// `[navbar]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NavbarSection {
    pub title: Option<String>,
    pub sidebar_label: Option<String>,
    pub sidebar_position: Option<NavbarPosition>,
    pub logo: Option<LogoSection>,
}

/// `[navbar.logo]` section.
#[derive(Debug, Deserialize)]
pub struct LogoSection {
    pub alt: String,
    pub src: String,
    pub href: Option<String>,
    pub target: Option<String>,
}

/// `[links]` section.
///
/// Values are kept as raw strings so that unrecognized policies are reported
/// by assembly with the offending value. Unknown keys are rejected so a
/// misspelled policy key cannot fall back to the default.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinksSection {
    pub on_broken_links: String,
    pub on_broken_markdown_links: Option<String>,
}

impl Default for LinksSection {
    fn default() -> Self {
        Self {
            on_broken_links: "fail".to_owned(),
            on_broken_markdown_links: None,
        }
    }
}

/// `[sidebar]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SidebarSection {
    /// Sidebar file, relative to the config file.
    pub path: String,
    /// Sidebar id to select from a file of named sidebars.
    pub id: String,
}

impl Default for SidebarSection {
    fn default() -> Self {
        Self {
            path: "sidebars.json".to_owned(),
            id: DEFAULT_SIDEBAR_ID.to_owned(),
        }
    }
}

impl Config {
    /// Load configuration and the sidebar file it references.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docsite.toml` in current directory and parents.
    ///
    /// # Errors
    ///
    /// Returns error if the config file cannot be found or parsed, or if the
    /// sidebar file cannot be read.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => path.to_path_buf(),
            None => Self::discover_config()
                .ok_or_else(|| ConfigError::NotFound(PathBuf::from(CONFIG_FILENAME)))?,
        };

        let mut config = Self::parse_file(&path)?;

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        let sidebar_path = config.sidebar_path.clone().unwrap_or_else(|| {
            path.parent()
                .unwrap_or(Path::new("."))
                .join(&config.sidebar.path)
        });
        config.sidebar_items = load_sidebar(&sidebar_path, &config.sidebar.id)?;
        config.sidebar_path = Some(sidebar_path);
        config.config_path = Some(path);

        Ok(config)
    }

    /// Parse a config file without loading the sidebar.
    fn parse_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Parsed configuration file");
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(sidebar_path) = &settings.sidebar_path {
            self.sidebar_path = Some(sidebar_path.clone());
        }
        if let Some(policy) = &settings.on_broken_links {
            self.links.on_broken_links.clone_from(policy);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        discover_from(&current)
    }

    /// Site identity from the `[site]` section.
    pub fn identity(&self) -> SiteIdentity {
        SiteIdentity {
            title: self.site.title.clone(),
            tagline: self.site.tagline.clone(),
            organization_name: self.site.organization_name.clone(),
            project_name: self.site.project_name.clone(),
            favicon: self.site.favicon.clone(),
            edit_url: self.site.edit_url.clone(),
            image: self.site.image.clone(),
        }
    }

    /// Theme settings from the `[theme]` section.
    pub fn theme(&self) -> ThemeSettings {
        ThemeSettings {
            syntax_languages: self.theme.syntax_languages.iter().cloned().collect::<BTreeSet<_>>(),
            color_modes: ColorModes {
                light: self.theme.light.clone(),
                dark: self.theme.dark.clone(),
            },
        }
    }

    /// Assembler configured from the non-identity sections.
    pub fn assembler(&self) -> Result<SiteAssembler, ConfigurationError> {
        let targets = DeploymentTargets::new(
            self.deployment.flag.clone(),
            (
                self.deployment.primary.url.clone(),
                self.deployment.primary.base_url.clone(),
            ),
            (
                self.deployment.secondary.url.clone(),
                self.deployment.secondary.base_url.clone(),
            ),
        )?;

        let navbar = NavbarSettings {
            title: self.navbar.title.clone(),
            logo: self.navbar.logo.as_ref().map(|logo| Logo {
                alt: logo.alt.clone(),
                src: logo.src.clone(),
                href: logo.href.clone(),
                target: logo.target.clone(),
            }),
            sidebar_label: self
                .navbar
                .sidebar_label
                .clone()
                .unwrap_or_else(|| NavbarSettings::default().sidebar_label),
            sidebar_position: self.navbar.sidebar_position.unwrap_or_default(),
        };

        let mut assembler = SiteAssembler::new()
            .with_targets(targets)
            .with_i18n(I18nSettings {
                default_locale: self.i18n.default_locale.clone(),
                locales: self.i18n.locales.clone(),
            })
            .with_navbar(navbar)
            .with_sidebar_id(self.sidebar.id.clone());
        if let Some(policy) = &self.links.on_broken_markdown_links {
            assembler = assembler.with_markdown_link_policy(policy.clone());
        }
        Ok(assembler)
    }

    /// Assemble the site configuration for the given environment.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn assemble<S: BuildHasher>(
        &self,
        env: &HashMap<String, String, S>,
    ) -> Result<SiteConfiguration, ConfigurationError> {
        self.assembler()?.assemble(
            self.identity(),
            env,
            &self.sidebar_items,
            self.theme(),
            &self.links.on_broken_links,
        )
    }
}

/// Walk up from `start` looking for the config file.
fn discover_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Read and select the sidebar entries from a JSON or YAML file.
fn load_sidebar(path: &Path, id: &str) -> Result<Vec<RawSidebarItem>, ConfigError> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
    let content = std::fs::read_to_string(path)?;

    let file: RawSidebarFile = match extension {
        "json" => docsite_sidebar::parse_json(&content).map_err(|source| ConfigError::SidebarJson {
            path: path.to_path_buf(),
            source,
        })?,
        "yaml" | "yml" => {
            docsite_sidebar::parse_yaml(&content).map_err(|source| ConfigError::SidebarYaml {
                path: path.to_path_buf(),
                source,
            })?
        }
        _ => return Err(ConfigError::UnsupportedSidebarFormat(path.to_path_buf())),
    };

    let items = file.select(id).ok_or_else(|| ConfigError::MissingSidebar {
        id: id.to_owned(),
        path: path.to_path_buf(),
    })?;
    tracing::debug!(path = %path.display(), entries = items.len(), "Loaded sidebar declaration");
    Ok(items)
}
