//! Site configuration assembly.
//!
//! [`SiteAssembler`] combines the deployment profile selected from the
//! environment, the validated sidebar tree and the presentation settings
//! into a single [`SiteConfiguration`]. Assembly is all-or-nothing: the
//! first violated invariant is returned and no partial configuration is
//! ever produced.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::BuildHasher;

use docsite_sidebar::{RawSidebarItem, Sidebar};
use serde::{Deserialize, Serialize};

use crate::deployment::{DeploymentProfile, DeploymentTargets};
use crate::error::ConfigurationError;

/// Default id of the documentation sidebar.
pub const DEFAULT_SIDEBAR_ID: &str = "docsSidebar";

/// Route prefix under which documents are served.
pub const DOCS_ROUTE: &str = "docs";

/// Who the site is and what it is called.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteIdentity {
    pub title: String,
    pub tagline: String,
    pub organization_name: String,
    pub project_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    /// Base URL for "edit this page" links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_url: Option<String>,
    /// Social card image used in link previews.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl SiteIdentity {
    fn validate(&self) -> Result<(), ConfigurationError> {
        require_non_empty(&self.title, "site.title")?;
        require_non_empty(&self.tagline, "site.tagline")?;
        if let Some(edit_url) = &self.edit_url {
            require_http_url(edit_url, "site.edit_url")?;
        }
        Ok(())
    }
}

/// Light and dark code highlighting themes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ColorModes {
    pub light: String,
    pub dark: String,
}

impl Default for ColorModes {
    fn default() -> Self {
        Self {
            light: "github".to_owned(),
            dark: "dracula".to_owned(),
        }
    }
}

/// Presentation settings passed through to the rendering engine unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSettings {
    /// Extra languages for syntax highlighting.
    pub syntax_languages: BTreeSet<String>,
    pub color_modes: ColorModes,
}

/// Locale settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct I18nSettings {
    pub default_locale: String,
    pub locales: Vec<String>,
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            default_locale: "en".to_owned(),
            locales: vec!["en".to_owned()],
        }
    }
}

impl I18nSettings {
    fn validate(&self) -> Result<(), ConfigurationError> {
        require_non_empty(&self.default_locale, "i18n.default_locale")?;
        if !self.locales.contains(&self.default_locale) {
            return Err(ConfigurationError::UnknownDefaultLocale(
                self.default_locale.clone(),
            ));
        }
        Ok(())
    }
}

/// Navbar logo.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Logo {
    pub alt: String,
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Link target for `href`, e.g. `_blank`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// Side of the navbar an entry is placed on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavbarPosition {
    #[default]
    Left,
    Right,
}

/// Top navigation bar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavbarSettings {
    /// Navbar title; the site title is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<Logo>,
    /// Label of the navbar entry that opens the sidebar.
    pub sidebar_label: String,
    /// Placement of the sidebar entry.
    pub sidebar_position: NavbarPosition,
}

impl Default for NavbarSettings {
    fn default() -> Self {
        Self {
            title: None,
            logo: None,
            sidebar_label: "Documentation".to_owned(),
            sidebar_position: NavbarPosition::default(),
        }
    }
}

/// What the rendering engine does when a link target does not exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BrokenLinkPolicy {
    /// Abort the build.
    Fail,
    /// Log a warning and continue.
    Warn,
}

impl BrokenLinkPolicy {
    /// Parse a policy token for `field`.
    ///
    /// Accepts `fail` (or its alias `throw`) and `warn`. Any other value is
    /// rejected rather than defaulted.
    pub fn parse(value: &str, field: &'static str) -> Result<Self, ConfigurationError> {
        match value {
            "fail" | "throw" => Ok(Self::Fail),
            "warn" => Ok(Self::Warn),
            _ => Err(ConfigurationError::UnrecognizedPolicy {
                field,
                value: value.to_owned(),
            }),
        }
    }
}

impl fmt::Display for BrokenLinkPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fail => f.write_str("fail"),
            Self::Warn => f.write_str("warn"),
        }
    }
}

/// Fully validated site configuration for one build.
///
/// Fields are read-only; a configuration can only be obtained through
/// [`SiteAssembler::assemble`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfiguration {
    identity: SiteIdentity,
    deployment: DeploymentProfile,
    sidebar_id: String,
    sidebar: Sidebar,
    theme: ThemeSettings,
    i18n: I18nSettings,
    navbar: NavbarSettings,
    broken_link_policy: BrokenLinkPolicy,
    markdown_link_policy: BrokenLinkPolicy,
}

impl SiteConfiguration {
    pub fn identity(&self) -> &SiteIdentity {
        &self.identity
    }

    pub fn deployment(&self) -> &DeploymentProfile {
        &self.deployment
    }

    pub fn sidebar_id(&self) -> &str {
        &self.sidebar_id
    }

    pub fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    pub fn theme(&self) -> &ThemeSettings {
        &self.theme
    }

    pub fn i18n(&self) -> &I18nSettings {
        &self.i18n
    }

    pub fn navbar(&self) -> &NavbarSettings {
        &self.navbar
    }

    /// Policy for links between documents.
    pub fn broken_link_policy(&self) -> BrokenLinkPolicy {
        self.broken_link_policy
    }

    /// Policy for markdown links to files that do not exist.
    pub fn markdown_link_policy(&self) -> BrokenLinkPolicy {
        self.markdown_link_policy
    }

    /// Site-relative URL of a document, including the base path.
    pub fn doc_url(&self, id: &str) -> String {
        format!("{}{DOCS_ROUTE}/{id}", self.deployment.base_url)
    }
}

/// Builds [`SiteConfiguration`]s.
///
/// The defaults match the documentation site this repository ships;
/// override them with the `with_*` methods.
#[derive(Clone, Debug)]
pub struct SiteAssembler {
    targets: DeploymentTargets,
    i18n: I18nSettings,
    navbar: NavbarSettings,
    sidebar_id: String,
    markdown_link_policy: Option<String>,
}

impl Default for SiteAssembler {
    fn default() -> Self {
        Self {
            targets: DeploymentTargets::default(),
            i18n: I18nSettings::default(),
            navbar: NavbarSettings::default(),
            sidebar_id: DEFAULT_SIDEBAR_ID.to_owned(),
            markdown_link_policy: None,
        }
    }
}

impl SiteAssembler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_targets(mut self, targets: DeploymentTargets) -> Self {
        self.targets = targets;
        self
    }

    #[must_use]
    pub fn with_i18n(mut self, i18n: I18nSettings) -> Self {
        self.i18n = i18n;
        self
    }

    #[must_use]
    pub fn with_navbar(mut self, navbar: NavbarSettings) -> Self {
        self.navbar = navbar;
        self
    }

    #[must_use]
    pub fn with_sidebar_id(mut self, id: impl Into<String>) -> Self {
        self.sidebar_id = id.into();
        self
    }

    /// Policy token for markdown file links. Defaults to `warn`.
    #[must_use]
    pub fn with_markdown_link_policy(mut self, policy: impl Into<String>) -> Self {
        self.markdown_link_policy = Some(policy.into());
        self
    }

    /// Validate everything and produce the configuration.
    ///
    /// Checks run in order: identity, link policies, locales, sidebar id,
    /// sidebar tree. The deployment profile is resolved last and cannot
    /// fail.
    pub fn assemble<S: BuildHasher>(
        &self,
        identity: SiteIdentity,
        env: &HashMap<String, String, S>,
        sidebar: &[RawSidebarItem],
        theme: ThemeSettings,
        broken_link_policy: &str,
    ) -> Result<SiteConfiguration, ConfigurationError> {
        identity.validate()?;

        let broken_link_policy = BrokenLinkPolicy::parse(broken_link_policy, "links.on_broken_links")?;
        let markdown_link_policy = match &self.markdown_link_policy {
            Some(value) => BrokenLinkPolicy::parse(value, "links.on_broken_markdown_links")?,
            None => BrokenLinkPolicy::Warn,
        };

        self.i18n.validate()?;
        require_non_empty(&self.sidebar_id, "sidebar.id")?;
        let sidebar = docsite_sidebar::build(sidebar)?;

        let deployment = self.targets.resolve(env);

        tracing::info!(
            title = %identity.title,
            profile = %deployment.name,
            docs = sidebar.doc_count(),
            "Assembled site configuration"
        );

        Ok(SiteConfiguration {
            identity,
            deployment,
            sidebar_id: self.sidebar_id.clone(),
            sidebar,
            theme,
            i18n: self.i18n.clone(),
            navbar: self.navbar.clone(),
            broken_link_policy,
            markdown_link_policy,
        })
    }
}

/// Assemble with the default deployment targets and settings.
pub fn assemble<S: BuildHasher>(
    identity: SiteIdentity,
    env: &HashMap<String, String, S>,
    sidebar: &[RawSidebarItem],
    theme: ThemeSettings,
    broken_link_policy: &str,
) -> Result<SiteConfiguration, ConfigurationError> {
    SiteAssembler::default().assemble(identity, env, sidebar, theme, broken_link_policy)
}

fn require_non_empty(value: &str, field: &'static str) -> Result<(), ConfigurationError> {
    if value.trim().is_empty() {
        return Err(ConfigurationError::EmptyField(field));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &'static str) -> Result<(), ConfigurationError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigurationError::InvalidUrl {
            field,
            value: url.to_owned(),
        });
    }
    Ok(())
}
