//! Landing page for the documentation site.
//!
//! Builds the homepage presentation tree (hero banner and feature columns)
//! from the site identity, and renders it as an HTML fragment the rendering
//! engine wraps in its page layout.

use std::fmt::Write;

use docsite_config::SiteIdentity;
use serde::Serialize;

/// A feature column on the landing page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub title: String,
    pub description: String,
}

impl Feature {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Features shown on the homepage.
pub fn default_features() -> Vec<Feature> {
    vec![
        Feature::new(
            "🚀 High Performance",
            "Handles 10K+ writes/sec and sub-100ms query latency with optimized columnar \
             storage and adaptive compression (Gorilla, Delta, Dictionary).",
        ),
        Feature::new(
            "📊 Multi-Level Aggregation",
            "Pre-computed 1h/1d/1mo/1y aggregates for lightning-fast analytics queries \
             across any time range.",
        ),
        Feature::new(
            "🔄 Horizontally Scalable",
            "Add storage nodes to scale linearly with device-based sharding via \
             coordinator and consistent hashing.",
        ),
    ]
}

/// Call-to-action button in the hero banner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CallToAction {
    pub text: String,
    pub href: String,
}

/// Hero banner at the top of the page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<CallToAction>,
}

/// Homepage presentation tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingPage {
    /// Document `<title>`.
    pub page_title: String,
    /// Meta description.
    pub description: String,
    pub hero: Hero,
    pub features: Vec<Feature>,
}

impl LandingPage {
    /// Compose the landing page.
    ///
    /// `start_href` is the target of the "Get Started" button; the button is
    /// omitted when it is `None`.
    pub fn new(identity: &SiteIdentity, features: Vec<Feature>, start_href: Option<String>) -> Self {
        Self {
            page_title: format!("{} - Documentation", identity.title),
            description: format!("Documentation for {} - {}", identity.title, identity.tagline),
            hero: Hero {
                title: identity.title.clone(),
                subtitle: identity.tagline.clone(),
                action: start_href.map(|href| CallToAction {
                    text: "Get Started →".to_owned(),
                    href,
                }),
            },
            features,
        }
    }

    /// Render the page body as an HTML fragment.
    pub fn render_html(&self) -> String {
        let mut html = String::with_capacity(2048);

        html.push_str("<header class=\"hero hero--primary\">\n");
        html.push_str("<div class=\"container\">\n");
        let _ = writeln!(html, "<h1 class=\"hero__title\">{}</h1>", escape(&self.hero.title));
        let _ = writeln!(
            html,
            "<p class=\"hero__subtitle\">{}</p>",
            escape(&self.hero.subtitle)
        );
        if let Some(action) = &self.hero.action {
            let _ = writeln!(
                html,
                "<div class=\"buttons\"><a class=\"button button--secondary button--lg\" href=\"{}\">{}</a></div>",
                escape(&action.href),
                escape(&action.text)
            );
        }
        html.push_str("</div>\n</header>\n");

        html.push_str("<main>\n");
        if !self.features.is_empty() {
            html.push_str("<section class=\"features\">\n<div class=\"container\">\n<div class=\"row\">\n");
            for feature in &self.features {
                render_feature(&mut html, feature);
            }
            html.push_str("</div>\n</div>\n</section>\n");
        }
        html.push_str("</main>");
        html
    }
}

fn render_feature(html: &mut String, feature: &Feature) {
    html.push_str("<div class=\"col col--4\">\n");
    html.push_str("<div class=\"text--center padding-horiz--md\">\n");
    let _ = writeln!(html, "<h3>{}</h3>", escape(&feature.title));
    let _ = writeln!(html, "<p>{}</p>", escape(&feature.description));
    html.push_str("</div>\n</div>\n");
}

/// Escape HTML special characters.
fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
