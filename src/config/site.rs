//! Site configuration (_config.yml)

use anyhow::Result;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::content::RenderOverrides;

/// Everything except RFC 3986 unreserved characters
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    /// Base keywords; each detail page appends its own title
    pub keywords: Vec<String>,

    // URL
    pub url: String,
    pub root: String,
    pub docs_path: String,
    pub structure_path: String,

    // Directory
    pub docs_dir: String,
    pub public_dir: String,

    // Rendering
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub render: RenderOverrides,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "OpenLiquid Documentation".to_string(),
            description: "Documentation for the OpenLiquid open-source algorithmic trading project"
                .to_string(),
            keywords: [
                "openliquid",
                "orbit",
                "roadmap",
                "documentation",
                "docs",
                "finance",
                "algorithms",
                "quant",
                "quantitative",
                "python",
                "finance documentation",
                "finance api",
                "open source finance",
            ]
            .into_iter()
            .map(String::from)
            .collect(),

            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),
            docs_path: "docs".to_string(),
            structure_path: "docs/structure".to_string(),

            docs_dir: "markdown_docs".to_string(),
            public_dir: "public".to_string(),

            highlight: HighlightConfig::default(),
            render: RenderOverrides::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Site-relative URL of the documentation index
    pub fn docs_url(&self) -> String {
        self.url_for(&format!("{}/", self.docs_path.trim_matches('/')))
    }

    /// Site-relative URL of a document's detail page
    pub fn document_url(&self, slug: &str) -> String {
        let encoded = utf8_percent_encode(slug, PATH_SEGMENT).to_string();
        self.url_for(&format!(
            "{}/{}/",
            self.structure_path.trim_matches('/'),
            encoded
        ))
    }

    /// Prefix a path with the site root
    pub fn url_for(&self, path: &str) -> String {
        let root = self.root.trim_end_matches('/');
        let path = path.trim_start_matches('/');

        if path.is_empty() {
            format!("{}/", root)
        } else {
            format!("{}/{}", root, path)
        }
    }

    /// Meta keywords for a page, base keywords first
    pub fn keywords_with(&self, extra: &str) -> String {
        let mut keywords = self.keywords.clone();
        if !extra.is_empty() {
            keywords.push(extra.to_string());
        }
        keywords.join(",")
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Every code block is highlighted as this language
    pub language: String,
    /// A syntect default theme name
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            language: "python".to_string(),
            theme: "InspiredGitHub".to_string(),
        }
    }
}
