//! openliquid-docs: the OpenLiquid documentation content pipeline
//!
//! Discovers markdown documents in a document store, parses their
//! front-matter, orders them for listing, and renders them through an
//! explicit override table. A small generator and server turn the results
//! into the `/docs` pages of the site.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::Path;

pub use error::{DocsError, DocsResult};

/// The documentation site application
#[derive(Debug, Clone)]
pub struct Docs {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Document store directory
    pub docs_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Docs {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let docs_dir = base_dir.join(&config.docs_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            docs_dir,
            public_dir,
        }
    }

    /// The document store backing this site
    pub fn store(&self) -> content::FsStore {
        content::FsStore::new(&self.docs_dir)
    }

    /// A loader over the document store
    pub fn loader(&self) -> content::ContentLoader<content::FsStore> {
        content::ContentLoader::new(self.store())
    }

    /// A markdown renderer using the configured highlighting
    pub fn markdown_renderer(&self) -> content::MarkdownRenderer {
        content::MarkdownRenderer::with_options(
            &self.config.highlight.language,
            &self.config.highlight.theme,
        )
    }

    /// Generate the static pages
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
