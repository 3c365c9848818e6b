//! Generator module - writes the static documentation pages

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tera::Context;

use crate::config::SiteConfig;
use crate::content::{DocumentDetail, DocumentSummary, MarkdownRenderer};
use crate::templates::{DocumentCard, DocumentData, PageMeta, SiteData, TemplateRenderer};
use crate::Docs;

/// Renders full HTML pages from pipeline output
///
/// Shared by the static generator and the server so both produce the
/// same markup.
pub struct PageRenderer {
    config: SiteConfig,
    templates: TemplateRenderer,
    markdown: MarkdownRenderer,
}

impl PageRenderer {
    pub fn new(docs: &Docs) -> Result<Self> {
        Ok(Self {
            config: docs.config.clone(),
            templates: TemplateRenderer::new()?,
            markdown: docs.markdown_renderer(),
        })
    }

    /// The documentation index page
    pub fn index_page(&self, documents: &[DocumentSummary]) -> Result<String> {
        let cards: Vec<DocumentCard> = documents
            .iter()
            .map(|document| DocumentCard {
                slug: document.slug.clone(),
                title: document.title().to_string(),
                description: document.front_matter.description().map(str::to_string),
                date: document
                    .front_matter
                    .date()
                    .map(|date| date.format("%Y-%m-%d").to_string()),
                banner_image: document.front_matter.banner_image().map(str::to_string),
                url: self.config.document_url(&document.slug),
            })
            .collect();

        let mut context = self.base_context(PageMeta {
            title: self.config.title.clone(),
            description: self.config.description.clone(),
            keywords: self.config.keywords_with(""),
        });
        context.insert("documents", &cards);

        self.templates.render("index.html", &context)
    }

    /// A document's detail page
    pub fn document_page(&self, document: &DocumentDetail) -> Result<String> {
        let title = document.title().to_string();
        let description = document.front_matter.description().map(str::to_string);
        let content = self
            .markdown
            .render_html(&document.content, &self.config.render);

        let mut context = self.base_context(PageMeta {
            title: title.clone(),
            description: description.clone().unwrap_or_default(),
            keywords: self.config.keywords_with(&title),
        });
        context.insert(
            "document",
            &DocumentData {
                slug: document.slug.clone(),
                title,
                description,
                content,
            },
        );

        self.templates.render("document.html", &context)
    }

    /// The page served for unknown or invalid slugs
    pub fn not_found_page(&self) -> Result<String> {
        let context = self.base_context(PageMeta {
            title: "404: This page could not be found".to_string(),
            description: self.config.description.clone(),
            keywords: self.config.keywords_with(""),
        });
        self.templates.render("not_found.html", &context)
    }

    fn base_context(&self, page: PageMeta) -> Context {
        let mut context = Context::new();
        context.insert("page", &page);
        context.insert(
            "site",
            &SiteData {
                title: self.config.title.clone(),
                description: self.config.description.clone(),
                docs_url: self.config.docs_url(),
            },
        );
        context
    }
}

/// Static page generator
pub struct Generator {
    docs: Docs,
    pages: PageRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(docs: &Docs) -> Result<Self> {
        Ok(Self {
            docs: docs.clone(),
            pages: PageRenderer::new(docs)?,
        })
    }

    /// Generate the index and one page per document
    ///
    /// Returns the number of document pages written. Any pipeline error
    /// aborts generation.
    pub fn generate(&self) -> Result<usize> {
        let loader = self.docs.loader();
        let documents = loader.list_documents()?;

        let index_dir = self.output_dir(&self.docs.config.docs_path);
        fs::create_dir_all(&index_dir)?;
        fs::write(index_dir.join("index.html"), self.pages.index_page(&documents)?)?;
        tracing::debug!("Generated index at {:?}", index_dir);

        let structure_dir = self.output_dir(&self.docs.config.structure_path);
        for summary in &documents {
            let document = loader.load_document(&summary.slug)?;
            let page_dir = structure_dir.join(&document.slug);
            fs::create_dir_all(&page_dir)?;
            fs::write(page_dir.join("index.html"), self.pages.document_page(&document)?)?;
            tracing::debug!("Generated {:?}", page_dir);
        }

        Ok(documents.len())
    }

    fn output_dir(&self, site_path: &str) -> PathBuf {
        site_path
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(self.docs.public_dir.clone(), |dir, part| dir.join(part))
    }
}
