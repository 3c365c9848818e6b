//! Document models

use serde::Serialize;

use super::FrontMatter;

/// A listed document: enough to link to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    /// URL-safe identifier, the file name without `.md`
    pub slug: String,
    pub front_matter: FrontMatter,
}

/// A loaded document for its detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDetail {
    pub slug: String,
    pub front_matter: FrontMatter,
    /// Markdown body following the front-matter, unrendered
    pub content: String,
}

impl DocumentSummary {
    /// Title for display, falling back to the slug
    pub fn title(&self) -> &str {
        self.front_matter.title().unwrap_or(&self.slug)
    }
}

impl DocumentDetail {
    /// Title for display, falling back to the slug
    pub fn title(&self) -> &str {
        self.front_matter.title().unwrap_or(&self.slug)
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            slug: self.slug.clone(),
            front_matter: self.front_matter.clone(),
        }
    }
}
