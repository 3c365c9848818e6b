//! Content loader - lists and loads documents from a document store

use std::cmp::Reverse;

use super::store::DocumentStore;
use super::{slug, DocumentDetail, DocumentSummary, FrontMatter};
use crate::error::{DocsError, DocsResult};

/// Loads documents from a store
///
/// Every call re-reads the store; nothing is cached between calls.
pub struct ContentLoader<S> {
    store: S,
}

impl<S: DocumentStore> ContentLoader<S> {
    /// Create a new content loader
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// List every document, newest first
    ///
    /// All-or-nothing: any store failure fails the whole listing.
    pub fn list_documents(&self) -> DocsResult<Vec<DocumentSummary>> {
        let mut documents = Vec::new();

        for name in self.store.list_entries()? {
            let Some(slug) = slug::slug_from_entry(&name) else {
                tracing::debug!("Skipping non-markdown entry {:?}", name);
                continue;
            };

            // Listing a slug the loader would refuse breaks static path generation
            if let Err(e) = slug::validate(slug) {
                tracing::warn!("Skipping {:?}: {}", name, e);
                continue;
            }

            let raw = self
                .store
                .read_entry(&name)?
                .ok_or_else(|| DocsError::DocumentNotFound {
                    slug: slug.to_string(),
                })?;
            let (front_matter, _) = FrontMatter::parse(&raw);

            documents.push(DocumentSummary {
                slug: slug.to_string(),
                front_matter,
            });
        }

        sort_documents(&mut documents);
        tracing::debug!("Listed {} documents", documents.len());

        Ok(documents)
    }

    /// Load one document by slug
    pub fn load_document(&self, slug: &str) -> DocsResult<DocumentDetail> {
        let name = slug::entry_for_slug(slug)?;

        let raw = self
            .store
            .read_entry(&name)?
            .ok_or_else(|| DocsError::DocumentNotFound {
                slug: slug.to_string(),
            })?;
        let (front_matter, content) = FrontMatter::parse(&raw);

        Ok(DocumentDetail {
            slug: slug.to_string(),
            front_matter,
            content: content.to_string(),
        })
    }

    /// Slugs to pre-generate one page each for
    pub fn static_slugs(&self) -> DocsResult<Vec<String>> {
        Ok(self
            .list_documents()?
            .into_iter()
            .map(|document| document.slug)
            .collect())
    }
}

/// Sort by date descending, undated last, ties by slug ascending
pub fn sort_documents(documents: &mut [DocumentSummary]) {
    documents.sort_by_cached_key(|document| {
        (Reverse(document.front_matter.date()), document.slug.clone())
    });
}
