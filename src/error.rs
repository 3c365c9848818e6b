//! Error types for the documentation content pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while listing or loading documents
///
/// Front-matter and markdown problems are never reported here: both
/// degrade to best-effort output instead.
#[derive(Error, Debug)]
pub enum DocsError {
    /// The document store root is missing or cannot be read
    #[error("Document store unavailable at {path:?}: {source}")]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The slug passed validation but no `<slug>.md` exists in the store
    #[error("Document not found: {slug}")]
    DocumentNotFound { slug: String },

    /// The slug failed path-safety validation and was never resolved
    #[error("Invalid slug: {slug:?}")]
    InvalidSlug { slug: String },
}

impl DocsError {
    /// Whether the error should surface as a "not found" page.
    ///
    /// Invalid slugs are client errors and are reported the same way as
    /// missing documents.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DocsError::DocumentNotFound { .. } | DocsError::InvalidSlug { .. }
        )
    }
}

/// Result alias for pipeline operations
pub type DocsResult<T> = std::result::Result<T, DocsError>;
