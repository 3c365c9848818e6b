//! Slug derivation and validation
//!
//! The index builder and the single-document loader both go through this
//! module, so a slug listed by one is always accepted by the other.

use crate::error::{DocsError, DocsResult};

/// Extension carried by every document in the store
pub const MARKDOWN_EXTENSION: &str = ".md";

/// Derive a slug from a store entry name
///
/// Returns `None` for entries that are not markdown documents.
pub fn slug_from_entry(name: &str) -> Option<&str> {
    name.strip_suffix(MARKDOWN_EXTENSION)
}

/// Map a validated slug back to its store entry name
pub fn entry_for_slug(slug: &str) -> DocsResult<String> {
    validate(slug)?;
    Ok(format!("{}{}", slug, MARKDOWN_EXTENSION))
}

/// Reject slugs that could escape the store when joined to its root
pub fn validate(slug: &str) -> DocsResult<()> {
    let unsafe_slug = slug.is_empty()
        || slug.chars().all(|c| c == '.')
        || slug.contains("..")
        || slug.chars().any(|c| matches!(c, '/' | '\\' | ':' | '\0'));

    if unsafe_slug {
        return Err(DocsError::InvalidSlug {
            slug: slug.to_string(),
        });
    }
    Ok(())
}
