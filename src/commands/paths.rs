//! Print the static detail page paths

use anyhow::Result;

use crate::Docs;

/// Print one detail page URL per listed document
pub fn run(docs: &Docs) -> Result<()> {
    for url in detail_paths(docs)? {
        println!("{}", url);
    }
    Ok(())
}

/// Detail page URLs, in index order
pub fn detail_paths(docs: &Docs) -> Result<Vec<String>> {
    let slugs = docs.loader().static_slugs()?;
    Ok(slugs
        .iter()
        .map(|slug| docs.config.document_url(slug))
        .collect())
}
