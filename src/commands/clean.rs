//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Docs;

/// Remove the generated pages
pub fn run(docs: &Docs) -> Result<()> {
    if docs.public_dir.exists() {
        fs::remove_dir_all(&docs.public_dir)?;
        tracing::info!("Deleted: {:?}", docs.public_dir);
    } else {
        tracing::debug!("Nothing to clean at {:?}", docs.public_dir);
    }

    Ok(())
}
