//! List documents in index order

use anyhow::Result;

use crate::content::DocumentSummary;
use crate::Docs;

/// Print the document index
pub fn run(docs: &Docs, json: bool) -> Result<()> {
    let documents = docs.loader().list_documents()?;
    print!("{}", format_documents(&documents, json)?);
    Ok(())
}

/// Format listed documents as text lines or a JSON array
pub fn format_documents(documents: &[DocumentSummary], json: bool) -> Result<String> {
    if json {
        let mut out = serde_json::to_string_pretty(documents)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = format!("Documents ({}):\n", documents.len());
    for document in documents {
        let date = document
            .front_matter
            .date()
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".to_string());
        out.push_str(&format!(
            "  {} - {} [{}]\n",
            date,
            document.title(),
            document.slug
        ));
    }
    Ok(out)
}
