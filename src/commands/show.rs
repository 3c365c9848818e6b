//! Show a single document

use anyhow::Result;

use crate::content::DocumentDetail;
use crate::Docs;

/// Print a document's front matter and body, or its rendered HTML
pub fn run(docs: &Docs, slug: &str, html: bool) -> Result<()> {
    let document = docs.loader().load_document(slug)?;

    if html {
        let body = docs
            .markdown_renderer()
            .render_html(&document.content, &docs.config.render);
        print!("{}", body);
    } else {
        print!("{}", format_document(&document));
    }

    Ok(())
}

/// Front-matter fields one per line, a blank line, then the body
pub fn format_document(document: &DocumentDetail) -> String {
    let mut out = format!("slug: {}\n", document.slug);
    for (key, value) in document.front_matter.iter() {
        out.push_str(&format!("{}: {}\n", key, value));
    }
    out.push('\n');
    out.push_str(&document.content);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
