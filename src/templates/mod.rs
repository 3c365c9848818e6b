//! Built-in documentation page templates using the Tera template engine
//!
//! Templates are embedded directly in the binary.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

/// Template renderer with the embedded documentation templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Autoescaping would mangle URLs; templates escape front-matter text explicitly
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("docs/layout.html")),
            ("index.html", include_str!("docs/index.html")),
            ("document.html", include_str!("docs/document.html")),
            ("not_found.html", include_str!("docs/not_found.html")),
        ])?;

        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Tera filter: format an ISO date string
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "YYYY-MM-DD".to_string(),
    };

    // "LL" is the long form, e.g. "May 30, 2023"
    if format == "LL" {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
            return Ok(tera::Value::String(date.format("%B %-d, %Y").to_string()));
        }
    }

    Ok(tera::Value::String(s))
}

// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub docs_url: String,
}

/// `<head>` metadata of a page
#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub keywords: String,
}

/// One entry of the documentation index
#[derive(Debug, Clone, Serialize)]
pub struct DocumentCard {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    /// `YYYY-MM-DD`, when the document has a parsable date
    pub date: Option<String>,
    pub banner_image: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentData {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    /// Rendered HTML body
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteData {
        SiteData {
            title: "Docs & More".to_string(),
            description: String::new(),
            docs_url: "/docs/".to_string(),
        }
    }

    #[test]
    fn test_render_index() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::new();
        context.insert(
            "page",
            &PageMeta {
                title: "Docs".to_string(),
                description: "All docs".to_string(),
                keywords: "docs".to_string(),
            },
        );
        context.insert("site", &site());
        context.insert(
            "documents",
            &vec![DocumentCard {
                slug: "intro".to_string(),
                title: "<Intro>".to_string(),
                description: None,
                date: Some("2023-05-30".to_string()),
                banner_image: None,
                url: "/docs/structure/intro/".to_string(),
            }],
        );

        let html = renderer.render("index.html", &context).unwrap();
        assert!(html.contains("<title>Docs</title>"));
        assert!(html.contains("Docs &amp; More"));
        assert!(html.contains(r#"href="/docs/structure/intro/""#));
        assert!(html.contains("&lt;Intro&gt;"));
        assert!(html.contains("May 30, 2023"));
        assert!(!html.contains("No documents yet."));
    }

    #[test]
    fn test_truncate_chars_filter() {
        let mut args = HashMap::new();
        args.insert("length".to_string(), tera::Value::from(5));
        let value = truncate_chars_filter(&tera::Value::from("hello world"), &args).unwrap();
        assert_eq!(value, tera::Value::from("hello..."));
    }
}
