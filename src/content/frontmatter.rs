//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Front-matter metadata of a document
///
/// A flat mapping of producer-defined keys to string values. Consumers
/// coerce values themselves (see [`FrontMatter::date`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrontMatter {
    fields: IndexMap<String, String>,
}

/// Serialization format of a front-matter block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Toml,
    Json,
}

/// Opening fence of a block and the line that closes it
struct Fence {
    format: Format,
    close: &'static str,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    ///
    /// Never fails: a missing, unterminated or malformed block yields an
    /// empty mapping and the original text.
    pub fn parse(raw: &str) -> (Self, &str) {
        let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);

        let Some((fence, rest)) = opening_fence(text) else {
            return (FrontMatter::default(), raw);
        };

        let Some((block, body)) = split_block(rest, &fence) else {
            tracing::debug!("Unterminated front-matter block, treating as content");
            return (FrontMatter::default(), raw);
        };
        let body = body.trim_start_matches(['\n', '\r']);

        if block.trim().is_empty() {
            return (FrontMatter::default(), body);
        }

        // A `---` pair around prose is a pair of thematic breaks, not YAML
        if fence.format == Format::Yaml && !has_yaml_structure(block) {
            return (FrontMatter::default(), raw);
        }

        let fields = match fence.format {
            Format::Yaml => parse_yaml(block),
            Format::Toml => parse_toml(block),
            Format::Json => parse_json(block),
        };

        match fields {
            Some(fields) => (Self { fields }, body),
            None => (FrontMatter::default(), raw),
        }
    }

    /// Look up a raw value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Insert or replace a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    pub fn description(&self) -> Option<&str> {
        self.get("description")
    }

    pub fn banner_image(&self) -> Option<&str> {
        self.get("bannerImage")
    }

    /// The `date` field as a calendar date, if present and parsable
    pub fn date(&self) -> Option<NaiveDate> {
        self.get("date").and_then(parse_date_string)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in the order the producer wrote them
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FrontMatter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Recognize the opening fence on the first line
fn opening_fence(text: &str) -> Option<(Fence, &str)> {
    let newline = text.find('\n')?;
    let first = text[..newline].trim_end();
    let rest = &text[newline + 1..];

    let fence = match first {
        "---" | "---yaml" => Fence {
            format: Format::Yaml,
            close: "---",
        },
        "---json" => Fence {
            format: Format::Json,
            close: "---",
        },
        "+++" => Fence {
            format: Format::Toml,
            close: "+++",
        },
        ";;;" => Fence {
            format: Format::Json,
            close: ";;;",
        },
        _ => return None,
    };

    Some((fence, rest))
}

/// Split at the closing fence line into (block, body)
fn split_block<'a>(rest: &'a str, fence: &Fence) -> Option<(&'a str, &'a str)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let marker = line.trim_end();
        if marker == fence.close || (fence.format == Format::Yaml && marker == "...") {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Valid YAML front-matter should have at least one `key: value` line
fn has_yaml_structure(block: &str) -> bool {
    block.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return false;
        }
        let Some(colon_pos) = trimmed.find(':') else {
            return false;
        };
        let key = &trimmed[..colon_pos];
        let is_valid_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && !matches!(key, "http" | "https" | "ftp" | "mailto");
        let after_colon = &trimmed[colon_pos + 1..];
        is_valid_key && (after_colon.is_empty() || after_colon.starts_with(' '))
    })
}

fn parse_yaml(block: &str) -> Option<IndexMap<String, String>> {
    let value: serde_yaml::Value = match serde_yaml::from_str(block) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Failed to parse YAML front-matter, treating as content: {}", e);
            return None;
        }
    };

    let serde_yaml::Value::Mapping(mapping) = value else {
        tracing::warn!("YAML front-matter is not a mapping, treating as content");
        return None;
    };

    let mut fields = IndexMap::new();
    for (key, value) in mapping {
        let Some(key) = yaml_scalar(&key) else {
            continue;
        };
        match yaml_to_string(&value) {
            Some(value) => {
                fields.insert(key, value);
            }
            None => tracing::debug!("Dropping non-scalar front-matter field {:?}", key),
        }
    }
    Some(fields)
}

fn yaml_scalar(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Tagged(tagged) => yaml_scalar(&tagged.value),
        _ => None,
    }
}

fn yaml_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Sequence(items) => {
            let items: Option<Vec<String>> = items.iter().map(yaml_scalar).collect();
            items.map(|items| items.join(", "))
        }
        other => yaml_scalar(other),
    }
}

fn parse_toml(block: &str) -> Option<IndexMap<String, String>> {
    let table: toml::Table = match block.parse() {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!("Failed to parse TOML front-matter, treating as content: {}", e);
            return None;
        }
    };

    let mut fields = IndexMap::new();
    for (key, value) in table {
        match toml_to_string(&value) {
            Some(value) => {
                fields.insert(key, value);
            }
            None => tracing::debug!("Dropping non-scalar front-matter field {:?}", key),
        }
    }
    Some(fields)
}

fn toml_scalar(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(dt) => Some(dt.to_string()),
        _ => None,
    }
}

fn toml_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::Array(items) => {
            let items: Option<Vec<String>> = items.iter().map(toml_scalar).collect();
            items.map(|items| items.join(", "))
        }
        other => toml_scalar(other),
    }
}

fn parse_json(block: &str) -> Option<IndexMap<String, String>> {
    let map: serde_json::Map<String, serde_json::Value> = match serde_json::from_str(block) {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!("Failed to parse JSON front-matter, treating as content: {}", e);
            return None;
        }
    };

    let mut fields = IndexMap::new();
    for (key, value) in map {
        match json_to_string(&value) {
            Some(value) => {
                fields.insert(key, value);
            }
            None => tracing::debug!("Dropping non-scalar front-matter field {:?}", key),
        }
    }
    Some(fields)
}

fn json_scalar(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn json_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Array(items) => {
            let items: Option<Vec<String>> = items.iter().map(json_scalar).collect();
            items.map(|items| items.join(", "))
        }
        other => json_scalar(other),
    }
}

/// Parse a date string in various formats down to its calendar date
pub fn parse_date_string(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    let offset_formats = ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"];
    for fmt in offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.date_naive());
        }
    }

    ["%Y-%m-%d", "%Y/%m/%d"]
        .into_iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: "Foo"
description: Order book structure
date: 2024-01-15
bannerImage: /images/banner.png
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title(), Some("Foo"));
        assert_eq!(fm.description(), Some("Order book structure"));
        assert_eq!(fm.banner_image(), Some("/images/banner.png"));
        assert_eq!(fm.date(), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(remaining, "This is the content.\n");
        assert!(!remaining.contains("title"));
    }

    #[test]
    fn test_no_frontmatter_is_identity() {
        for text in [
            "",
            "# Just a heading\n\nBody.",
            "  ---\ntitle: indented\n---\n",
            "\n---\ntitle: late\n---\n",
            "---",
        ] {
            let (fm, remaining) = FrontMatter::parse(text);
            assert!(fm.is_empty(), "unexpected fields for {:?}", text);
            assert_eq!(remaining, text);
        }
    }

    #[test]
    fn test_unterminated_block_is_content() {
        let text = "---\ntitle: Never closed\n\nBody text.\n";
        let (fm, remaining) = FrontMatter::parse(text);
        assert!(fm.is_empty());
        assert_eq!(remaining, text);
    }

    #[test]
    fn test_malformed_yaml_is_content() {
        let text = "---\ntitle: [unclosed\n---\nBody\n";
        let (fm, remaining) = FrontMatter::parse(text);
        assert!(fm.is_empty());
        assert_eq!(remaining, text);
    }

    #[test]
    fn test_empty_block_strips_fences() {
        let (fm, remaining) = FrontMatter::parse("---\n---\n\nBody\n");
        assert!(fm.is_empty());
        assert_eq!(remaining, "Body\n");
    }

    #[test]
    fn test_unknown_and_non_string_values() {
        let content = r#"---
title: Mixed
order: 3
draft: false
tags:
  - rust
  - docs
author:
  name: nested
---
Body
"#;

        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.get("order"), Some("3"));
        assert_eq!(fm.get("draft"), Some("false"));
        assert_eq!(fm.get("tags"), Some("rust, docs"));
        assert_eq!(fm.get("author"), None);
        assert_eq!(fm.description(), None);
        assert_eq!(remaining, "Body\n");
    }

    #[test]
    fn test_keys_keep_producer_order() {
        let (fm, _) = FrontMatter::parse("---\nzeta: 1\nalpha: 2\n---\n");
        let keys: Vec<_> = fm.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_parse_toml_frontmatter() {
        let content = "+++\ntitle = \"Toml Doc\"\ndate = 2024-02-01\n+++\nBody\n";
        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title(), Some("Toml Doc"));
        assert_eq!(fm.date(), NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(remaining, "Body\n");
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = ";;;\n{\"title\": \"Json Doc\", \"tags\": [\"a\", \"b\"]}\n;;;\n\nBody\n";
        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title(), Some("Json Doc"));
        assert_eq!(fm.get("tags"), Some("a, b"));
        assert_eq!(remaining, "Body\n");

        let (fm, _) = FrontMatter::parse("---json\n{\"title\": \"Fenced\"}\n---\n");
        assert_eq!(fm.title(), Some("Fenced"));
    }

    #[test]
    fn test_markdown_separator_not_yaml() {
        let content = r#"---

Some random text with markdown lists:
- Item 1
- Item 2

Check out https://example.com/path

---
More content here.
"#;

        let (fm, remaining) = FrontMatter::parse(content);
        assert!(fm.is_empty());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_crlf_and_bom() {
        let content = "\u{feff}---\r\ntitle: Windows\r\n---\r\n\r\nBody\r\n";
        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title(), Some("Windows"));
        assert_eq!(remaining, "Body\r\n");
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15);
        for s in [
            "2024-01-15",
            "2024/01/15",
            "2024-01-15 10:30:00",
            "2024-01-15T10:30:00",
            "2024-01-15T10:30:00.250",
            "2024-01-15T10:30:00Z",
            "2024-01-15T10:30:00+02:00",
        ] {
            assert_eq!(parse_date_string(s), expected, "format {:?}", s);
        }
        assert_eq!(parse_date_string("soon"), None);
        assert_eq!(parse_date_string("2024-13-40"), None);
    }
}
