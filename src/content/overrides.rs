//! Render overrides: the mapping from markdown node kind to output policy
//!
//! The renderer itself is purely structural; every visual decision (style
//! classes, how links are followed, whether code is highlighted) comes from
//! a [`RenderOverrides`] value handed to it by the caller.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Node kinds that accept a style class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Heading1,
    Heading2,
    Heading3,
    Link,
    Code,
    List,
    ListItem,
    Table,
    TableRow,
    TableCell,
    Paragraph,
    Strong,
    Emphasis,
}

/// How a rendered link is followed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Navigation {
    /// Client-side navigation within the site
    Client,
    /// Standard full-page navigation
    Document,
    /// Standard navigation in a new browsing context
    NewTab,
}

/// Chooses a navigation mode from the link target's scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkPolicy {
    /// Same-origin paths, fragments and relative references
    pub internal: Navigation,
    /// Targets with a URL scheme or a protocol-relative `//host`
    pub external: Navigation,
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self {
            internal: Navigation::Client,
            external: Navigation::Document,
        }
    }
}

impl LinkPolicy {
    pub fn navigation_for(&self, href: &str) -> Navigation {
        if is_external(href) {
            self.external
        } else {
            self.internal
        }
    }
}

/// Whether a link target leaves the site
pub fn is_external(href: &str) -> bool {
    let href = href.trim();
    if href.starts_with("//") {
        return true;
    }

    // RFC 3986 scheme: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"
    let Some(colon) = href.find(':') else {
        return false;
    };
    let scheme = &href[..colon];
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        _ => false,
    }
}

/// Code rendering policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodePolicy {
    /// Highlight code blocks with the renderer's configured language
    pub highlight: bool,
}

impl Default for CodePolicy {
    fn default() -> Self {
        Self { highlight: true }
    }
}

/// The full override table passed to the renderer
///
/// Kinds missing from `classes` render without a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOverrides {
    pub classes: BTreeMap<NodeKind, String>,
    pub links: LinkPolicy,
    pub code: CodePolicy,
}

impl Default for RenderOverrides {
    /// The documentation site's house style
    fn default() -> Self {
        let classes = [
            (NodeKind::Heading1, "text-3xl font-bold py-4"),
            (NodeKind::Heading2, "text-2xl font-bold py-2"),
            (NodeKind::Heading3, "text-xl font-bold py-2"),
            (
                NodeKind::Link,
                "text-decoration-none border-2 rounded-sm px-2 py-1 border-indigo-800 hover:bg-indigo-800 hover:text-zinc-200",
            ),
            (
                NodeKind::Code,
                "bg-zinc-200 p-2 rounded-md break-words overflow-hidden",
            ),
            (NodeKind::Strong, "py-2 text-lg font-bold"),
            (NodeKind::Paragraph, "py-2 text-md"),
            (NodeKind::List, "py-2 text-md"),
            (NodeKind::ListItem, "py-2 text-md italic"),
        ]
        .into_iter()
        .map(|(kind, class)| (kind, class.to_string()))
        .collect();

        Self {
            classes,
            links: LinkPolicy::default(),
            code: CodePolicy::default(),
        }
    }
}

impl RenderOverrides {
    /// No classes, default link and code policies
    pub fn identity() -> Self {
        Self {
            classes: BTreeMap::new(),
            links: LinkPolicy::default(),
            code: CodePolicy::default(),
        }
    }

    /// Set the class for one node kind
    pub fn with_class(mut self, kind: NodeKind, class: impl Into<String>) -> Self {
        self.classes.insert(kind, class.into());
        self
    }

    pub fn with_links(mut self, links: LinkPolicy) -> Self {
        self.links = links;
        self
    }

    pub fn with_code(mut self, code: CodePolicy) -> Self {
        self.code = code;
        self
    }

    pub fn class_for(&self, kind: NodeKind) -> Option<&str> {
        self.classes.get(&kind).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_external() {
        assert!(is_external("https://example.com"));
        assert!(is_external("mailto:team@example.com"));
        assert!(is_external("//cdn.example.com/lib.js"));
        assert!(!is_external("/docs"));
        assert!(!is_external("#section"));
        assert!(!is_external("structure/order-book"));
        assert!(!is_external("/docs?q=a:b"));
        assert!(!is_external("1http://nope"));
    }

    #[test]
    fn test_link_policy() {
        let policy = LinkPolicy::default();
        assert_eq!(policy.navigation_for("/docs"), Navigation::Client);
        assert_eq!(
            policy.navigation_for("https://github.com"),
            Navigation::Document
        );

        let policy = LinkPolicy {
            internal: Navigation::Document,
            external: Navigation::NewTab,
        };
        assert_eq!(policy.navigation_for("/docs"), Navigation::Document);
        assert_eq!(policy.navigation_for("http://x.org"), Navigation::NewTab);
    }

    #[test]
    fn test_overrides_from_yaml() {
        let yaml = r#"
classes:
  heading1: title
  table-cell: cell
links:
  external: new-tab
code:
  highlight: false
"#;
        let overrides: RenderOverrides = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(overrides.class_for(NodeKind::Heading1), Some("title"));
        assert_eq!(overrides.class_for(NodeKind::TableCell), Some("cell"));
        assert_eq!(overrides.class_for(NodeKind::Paragraph), None);
        assert_eq!(overrides.links.internal, Navigation::Client);
        assert_eq!(overrides.links.external, Navigation::NewTab);
        assert!(!overrides.code.highlight);
    }

    #[test]
    fn test_defaults_cover_house_style() {
        let overrides = RenderOverrides::default();
        assert_eq!(
            overrides.class_for(NodeKind::Heading1),
            Some("text-3xl font-bold py-4")
        );
        assert_eq!(overrides.class_for(NodeKind::Table), None);
        assert!(RenderOverrides::identity().classes.is_empty());
    }
}
