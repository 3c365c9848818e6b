//! Rendered node tree and its HTML serialization

use super::overrides::{Navigation, NodeKind};

/// One node of rendered markdown
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedNode {
    Element(Element),
    Code(CodeNode),
    Text(String),
    /// Raw HTML from the source, or generated markup such as task list markers
    Html(String),
    SoftBreak,
    HardBreak,
    Rule,
}

/// A structural node with children
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub kind: ElementKind,
    /// Style class chosen by the override table
    pub class: Option<String>,
    pub children: Vec<RenderedNode>,
}

/// Element kinds and the attributes each one carries
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Paragraph,
    Heading {
        level: u8,
        /// Anchor id: explicit `{#id}` or derived from the heading text
        id: Option<String>,
    },
    Link {
        href: String,
        title: String,
        navigation: Navigation,
    },
    /// `start` is set for ordered lists
    List {
        start: Option<u64>,
    },
    ListItem,
    Table,
    TableRow {
        header: bool,
    },
    TableCell {
        header: bool,
        alignment: Alignment,
    },
    Emphasis,
    Strong,
    Strikethrough,
    BlockQuote,
    Image {
        src: String,
        title: String,
    },
    FootnoteDefinition {
        label: String,
    },
    /// Any other structure; rendered as its children only
    Container,
}

/// Table column alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// Inline code span or code block
#[derive(Debug, Clone, PartialEq)]
pub struct CodeNode {
    pub block: bool,
    /// Fence info string as written; recorded but never used for highlighting
    pub info: Option<String>,
    /// Language the highlighter applied, when highlighting happened
    pub language: Option<String>,
    pub text: String,
    /// Highlighted HTML for the block
    pub highlighted: Option<String>,
    pub class: Option<String>,
}

impl ElementKind {
    /// The override-table entry governing this element, if any
    pub fn node_kind(&self) -> Option<NodeKind> {
        match self {
            ElementKind::Paragraph => Some(NodeKind::Paragraph),
            ElementKind::Heading { level: 1, .. } => Some(NodeKind::Heading1),
            ElementKind::Heading { level: 2, .. } => Some(NodeKind::Heading2),
            ElementKind::Heading { level: 3, .. } => Some(NodeKind::Heading3),
            ElementKind::Link { .. } => Some(NodeKind::Link),
            ElementKind::List { .. } => Some(NodeKind::List),
            ElementKind::ListItem => Some(NodeKind::ListItem),
            ElementKind::Table => Some(NodeKind::Table),
            ElementKind::TableRow { .. } => Some(NodeKind::TableRow),
            ElementKind::TableCell { .. } => Some(NodeKind::TableCell),
            ElementKind::Emphasis => Some(NodeKind::Emphasis),
            ElementKind::Strong => Some(NodeKind::Strong),
            _ => None,
        }
    }
}

impl Element {
    /// Concatenated plain text of all descendants
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

impl RenderedNode {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            RenderedNode::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_code(&self) -> Option<&CodeNode> {
        match self {
            RenderedNode::Code(code) => Some(code),
            _ => None,
        }
    }

    /// Plain text of this node and its descendants
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(std::slice::from_ref(self), &mut out);
        out
    }
}

fn collect_text(nodes: &[RenderedNode], out: &mut String) {
    for node in nodes {
        match node {
            RenderedNode::Element(element) => collect_text(&element.children, out),
            RenderedNode::Code(code) => out.push_str(&code.text),
            RenderedNode::Text(text) => out.push_str(text),
            RenderedNode::SoftBreak | RenderedNode::HardBreak => out.push(' '),
            RenderedNode::Html(_) | RenderedNode::Rule => {}
        }
    }
}

/// Serialize a node tree to HTML
pub fn to_html(nodes: &[RenderedNode]) -> String {
    let mut out = String::new();
    write_nodes(&mut out, nodes);
    out
}

fn write_nodes(out: &mut String, nodes: &[RenderedNode]) {
    for node in nodes {
        write_node(out, node);
    }
}

fn write_node(out: &mut String, node: &RenderedNode) {
    match node {
        RenderedNode::Element(element) => write_element(out, element),
        RenderedNode::Code(code) => write_code(out, code),
        RenderedNode::Text(text) => out.push_str(&html_escape(text)),
        RenderedNode::Html(html) => out.push_str(html),
        RenderedNode::SoftBreak => out.push('\n'),
        RenderedNode::HardBreak => out.push_str("<br />\n"),
        RenderedNode::Rule => out.push_str("<hr />\n"),
    }
}

fn write_element(out: &mut String, element: &Element) {
    let class = element.class.as_deref();
    match &element.kind {
        ElementKind::Paragraph => wrap(out, "p", &[("class", class)], element, "\n"),
        ElementKind::Heading { level, id } => {
            let tag = format!("h{}", level);
            wrap(out, &tag, &[("id", id.as_deref()), ("class", class)], element, "\n");
        }
        ElementKind::Link {
            href,
            title,
            navigation,
        } => {
            let title = (!title.is_empty()).then_some(title.as_str());
            let mut attrs = vec![("href", Some(href.as_str())), ("title", title), ("class", class)];
            match navigation {
                Navigation::Client => attrs.push(("data-navigation", Some("client"))),
                Navigation::Document => {}
                Navigation::NewTab => {
                    attrs.push(("target", Some("_blank")));
                    attrs.push(("rel", Some("noopener")));
                }
            }
            wrap(out, "a", &attrs, element, "");
        }
        ElementKind::List { start } => match start {
            Some(start) => {
                let start = start.to_string();
                let start = (start != "1").then_some(start.as_str());
                wrap_block(out, "ol", &[("start", start), ("class", class)], element);
            }
            None => wrap_block(out, "ul", &[("class", class)], element),
        },
        ElementKind::ListItem => wrap(out, "li", &[("class", class)], element, "\n"),
        ElementKind::Table => write_table(out, element),
        ElementKind::TableRow { .. } => wrap(out, "tr", &[("class", class)], element, "\n"),
        ElementKind::TableCell { header, alignment } => {
            let tag = if *header { "th" } else { "td" };
            let style = match alignment {
                Alignment::None => None,
                Alignment::Left => Some("text-align: left"),
                Alignment::Center => Some("text-align: center"),
                Alignment::Right => Some("text-align: right"),
            };
            wrap(out, tag, &[("style", style), ("class", class)], element, "");
        }
        ElementKind::Emphasis => wrap(out, "em", &[("class", class)], element, ""),
        ElementKind::Strong => wrap(out, "strong", &[("class", class)], element, ""),
        ElementKind::Strikethrough => wrap(out, "del", &[("class", class)], element, ""),
        ElementKind::BlockQuote => wrap_block(out, "blockquote", &[("class", class)], element),
        ElementKind::Image { src, title } => {
            let alt = element.text();
            let title = (!title.is_empty()).then_some(title.as_str());
            open_tag(
                out,
                "img",
                &[
                    ("src", Some(src.as_str())),
                    ("alt", Some(alt.as_str())),
                    ("title", title),
                    ("class", class),
                ],
            );
        }
        ElementKind::FootnoteDefinition { label } => {
            let id = format!("fn-{}", label);
            open_tag(
                out,
                "div",
                &[("class", Some("footnote-definition")), ("id", Some(id.as_str()))],
            );
            out.push_str(&format!(
                r#"<sup class="footnote-definition-label">{}</sup>"#,
                html_escape(label)
            ));
            write_nodes(out, &element.children);
            out.push_str("</div>\n");
        }
        ElementKind::Container => write_nodes(out, &element.children),
    }
}

fn write_table(out: &mut String, table: &Element) {
    open_tag(out, "table", &[("class", table.class.as_deref())]);
    out.push('\n');

    let (head, body): (Vec<_>, Vec<_>) = table.children.iter().partition(|node| {
        matches!(
            node.as_element().map(|e| &e.kind),
            Some(ElementKind::TableRow { header: true })
        )
    });

    if !head.is_empty() {
        out.push_str("<thead>\n");
        head.into_iter().for_each(|node| write_node(out, node));
        out.push_str("</thead>\n");
    }
    if !body.is_empty() {
        out.push_str("<tbody>\n");
        body.into_iter().for_each(|node| write_node(out, node));
        out.push_str("</tbody>\n");
    }
    out.push_str("</table>\n");
}

fn write_code(out: &mut String, code: &CodeNode) {
    let class = code.class.as_deref();
    if !code.block {
        open_tag(out, "code", &[("class", class)]);
        out.push_str(&html_escape(&code.text));
        out.push_str("</code>");
        return;
    }

    match &code.highlighted {
        Some(highlighted) => {
            open_tag(
                out,
                "div",
                &[("class", class), ("data-language", code.language.as_deref())],
            );
            out.push_str(highlighted);
            out.push_str("</div>\n");
        }
        None => {
            open_tag(out, "pre", &[("class", class)]);
            out.push_str("<code>");
            out.push_str(&html_escape(&code.text));
            out.push_str("</code></pre>\n");
        }
    }
}

fn wrap(out: &mut String, tag: &str, attrs: &[(&str, Option<&str>)], element: &Element, after: &str) {
    open_tag(out, tag, attrs);
    write_nodes(out, &element.children);
    out.push_str(&format!("</{}>{}", tag, after));
}

/// Block container: children start on their own line
fn wrap_block(out: &mut String, tag: &str, attrs: &[(&str, Option<&str>)], element: &Element) {
    open_tag(out, tag, attrs);
    out.push('\n');
    write_nodes(out, &element.children);
    out.push_str(&format!("</{}>\n", tag));
}

fn open_tag(out: &mut String, tag: &str, attrs: &[(&str, Option<&str>)]) {
    out.push('<');
    out.push_str(tag);
    for (name, value) in attrs {
        if let Some(value) = value {
            out.push_str(&format!(r#" {}="{}""#, name, html_escape(value)));
        }
    }
    out.push('>');
}

/// Simple HTML escaping
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RenderedNode {
        RenderedNode::Text(s.to_string())
    }

    fn element(kind: ElementKind, class: Option<&str>, children: Vec<RenderedNode>) -> RenderedNode {
        RenderedNode::Element(Element {
            kind,
            class: class.map(str::to_string),
            children,
        })
    }

    #[test]
    fn test_heading_html() {
        let nodes = vec![element(
            ElementKind::Heading {
                level: 2,
                id: Some("setup".to_string()),
            },
            Some("big"),
            vec![text("Setup & Run")],
        )];
        assert_eq!(
            to_html(&nodes),
            "<h2 id=\"setup\" class=\"big\">Setup &amp; Run</h2>\n"
        );
    }

    #[test]
    fn test_link_navigation_attributes() {
        let link = |navigation| {
            to_html(&[element(
                ElementKind::Link {
                    href: "/docs".to_string(),
                    title: String::new(),
                    navigation,
                },
                None,
                vec![text("docs")],
            )])
        };
        assert_eq!(
            link(Navigation::Client),
            r#"<a href="/docs" data-navigation="client">docs</a>"#
        );
        assert_eq!(link(Navigation::Document), r#"<a href="/docs">docs</a>"#);
        assert_eq!(
            link(Navigation::NewTab),
            r#"<a href="/docs" target="_blank" rel="noopener">docs</a>"#
        );
    }

    #[test]
    fn test_table_sections() {
        let cell = |header, s| {
            element(
                ElementKind::TableCell {
                    header,
                    alignment: Alignment::Right,
                },
                None,
                vec![text(s)],
            )
        };
        let table = element(
            ElementKind::Table,
            None,
            vec![
                element(ElementKind::TableRow { header: true }, None, vec![cell(true, "h")]),
                element(ElementKind::TableRow { header: false }, None, vec![cell(false, "v")]),
            ],
        );
        let html = to_html(&[table]);
        assert!(html.starts_with("<table>\n<thead>\n<tr>"));
        assert!(html.contains(r#"<th style="text-align: right">h</th>"#));
        assert!(html.contains("<tbody>\n<tr><td style=\"text-align: right\">v</td></tr>"));
        assert!(html.ends_with("</tbody>\n</table>\n"));
    }

    #[test]
    fn test_unhighlighted_code_is_escaped() {
        let node = RenderedNode::Code(CodeNode {
            block: true,
            info: None,
            language: None,
            text: "if a < b {}".to_string(),
            highlighted: None,
            class: Some("code".to_string()),
        });
        assert_eq!(
            to_html(&[node]),
            "<pre class=\"code\"><code>if a &lt; b {}</code></pre>\n"
        );
    }

    #[test]
    fn test_text_collection() {
        let node = element(
            ElementKind::Paragraph,
            None,
            vec![
                text("a "),
                element(ElementKind::Strong, None, vec![text("b")]),
                RenderedNode::SoftBreak,
                text("c"),
            ],
        );
        assert_eq!(node.text(), "a b c");
    }
}
