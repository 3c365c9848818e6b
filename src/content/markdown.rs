//! Markdown rendering with syntax highlighting

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;
use std::collections::HashSet;

use super::node::{self, Alignment, CodeNode, Element, ElementKind, RenderedNode};
use super::overrides::{NodeKind, RenderOverrides};

/// Markdown renderer with syntax highlighting
///
/// Code blocks are highlighted for one configured language regardless of
/// the fence info string.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    language: String,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("python", "InspiredGitHub")
    }

    /// Create with custom settings
    pub fn with_options(language: &str, theme: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            language: language.to_string(),
        }
    }

    /// The language every code block is highlighted as
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Render markdown into a node tree
    pub fn render(&self, markdown: &str, overrides: &RenderOverrides) -> Vec<RenderedNode> {
        // Front-matter is stripped by FrontMatter::parse, so no metadata blocks here
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES;
        let parser = Parser::new_ext(markdown, options);

        let mut tree = TreeBuilder::new(overrides);
        let mut code_block: Option<(Option<String>, String)> = None;

        for event in parser {
            if code_block.is_some() {
                match event {
                    Event::Text(chunk) => {
                        if let Some((_, text)) = code_block.as_mut() {
                            text.push_str(&chunk);
                        }
                    }
                    Event::End(TagEnd::CodeBlock) => {
                        if let Some((info, text)) = code_block.take() {
                            let code = self.code_block(info, text, overrides);
                            tree.push(RenderedNode::Code(code));
                        }
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let info = match kind {
                        CodeBlockKind::Fenced(info) if !info.trim().is_empty() => {
                            Some(info.trim().to_string())
                        }
                        _ => None,
                    };
                    code_block = Some((info, String::new()));
                }
                Event::Start(tag) => tree.start(tag),
                Event::End(TagEnd::TableHead) => {
                    tree.in_table_head = false;
                    tree.close();
                }
                Event::End(_) => tree.close(),
                Event::Text(text) => tree.push(RenderedNode::Text(text.to_string())),
                Event::Code(text) => tree.push(RenderedNode::Code(CodeNode {
                    block: false,
                    info: None,
                    language: None,
                    text: text.to_string(),
                    highlighted: None,
                    class: class_of(overrides, NodeKind::Code),
                })),
                Event::Html(html) | Event::InlineHtml(html) => {
                    tree.push(RenderedNode::Html(html.to_string()))
                }
                Event::SoftBreak => tree.push(RenderedNode::SoftBreak),
                Event::HardBreak => tree.push(RenderedNode::HardBreak),
                Event::Rule => tree.push(RenderedNode::Rule),
                Event::FootnoteReference(label) => {
                    let label = node::html_escape(&label);
                    tree.push(RenderedNode::Html(format!(
                        r##"<sup class="footnote-reference"><a href="#fn-{}">{}</a></sup>"##,
                        label, label
                    )));
                }
                Event::TaskListMarker(checked) => {
                    let checked = if checked { r#" checked="""# } else { "" };
                    tree.push(RenderedNode::Html(format!(
                        r#"<input disabled="" type="checkbox"{}/>"#,
                        checked
                    )));
                }
                _ => {}
            }
        }

        // Unterminated code block at end of input
        if let Some((info, text)) = code_block {
            let code = self.code_block(info, text, overrides);
            tree.push(RenderedNode::Code(code));
        }

        tree.finish()
    }

    /// Render markdown straight to HTML
    pub fn render_html(&self, markdown: &str, overrides: &RenderOverrides) -> String {
        node::to_html(&self.render(markdown, overrides))
    }

    fn code_block(&self, info: Option<String>, text: String, overrides: &RenderOverrides) -> CodeNode {
        let highlighted = if overrides.code.highlight {
            self.highlight_code(&text)
        } else {
            None
        };

        CodeNode {
            block: true,
            info,
            language: highlighted.as_ref().map(|_| self.language.clone()),
            text,
            highlighted,
            class: class_of(overrides, NodeKind::Code),
        }
    }

    /// Highlight a code block with the configured language
    fn highlight_code(&self, code: &str) -> Option<String> {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(&self.language)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())?;

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) => Some(highlighted),
            Err(e) => {
                tracing::warn!("Failed to highlight code block, rendering plain: {}", e);
                None
            }
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn class_of(overrides: &RenderOverrides, kind: NodeKind) -> Option<String> {
    overrides.class_for(kind).map(str::to_string)
}

/// Stack-based builder turning parser events into a node tree
struct TreeBuilder<'a> {
    overrides: &'a RenderOverrides,
    root: Vec<RenderedNode>,
    stack: Vec<Element>,
    alignments: Vec<Alignment>,
    cell_index: usize,
    in_table_head: bool,
    /// Heading ids already used in this document
    heading_ids: HashSet<String>,
}

impl<'a> TreeBuilder<'a> {
    fn new(overrides: &'a RenderOverrides) -> Self {
        Self {
            overrides,
            root: Vec::new(),
            stack: Vec::new(),
            alignments: Vec::new(),
            cell_index: 0,
            in_table_head: false,
            heading_ids: HashSet::new(),
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let kind = match tag {
            Tag::Paragraph => ElementKind::Paragraph,
            Tag::Heading { level, id, .. } => ElementKind::Heading {
                level: heading_level(level),
                id: id.map(|id| id.to_string()),
            },
            Tag::BlockQuote(_) => ElementKind::BlockQuote,
            Tag::List(start) => ElementKind::List { start },
            Tag::Item => ElementKind::ListItem,
            Tag::FootnoteDefinition(label) => ElementKind::FootnoteDefinition {
                label: label.to_string(),
            },
            Tag::Table(alignments) => {
                self.alignments = alignments.into_iter().map(alignment).collect();
                ElementKind::Table
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.cell_index = 0;
                ElementKind::TableRow { header: true }
            }
            Tag::TableRow => {
                self.cell_index = 0;
                ElementKind::TableRow { header: false }
            }
            Tag::TableCell => {
                let alignment = self
                    .alignments
                    .get(self.cell_index)
                    .copied()
                    .unwrap_or_default();
                self.cell_index += 1;
                ElementKind::TableCell {
                    header: self.in_table_head,
                    alignment,
                }
            }
            Tag::Emphasis => ElementKind::Emphasis,
            Tag::Strong => ElementKind::Strong,
            Tag::Strikethrough => ElementKind::Strikethrough,
            Tag::Link {
                dest_url, title, ..
            } => ElementKind::Link {
                navigation: self.overrides.links.navigation_for(&dest_url),
                href: dest_url.to_string(),
                title: title.to_string(),
            },
            Tag::Image {
                dest_url, title, ..
            } => ElementKind::Image {
                src: dest_url.to_string(),
                title: title.to_string(),
            },
            _ => ElementKind::Container,
        };

        let class = kind
            .node_kind()
            .and_then(|kind| self.overrides.class_for(kind))
            .map(str::to_string);

        self.stack.push(Element {
            kind,
            class,
            children: Vec::new(),
        });
    }

    fn close(&mut self) {
        let Some(mut element) = self.stack.pop() else {
            return;
        };

        if let ElementKind::Heading { id: Some(explicit), .. } = &element.kind {
            self.heading_ids.insert(explicit.clone());
        } else if matches!(element.kind, ElementKind::Heading { id: None, .. }) {
            let derived = self.unique_heading_id(::slug::slugify(element.text()));
            if let ElementKind::Heading { id, .. } = &mut element.kind {
                *id = derived;
            }
        }

        self.push(RenderedNode::Element(element));
    }

    /// `setup`, then `setup-1`, `setup-2`, ... for repeated headings
    fn unique_heading_id(&mut self, base: String) -> Option<String> {
        if base.is_empty() {
            return None;
        }
        let mut id = base.clone();
        let mut suffix = 0;
        while !self.heading_ids.insert(id.clone()) {
            suffix += 1;
            id = format!("{}-{}", base, suffix);
        }
        Some(id)
    }

    fn push(&mut self, node: RenderedNode) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root.push(node),
        }
    }

    fn finish(mut self) -> Vec<RenderedNode> {
        while !self.stack.is_empty() {
            self.close();
        }
        self.root
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn alignment(alignment: pulldown_cmark::Alignment) -> Alignment {
    match alignment {
        pulldown_cmark::Alignment::None => Alignment::None,
        pulldown_cmark::Alignment::Left => Alignment::Left,
        pulldown_cmark::Alignment::Center => Alignment::Center,
        pulldown_cmark::Alignment::Right => Alignment::Right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::overrides::{CodePolicy, LinkPolicy, Navigation};

    fn first_element(nodes: &[RenderedNode]) -> &Element {
        nodes[0].as_element().expect("element")
    }

    #[test]
    fn test_render_heading_with_class() {
        let renderer = MarkdownRenderer::new();
        let overrides = RenderOverrides::default();
        let nodes = renderer.render("# Title", &overrides);

        assert_eq!(nodes.len(), 1);
        let heading = first_element(&nodes);
        assert_eq!(
            heading.kind,
            ElementKind::Heading {
                level: 1,
                id: Some("title".to_string())
            }
        );
        assert_eq!(heading.text(), "Title");
        assert_eq!(
            heading.class.as_deref(),
            overrides.class_for(NodeKind::Heading1)
        );
    }

    #[test]
    fn test_render_internal_link() {
        let renderer = MarkdownRenderer::new();
        let overrides = RenderOverrides::default();
        let nodes = renderer.render("[text](/docs)", &overrides);

        let paragraph = first_element(&nodes);
        assert_eq!(paragraph.kind, ElementKind::Paragraph);
        let link = paragraph.children[0].as_element().unwrap();
        assert_eq!(
            link.kind,
            ElementKind::Link {
                href: "/docs".to_string(),
                title: String::new(),
                navigation: Navigation::Client,
            }
        );
        assert_eq!(link.text(), "text");
        assert_eq!(link.class.as_deref(), overrides.class_for(NodeKind::Link));
    }

    #[test]
    fn test_render_external_link_uses_policy() {
        let renderer = MarkdownRenderer::new();
        let overrides = RenderOverrides::identity().with_links(LinkPolicy {
            internal: Navigation::Client,
            external: Navigation::NewTab,
        });
        let html = renderer.render_html("[gh](https://github.com/openliquid)", &overrides);
        assert_eq!(
            html,
            "<p><a href=\"https://github.com/openliquid\" target=\"_blank\" rel=\"noopener\">gh</a></p>\n"
        );
    }

    #[test]
    fn test_code_block_uses_configured_language() {
        let renderer = MarkdownRenderer::with_options("python", "InspiredGitHub");
        let overrides = RenderOverrides::default();
        let nodes = renderer.render("```rust\ndef main():\n    pass\n```", &overrides);

        let code = nodes[0].as_code().expect("code node");
        assert!(code.block);
        assert_eq!(code.info.as_deref(), Some("rust"));
        assert_eq!(code.language.as_deref(), Some("python"));
        assert_eq!(code.text, "def main():\n    pass\n");
        assert!(code.highlighted.as_deref().unwrap().contains("<pre"));
        assert_eq!(code.class.as_deref(), overrides.class_for(NodeKind::Code));
    }

    #[test]
    fn test_code_highlighting_can_be_disabled() {
        let renderer = MarkdownRenderer::new();
        let overrides = RenderOverrides::identity().with_code(CodePolicy { highlight: false });
        let html = renderer.render_html("    x = 1 < 2\n", &overrides);
        assert_eq!(html, "<pre><code>x = 1 &lt; 2\n</code></pre>\n");
    }

    #[test]
    fn test_inline_code_is_styled_not_highlighted() {
        let renderer = MarkdownRenderer::new();
        let overrides = RenderOverrides::identity().with_class(NodeKind::Code, "mono");
        let html = renderer.render_html("Call `run()` now", &overrides);
        assert_eq!(html, "<p>Call <code class=\"mono\">run()</code> now</p>\n");
    }

    #[test]
    fn test_lists_emphasis_and_strong() {
        let renderer = MarkdownRenderer::new();
        let overrides = RenderOverrides::identity()
            .with_class(NodeKind::List, "list")
            .with_class(NodeKind::ListItem, "item")
            .with_class(NodeKind::Strong, "bold");
        let html = renderer.render_html("- *one*\n- **two**\n", &overrides);
        assert_eq!(
            html,
            "<ul class=\"list\">\n<li class=\"item\"><em>one</em></li>\n<li class=\"item\"><strong class=\"bold\">two</strong></li>\n</ul>\n"
        );

        let html = renderer.render_html("3. three\n4. four\n", &RenderOverrides::identity());
        assert!(html.starts_with("<ol start=\"3\">"));
    }

    #[test]
    fn test_table_structure() {
        let renderer = MarkdownRenderer::new();
        let overrides = RenderOverrides::identity().with_class(NodeKind::TableCell, "cell");
        let nodes = renderer.render("| a | b |\n|:--|--:|\n| 1 | 2 |\n", &overrides);

        let table = first_element(&nodes);
        assert_eq!(table.kind, ElementKind::Table);
        assert_eq!(table.children.len(), 2);

        let head = table.children[0].as_element().unwrap();
        assert_eq!(head.kind, ElementKind::TableRow { header: true });
        let first_cell = head.children[0].as_element().unwrap();
        assert_eq!(
            first_cell.kind,
            ElementKind::TableCell {
                header: true,
                alignment: Alignment::Left
            }
        );
        assert_eq!(first_cell.class.as_deref(), Some("cell"));

        let row = table.children[1].as_element().unwrap();
        let second_cell = row.children[1].as_element().unwrap();
        assert_eq!(
            second_cell.kind,
            ElementKind::TableCell {
                header: false,
                alignment: Alignment::Right
            }
        );
        assert_eq!(second_cell.text(), "2");
    }

    #[test]
    fn test_unlisted_kinds_render_without_class() {
        let renderer = MarkdownRenderer::new();
        let overrides = RenderOverrides::default();
        let html = renderer.render_html("> quoted\n\n#### Deep", &overrides);
        assert!(html.contains("<blockquote>\n<p class=\"py-2 text-md\">quoted</p>\n</blockquote>"));
        assert!(html.contains("<h4 id=\"deep\">Deep</h4>"));
    }

    #[test]
    fn test_explicit_heading_id() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render_html("## Setup {#install}", &RenderOverrides::identity());
        assert_eq!(html, "<h2 id=\"install\">Setup</h2>\n");
    }

    #[test]
    fn test_malformed_markdown_is_best_effort() {
        let renderer = MarkdownRenderer::new();
        let overrides = RenderOverrides::default();
        let source = "**unclosed [link](\n| broken | table\n```\nnever closed";
        let first = renderer.render(source, &overrides);
        let second = renderer.render(source, &overrides);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_raw_html_passes_through() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render_html("<div class=\"note\">hi</div>\n", &RenderOverrides::identity());
        assert_eq!(html, "<div class=\"note\">hi</div>\n");
    }

    #[test]
    fn test_repeated_headings_get_unique_ids() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render_html(
            "## Setup\n\n## Setup\n\n## Setup {#setup-2}\n\n## Setup\n",
            &RenderOverrides::identity(),
        );
        assert_eq!(
            html,
            "<h2 id=\"setup\">Setup</h2>\n<h2 id=\"setup-1\">Setup</h2>\n<h2 id=\"setup-2\">Setup</h2>\n<h2 id=\"setup-3\">Setup</h2>\n"
        );

        // Ids do not carry over between documents
        let again = renderer.render_html("## Setup", &RenderOverrides::identity());
        assert_eq!(again, "<h2 id=\"setup\">Setup</h2>\n");
    }

    #[test]
    fn test_inline_code_never_highlighted_even_when_blocks_are() {
        let renderer = MarkdownRenderer::new();
        let overrides = RenderOverrides::default();
        assert!(overrides.code.highlight);

        let nodes = renderer.render("Run `print(1)` first", &overrides);
        let paragraph = first_element(&nodes);
        let code = paragraph.children[1].as_code().expect("inline code");
        assert!(!code.block);
        assert_eq!(code.highlighted, None);
        assert_eq!(code.language, None);
        assert_eq!(code.class.as_deref(), overrides.class_for(NodeKind::Code));

        let html = renderer.render_html("Run `print(1)` first", &overrides);
        assert!(!html.contains("data-language"));
        assert!(html.contains(">print(1)</code>"));
    }
}
