//! Content module - document store access, front-matter, and markdown rendering

mod document;
mod frontmatter;
pub mod loader;
mod markdown;
pub mod node;
pub mod overrides;
pub mod slug;
pub mod store;

pub use document::{DocumentDetail, DocumentSummary};
pub use frontmatter::{parse_date_string, FrontMatter};
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
pub use node::{RenderedNode, to_html};
pub use overrides::{CodePolicy, LinkPolicy, Navigation, NodeKind, RenderOverrides};
pub use store::{DocumentStore, FsStore, MemoryStore};
