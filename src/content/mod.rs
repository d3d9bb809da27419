//! Content module - Markdown ingestion, indexing and rendering

pub mod collection;
mod document;
mod frontmatter;
pub mod locator;
mod markdown;
mod path;
pub mod reader;

pub use collection::IndexEntry;
pub use document::MarkdownFile;
pub use frontmatter::{
    split_frontmatter, Frontmatter, FrontmatterFormat, FrontmatterParser, ParsedMarkdown,
};
pub use locator::CorpusLocator;
pub use markdown::{Heading, MarkdownRenderer, RenderedMarkdown};
pub use path::MarkdownPath;
pub use reader::MarkdownReader;
