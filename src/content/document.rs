//! Normalised Markdown document

use serde::Serialize;
use std::path::PathBuf;

use super::Frontmatter;

/// The result of reading one Markdown file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownFile {
    /// Body with the front-matter block stripped, trimmed
    pub content: String,

    pub frontmatter: Frontmatter,

    /// File name without extension
    pub name: String,

    /// File name with extension
    pub base: String,

    /// Absolute source path
    pub path: PathBuf,

    /// Change time of the source file, ISO 8601 in UTC
    pub chtime: String,

    /// Text of the first `# ` heading in the raw file
    pub first_header: Option<String>,
}

impl MarkdownFile {
    /// Title shown in listings: first heading, then front-matter title
    pub fn display_title(&self) -> &str {
        self.first_header
            .as_deref()
            .or(self.frontmatter.title.as_deref())
            .unwrap_or("")
    }

    pub fn is_draft(&self) -> bool {
        self.frontmatter.draft
    }
}
