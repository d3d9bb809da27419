//! Collection indexes - ordering and listing documents of one collection

use serde::Serialize;
use std::cmp::Ordering;
use std::path::Path;

use super::MarkdownFile;
use crate::helpers::{full_url_for, href_for};

/// One row of a collection listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexEntry {
    /// Root-relative URL of the source document
    pub href: String,
    /// Absolute URL of the source document
    pub permalink: String,
    pub title: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub languages: Vec<String>,
    pub position: f64,
    pub draft: bool,
}

/// Sort newest first by front-matter date.
///
/// Dates that do not parse go last; the sort is stable so equal dates keep
/// their input order.
pub fn sort_by_date_desc(files: &mut [MarkdownFile]) {
    files.sort_by(|a, b| {
        match (a.frontmatter.parsed_date(), b.frontmatter.parsed_date()) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

/// Drop drafts unless they are explicitly wanted
pub fn published(files: Vec<MarkdownFile>, include_drafts: bool) -> Vec<MarkdownFile> {
    if include_drafts {
        return files;
    }
    files.into_iter().filter(|f| !f.is_draft()).collect()
}

/// Build the listing for files below `content_root`
pub fn build_index(files: &[MarkdownFile], content_root: &Path, base_url: &str) -> Vec<IndexEntry> {
    files
        .iter()
        .map(|file| {
            let href = href_for(content_root, &file.path).unwrap_or_else(|| {
                tracing::warn!("{:?} is outside the content root", file.path);
                format!("/{}", file.base)
            });
            IndexEntry {
                permalink: full_url_for(base_url, &href),
                href,
                title: file.display_title().to_string(),
                date: file.frontmatter.date.clone(),
                description: file.frontmatter.description.clone(),
                languages: file.frontmatter.languages.clone(),
                position: file.frontmatter.position,
                draft: file.frontmatter.draft,
            }
        })
        .collect()
}
