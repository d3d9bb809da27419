//! Corpus locator - resolves glob patterns below the content root

use std::path::{Path, PathBuf};

use super::MarkdownPath;
use crate::config::Collection;
use crate::error::{Error, Result};

/// Finds Markdown files below a content root
#[derive(Debug, Clone)]
pub struct CorpusLocator {
    root: PathBuf,
}

impl CorpusLocator {
    pub fn new<P: AsRef<Path>>(content_root: P) -> Self {
        Self {
            root: content_root.as_ref().to_path_buf(),
        }
    }

    /// Expand a pattern relative to the root into a sorted list of files.
    ///
    /// Only `pattern` is a glob; metacharacters in the root match literally.
    pub fn locate(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let root = glob::Pattern::escape(&self.root.to_string_lossy());
        let full = MarkdownPath::new(root).join_with([pattern]).to_string();

        let entries = glob::glob(&full).map_err(|source| Error::Pattern {
            pattern: full.clone(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                Error::io(path, e.into_error())
            })?;
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        tracing::debug!("Pattern {:?} matched {} files", pattern, paths.len());
        Ok(paths)
    }

    /// Files of a configured collection
    pub fn locate_collection(&self, collection: &Collection) -> Result<Vec<PathBuf>> {
        self.locate(&collection.pattern)
    }
}
