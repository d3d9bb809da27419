//! Paths below the content root

use std::fmt;
use std::path::{Path, PathBuf};

/// A path anchored at the Markdown content root.
///
/// The root is remembered so that the part below it can be recovered from
/// any path that was joined onto it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownPath {
    root: PathBuf,
    path: PathBuf,
}

impl MarkdownPath {
    /// Start at the content root
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            path: root.clone(),
            root,
        }
    }

    /// Append segments, which may themselves contain separators or globs.
    ///
    /// An absolute segment replaces the path but keeps the root.
    pub fn join_with<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        for segment in segments {
            self.path.push(segment);
        }
        self
    }

    /// Path relative to the root, or `None` when it escaped the root
    pub fn relative(&self) -> Option<&Path> {
        self.path.strip_prefix(&self.root).ok()
    }
}

impl fmt::Display for MarkdownPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
