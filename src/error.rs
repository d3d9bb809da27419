//! Error types for the ingestion pipeline

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::content::FrontmatterFormat;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Why a single frontmatter format rejected a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatFailure {
    pub format: FrontmatterFormat,
    pub message: String,
}

impl fmt::Display for FormatFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.format, self.message)
    }
}

/// Errors raised while locating, reading or parsing Markdown documents
#[derive(Debug, Error)]
pub enum Error {
    /// A read was attempted on something that is not a `.md` file
    #[error("Can only read markdown files, got {}", .0.display())]
    UnsupportedFileType(PathBuf),

    /// None of the configured formats could parse the frontmatter block
    #[error(
        "Unable to parse frontmatter{}: {text:?} ({})",
        location(.path),
        join_failures(.failures)
    )]
    FrontmatterParse {
        path: Option<PathBuf>,
        text: String,
        failures: Vec<FormatFailure>,
    },

    /// The frontmatter parsed but does not satisfy the schema
    #[error("Invalid frontmatter{}: {message}", location(.path))]
    FrontmatterValidation {
        path: Option<PathBuf>,
        message: String,
    },

    /// Underlying filesystem failure
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid glob pattern handed to the corpus locator
    #[error("Invalid pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::FrontmatterValidation {
            path: None,
            message: message.into(),
        }
    }

    /// Attach the source file to a frontmatter error
    pub fn in_file(self, file: &Path) -> Self {
        match self {
            Self::FrontmatterParse { text, failures, .. } => Self::FrontmatterParse {
                path: Some(file.to_path_buf()),
                text,
                failures,
            },
            Self::FrontmatterValidation { message, .. } => Self::FrontmatterValidation {
                path: Some(file.to_path_buf()),
                message,
            },
            other => other,
        }
    }
}

fn location(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

fn join_failures(failures: &[FormatFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
