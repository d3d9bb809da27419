//! Markdown reader - loads documents from disk

use futures::future::try_join_all;
use std::ffi::OsStr;
use std::fs::Metadata;
use std::path::Path;
use std::time::SystemTime;
use tokio::fs;

use super::frontmatter::{FrontmatterParser, ParsedMarkdown};
use super::MarkdownFile;
use crate::config::MissingDatePolicy;
use crate::error::{Error, Result};
use crate::helpers::iso_timestamp;

/// Reads Markdown files into [`MarkdownFile`] records
#[derive(Debug, Clone, Default)]
pub struct MarkdownReader {
    parser: FrontmatterParser,
    missing_date: MissingDatePolicy,
}

impl MarkdownReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose what happens to documents without a front-matter block
    pub fn with_missing_date(mut self, policy: MissingDatePolicy) -> Self {
        self.missing_date = policy;
        self
    }

    /// Read and parse a single `.md` file
    pub async fn read<P: AsRef<Path>>(&self, path: P) -> Result<MarkdownFile> {
        let path = path.as_ref();
        if !is_markdown_file(path) {
            return Err(Error::UnsupportedFileType(path.to_path_buf()));
        }

        tracing::debug!("Reading {:?}", path);

        let raw = fs::read_to_string(path)
            .await
            .map_err(|e| Error::io(path, e))?;
        let metadata = fs::metadata(path).await.map_err(|e| Error::io(path, e))?;
        let chtime = iso_timestamp(change_time(&metadata));

        let fallback_date = match self.missing_date {
            MissingDatePolicy::Reject => None,
            MissingDatePolicy::ChangeTime => Some(chtime.as_str()),
        };
        let ParsedMarkdown {
            content,
            frontmatter,
        } = self
            .parser
            .parse_with_fallback_date(&raw, fallback_date)
            .map_err(|e| e.in_file(path))?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let base = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let absolute = std::path::absolute(path).map_err(|e| Error::io(path, e))?;

        Ok(MarkdownFile {
            content,
            frontmatter,
            name,
            base,
            path: absolute,
            chtime,
            first_header: first_header(&raw),
        })
    }

    /// Read every path concurrently. Output order follows input order and
    /// the first failure fails the whole batch.
    pub async fn read_many<I>(&self, paths: I) -> Result<Vec<MarkdownFile>>
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        try_join_all(paths.into_iter().map(|path| self.read(path))).await
    }
}

/// Only a literal `md` extension counts
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("md"))
}

/// Text of the first line that opens with a level-one `# ` heading marker
pub fn first_header(raw: &str) -> Option<String> {
    raw.lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line[1..].trim().to_string())
}

#[cfg(unix)]
fn change_time(metadata: &Metadata) -> SystemTime {
    use std::os::unix::fs::MetadataExt;
    use std::time::{Duration, UNIX_EPOCH};

    let secs = metadata.ctime();
    let nanos = metadata.ctime_nsec().clamp(0, 999_999_999) as u32;
    if secs >= 0 {
        UNIX_EPOCH + Duration::new(secs as u64, nanos)
    } else {
        UNIX_EPOCH - Duration::new(secs.unsigned_abs(), 0)
    }
}

#[cfg(not(unix))]
fn change_time(metadata: &Metadata) -> SystemTime {
    metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH)
}
