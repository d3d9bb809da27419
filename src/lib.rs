//! folio: Markdown corpus ingestion for a statically generated portfolio site
//!
//! Documents live under a content root, grouped into collections located by
//! glob patterns. Each document is read into a [`content::MarkdownFile`]
//! (validated front-matter, trimmed body, first heading, change time) and
//! the build writes those records as JSON data for the page layer.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;

pub use error::{Error, FormatFailure, Result};

use anyhow::Context;
use std::path::{Path, PathBuf};

use config::{Collection, SiteConfig, CONFIG_FILE};
use content::{collection, CorpusLocator, MarkdownFile, MarkdownReader};

/// The main application: configuration plus resolved directories
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: SiteConfig,
    /// Base directory (absolute)
    pub base_dir: PathBuf,
    /// Markdown content root
    pub content_dir: PathBuf,
    /// Output directory
    pub public_dir: PathBuf,
}

impl Folio {
    /// Open a site directory, reading `folio.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> anyhow::Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            SiteConfig::default()
        };

        Self::with_config(base_dir, config)
    }

    /// Build from an explicit configuration.
    ///
    /// `base_dir` is made absolute so that it matches the paths the reader
    /// records.
    pub fn with_config<P: AsRef<Path>>(
        base_dir: P,
        config: SiteConfig,
    ) -> anyhow::Result<Self> {
        let base_dir = std::path::absolute(base_dir.as_ref())
            .with_context(|| format!("Failed to resolve {:?}", base_dir.as_ref()))?;
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        })
    }

    /// Reader configured with the site's missing-date policy
    pub fn reader(&self) -> MarkdownReader {
        MarkdownReader::new().with_missing_date(self.config.missing_date)
    }

    pub fn locator(&self) -> CorpusLocator {
        CorpusLocator::new(&self.content_dir)
    }

    /// Locate and read every document of a collection, newest first
    pub async fn load_collection(&self, collection: &Collection) -> Result<Vec<MarkdownFile>> {
        let paths = self.locator().locate_collection(collection)?;
        let mut files = self.reader().read_many(&paths).await?;
        collection::sort_by_date_desc(&mut files);

        tracing::debug!("Loaded {} documents from {}", files.len(), collection.name);
        Ok(files)
    }

    /// Generate the data files
    pub async fn generate(&self) -> anyhow::Result<()> {
        commands::build::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> anyhow::Result<()> {
        commands::clean::run(self)
    }

    /// Create a new document in a collection
    pub fn new_document(&self, collection: &str, title: &str) -> anyhow::Result<PathBuf> {
        commands::new::create_document(self, collection, title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_new_without_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        assert_eq!(folio.content_dir, dir.path().join("markdown"));
        assert_eq!(folio.public_dir, dir.path().join("public"));
    }

    #[test]
    fn test_new_reads_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "content_dir: content\npublic_dir: dist\n",
        )
        .unwrap();

        let folio = Folio::new(dir.path()).unwrap();
        assert_eq!(folio.content_dir, dir.path().join("content"));
        assert_eq!(folio.public_dir, dir.path().join("dist"));
    }

    #[tokio::test]
    async fn test_load_collection_sorted() {
        let dir = TempDir::new().unwrap();
        let posts = dir.path().join("markdown/posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(posts.join("a.md"), "---\ndate: 2020-01-01\n---\n# Older").unwrap();
        fs::write(posts.join("b.md"), "---\ndate: 2024-01-01\n---\n# Newer").unwrap();

        let folio = Folio::new(dir.path()).unwrap();
        let collection = folio.config.collection("posts").unwrap().clone();
        let files = folio.load_collection(&collection).await.unwrap();

        let titles: Vec<_> = files.iter().map(|f| f.display_title()).collect();
        assert_eq!(titles, vec!["Newer", "Older"]);
    }

    #[tokio::test]
    async fn test_with_config_resolves_relative_base() {
        let dir = TempDir::new_in(".").unwrap();
        let name = dir.path().file_name().unwrap().to_owned();
        let posts = dir.path().join("markdown/posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(posts.join("a.md"), "---\ndate: 2024-01-01\n---\n").unwrap();

        let folio = Folio::with_config(Path::new(&name), SiteConfig::default()).unwrap();
        assert!(folio.base_dir.is_absolute());
        assert!(folio.content_dir.is_absolute());

        let collection = folio.config.collection("posts").unwrap().clone();
        let files = folio.load_collection(&collection).await.unwrap();
        let index = collection::build_index(&files, &folio.content_dir, "");
        assert_eq!(index[0].href, "/posts/a.md");
    }
}
