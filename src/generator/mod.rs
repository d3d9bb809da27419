//! Generator module - writes normalised documents as JSON data files
//!
//! Layout of the public directory:
//!
//! ```text
//! public/site.json                  site metadata
//! public/<collection>.json          listing, newest first
//! public/<collection>/<path>.json   one rendered document
//! ```

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::config::Collection;
use crate::content::{
    collection, Heading, IndexEntry, MarkdownFile, MarkdownPath, MarkdownRenderer,
};
use crate::Folio;

/// Everything the page layer needs to render one document
#[derive(Debug, Clone, Serialize)]
pub struct DocumentPage {
    pub title: String,
    pub description: String,
    pub markdown: MarkdownFile,
    pub html: String,
    pub headings: Vec<Heading>,
}

#[derive(Debug, Serialize)]
struct SiteData<'a> {
    title: &'a str,
    description: &'a str,
    author: &'a str,
    url: &'a str,
    collections: Vec<&'a str>,
}

/// Counts reported after a build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub collections: usize,
    pub documents: usize,
}

/// Static data generator
pub struct Generator<'a> {
    folio: &'a Folio,
    renderer: MarkdownRenderer,
}

impl<'a> Generator<'a> {
    pub fn new(folio: &'a Folio) -> Self {
        Self {
            folio,
            renderer: MarkdownRenderer::from_config(&folio.config.highlight),
        }
    }

    /// Generate data files for every configured collection.
    ///
    /// Every collection is loaded before anything is written, so a bad
    /// document leaves the public directory untouched.
    pub async fn generate(&self) -> Result<BuildSummary> {
        let mut loaded = Vec::new();
        for collection in &self.folio.config.collections {
            loaded.push((collection, self.load(collection).await?));
        }

        let public_dir = &self.folio.public_dir;
        fs::create_dir_all(public_dir)
            .await
            .with_context(|| format!("Failed to create {:?}", public_dir))?;

        let mut summary = BuildSummary::default();
        for (collection, files) in &loaded {
            summary.documents += self.write_collection(collection, files).await?;
            summary.collections += 1;
        }

        self.write_site_data().await?;
        Ok(summary)
    }

    /// Generate one collection, returning the number of documents written
    pub async fn generate_collection(&self, collection: &Collection) -> Result<usize> {
        let files = self.load(collection).await?;
        self.write_collection(collection, &files).await
    }

    /// Read a collection and drop the documents that are not published
    async fn load(&self, collection: &Collection) -> Result<Vec<MarkdownFile>> {
        let files = self
            .folio
            .load_collection(collection)
            .await
            .with_context(|| format!("Failed to load collection {}", collection.name))?;
        Ok(collection::published(files, self.folio.config.render_drafts))
    }

    async fn write_collection(
        &self,
        collection: &Collection,
        files: &[MarkdownFile],
    ) -> Result<usize> {
        let collection_dir = self.folio.public_dir.join(&collection.name);
        for file in files {
            let target = self.document_target(&collection_dir, file);
            let page = self.document_page(file.clone());
            write_json(&target, &page).await?;
        }

        let index = self.index(files);
        write_json(
            &self.folio.public_dir.join(format!("{}.json", collection.name)),
            &index,
        )
        .await?;

        tracing::info!("Generated {} ({} documents)", collection.name, files.len());
        Ok(files.len())
    }

    /// Listing entries for already ordered files
    pub fn index(&self, files: &[MarkdownFile]) -> Vec<IndexEntry> {
        collection::build_index(files, &self.folio.content_dir, &self.folio.config.url)
    }

    /// Render a document and attach its page metadata
    pub fn document_page(&self, markdown: MarkdownFile) -> DocumentPage {
        let rendered = self.renderer.render(&markdown.content);
        let title = markdown
            .frontmatter
            .title
            .clone()
            .unwrap_or_else(|| markdown.name.clone());
        let description = markdown
            .frontmatter
            .description
            .clone()
            .unwrap_or_else(|| markdown.name.clone());

        DocumentPage {
            title,
            description,
            markdown,
            html: rendered.html,
            headings: rendered.headings,
        }
    }

    /// Mirror the source layout: `posts/2024/a.md` -> `public/posts/2024/a.json`
    fn document_target(&self, collection_dir: &Path, file: &MarkdownFile) -> PathBuf {
        let source = MarkdownPath::new(&self.folio.content_dir).join_with([&file.path]);
        let relative = source
            .relative()
            .and_then(|rel| {
                let mut components = rel.components();
                components.next()?;
                Some(components.as_path().to_path_buf())
            })
            .filter(|rel| !rel.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(&file.base));

        collection_dir.join(relative).with_extension("json")
    }

    async fn write_site_data(&self) -> Result<()> {
        let config = &self.folio.config;
        let site = SiteData {
            title: &config.title,
            description: &config.description,
            author: &config.author,
            url: &config.url,
            collections: config.collections.iter().map(|c| c.name.as_str()).collect(),
        };
        write_json(&self.folio.public_dir.join("site.json"), &site).await
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {:?}", parent))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {:?}", path))?;
    tracing::debug!("Wrote {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs as stdfs;
    use tempfile::TempDir;

    fn site(dir: &TempDir) -> Folio {
        let posts = dir.path().join("markdown/posts");
        let projects = dir.path().join("markdown/projects/2023");
        stdfs::create_dir_all(&posts).unwrap();
        stdfs::create_dir_all(&projects).unwrap();

        stdfs::write(
            posts.join("hello.md"),
            "---\ntitle: Hello\ndate: 2024-01-01\n---\n# Hello there\n\nFirst post.\n",
        )
        .unwrap();
        stdfs::write(
            posts.join("wip.md"),
            "---\ndate: 2024-02-01\ndraft: true\n---\n# Not yet\n",
        )
        .unwrap();
        stdfs::write(
            projects.join("lisp.md"),
            "---\n{\"date\": \"2023-04-01\", \"languages\": [\"Rust\"]}\n---\n# Tiny Lisp\n\n```rust\nfn eval() {}\n```\n",
        )
        .unwrap();

        let config = SiteConfig {
            url: "https://example.com".to_string(),
            ..SiteConfig::default()
        };
        Folio::with_config(dir.path(), config).unwrap()
    }

    fn read_json(path: PathBuf) -> serde_json::Value {
        serde_json::from_str(&stdfs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_generate_writes_data_files() {
        let dir = TempDir::new().unwrap();
        let folio = site(&dir);

        let summary = Generator::new(&folio).generate().await.unwrap();
        assert_eq!(
            summary,
            BuildSummary {
                collections: 2,
                documents: 2,
            }
        );

        let posts = read_json(folio.public_dir.join("posts.json"));
        let posts = posts.as_array().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0]["href"], "/posts/hello.md");
        assert_eq!(posts[0]["title"], "Hello there");

        let hello = read_json(folio.public_dir.join("posts/hello.json"));
        assert_eq!(hello["title"], "Hello");
        assert_eq!(hello["description"], "hello");
        assert_eq!(hello["markdown"]["firstHeader"], "Hello there");
        assert!(hello["html"].as_str().unwrap().contains("id=\"hello-there\""));

        let lisp = read_json(folio.public_dir.join("projects/2023/lisp.json"));
        assert_eq!(lisp["title"], "lisp");
        assert!(lisp["html"].as_str().unwrap().contains("highlight rust"));

        assert!(!folio.public_dir.join("posts/wip.json").exists());

        let site = read_json(folio.public_dir.join("site.json"));
        assert_eq!(site["collections"], serde_json::json!(["posts", "projects"]));
    }

    #[tokio::test]
    async fn test_render_drafts_includes_drafts() {
        let dir = TempDir::new().unwrap();
        let mut folio = site(&dir);
        folio.config.render_drafts = true;

        let written = Generator::new(&folio)
            .generate_collection(&Collection::new("posts", "posts/**/*.md"))
            .await
            .unwrap();
        assert_eq!(written, 2);

        let posts = read_json(folio.public_dir.join("posts.json"));
        assert_eq!(posts[0]["title"], "Not yet");
        assert_eq!(posts[0]["draft"], true);
    }

    #[tokio::test]
    async fn test_one_bad_document_fails_the_build() {
        let dir = TempDir::new().unwrap();
        let folio = site(&dir);
        stdfs::write(
            dir.path().join("markdown/posts/broken.md"),
            "---\ntitle: no date\n---\n",
        )
        .unwrap();

        let err = Generator::new(&folio).generate().await.unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("posts"));
        assert!(chain.contains("broken.md"));
    }

    #[tokio::test]
    async fn test_failed_build_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let folio = site(&dir);
        stdfs::write(
            dir.path().join("markdown/projects/broken.md"),
            "---\ntitle: no date\n---\n",
        )
        .unwrap();

        let err = Generator::new(&folio).generate().await.unwrap_err();
        assert!(format!("{:#}", err).contains("projects"));
        assert!(!folio.public_dir.exists());
    }

    #[tokio::test]
    async fn test_relative_base_dir_keeps_nested_layout() {
        let dir = TempDir::new_in(".").unwrap();
        let name = dir.path().file_name().unwrap().to_owned();
        site(&dir);
        let folio = Folio::with_config(Path::new(&name), SiteConfig::default()).unwrap();
        assert!(folio.base_dir.is_absolute());

        let projects = dir.path().join("markdown/projects/2024");
        stdfs::create_dir_all(&projects).unwrap();
        stdfs::write(projects.join("lisp.md"), "---\ndate: 2024-05-01\n---\n").unwrap();

        Generator::new(&folio).generate().await.unwrap();

        let listing = read_json(folio.public_dir.join("projects.json"));
        let hrefs: Vec<_> = listing
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["href"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(hrefs, vec!["/projects/2024/lisp.md", "/projects/2023/lisp.md"]);
        assert!(folio.public_dir.join("projects/2023/lisp.json").exists());
        assert!(folio.public_dir.join("projects/2024/lisp.json").exists());
    }
}
