//! Create a new document in a collection

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::Folio;

/// Write a scaffolded document and return its path
pub fn create_document(folio: &Folio, collection: &str, title: &str) -> Result<PathBuf> {
    if folio.config.collection(collection).is_none() {
        let known: Vec<_> = folio
            .config
            .collections
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        anyhow::bail!(
            "Unknown collection: {}. Available: {}",
            collection,
            known.join(", ")
        );
    }

    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title {:?} does not produce a usable file name", title);
    }

    let target_dir = folio.content_dir.join(collection);
    fs::create_dir_all(&target_dir)
        .with_context(|| format!("Failed to create {:?}", target_dir))?;

    let file_path = target_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let date = chrono::Local::now().format("%Y-%m-%d");
    let content = format!(
        "---\ntitle: {}\ndate: {}\ndraft: true\n---\n\n# {}\n",
        serde_json::to_string(title)?,
        date,
        title
    );
    fs::write(&file_path, content)?;

    tracing::info!("Created {:?}", file_path);
    Ok(file_path)
}
