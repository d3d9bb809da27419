//! Validate every document without writing output

use anyhow::Result;
use futures::future::join_all;
use std::path::PathBuf;

use crate::Folio;

/// Outcome of checking the whole corpus
#[derive(Debug, Default)]
pub struct CheckReport {
    pub checked: usize,
    pub failures: Vec<(PathBuf, String)>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Read each document on its own so that every failure gets reported
pub async fn check(folio: &Folio) -> Result<CheckReport> {
    let locator = folio.locator();
    let reader = folio.reader();
    let mut report = CheckReport::default();

    for collection in &folio.config.collections {
        let paths = locator.locate_collection(collection)?;
        let results = join_all(paths.iter().map(|path| reader.read(path))).await;

        for (path, result) in paths.into_iter().zip(results) {
            report.checked += 1;
            if let Err(e) = result {
                tracing::warn!("{}", e);
                report.failures.push((path, e.to_string()));
            }
        }
    }

    Ok(report)
}

pub async fn run(folio: &Folio) -> Result<()> {
    let report = check(folio).await?;

    for (path, message) in &report.failures {
        println!("FAIL {}: {}", path.display(), message);
    }
    println!(
        "Checked {} documents, {} failed",
        report.checked,
        report.failures.len()
    );

    if !report.is_ok() {
        anyhow::bail!("{} documents failed validation", report.failures.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_check_reports_every_failure() {
        let dir = TempDir::new().unwrap();
        let posts = dir.path().join("markdown/posts");
        let projects = dir.path().join("markdown/projects");
        fs::create_dir_all(&posts).unwrap();
        fs::create_dir_all(&projects).unwrap();
        fs::write(posts.join("ok.md"), "---\ndate: 2024-01-01\n---\n").unwrap();
        fs::write(posts.join("no-date.md"), "---\ntitle: x\n---\n").unwrap();
        fs::write(projects.join("garbled.md"), "---\ntitle: [\n---\n").unwrap();

        let folio = Folio::with_config(dir.path(), SiteConfig::default()).unwrap();
        let report = check(&folio).await.unwrap();

        assert_eq!(report.checked, 3);
        let failed: Vec<_> = report
            .failures
            .iter()
            .map(|(p, _)| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(failed, vec!["no-date.md", "garbled.md"]);
        assert!(run(&folio).await.is_err());
    }
}
