//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::CONFIG_FILE;

const DEFAULT_CONFIG: &str = r#"# Site
title: Portfolio
description: ''
author: ''
url: http://example.com

# Directory
content_dir: markdown
public_dir: public

# Content
collections:
  - name: posts
    pattern: posts/**/*.md
  - name: projects
    pattern: projects/**/*.md
render_drafts: false
# reject | change-time
missing_date: reject

# Display
date_format: YYYY-MM-DD
highlight:
  theme: base16-ocean.dark
  line_number: true
"#;

/// Create the config file, collection directories and a sample post
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("Site already initialized: {:?}", config_path);
    }

    fs::create_dir_all(target_dir.join("markdown/posts"))?;
    fs::create_dir_all(target_dir.join("markdown/projects"))?;
    fs::write(&config_path, DEFAULT_CONFIG)?;

    let today = chrono::Local::now().format("%Y-%m-%d");
    let sample_post = format!(
        r#"---
title: Hello World
date: {today}
languages:
  - Rust
---

# Hello World

Welcome! Front-matter can be written in YAML, like this post, or as a JSON
object between the same `---` lines.

## Build the site

```bash
$ folio build
```
"#
    );
    fs::write(target_dir.join("markdown/posts/hello-world.md"), sample_post)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::MarkdownReader;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_site_is_readable() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let config = SiteConfig::load(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.collections.len(), 2);

        let post = MarkdownReader::new()
            .read(dir.path().join("markdown/posts/hello-world.md"))
            .await
            .unwrap();
        assert_eq!(post.first_header.as_deref(), Some("Hello World"));
        assert_eq!(post.frontmatter.languages, vec!["Rust"]);
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
