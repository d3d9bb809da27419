//! List site content

use anyhow::Result;

use crate::config::Collection;
use crate::content::collection::{build_index, published};
use crate::helpers::{format_date, parse_date};
use crate::Folio;

/// Print the listing of one collection, or of all of them
pub async fn run(folio: &Folio, collection: Option<&str>) -> Result<()> {
    for collection in selected(folio, collection)? {
        let lines = listing(folio, collection).await?;
        println!("{} ({}):", collection.name, lines.len());
        for line in lines {
            println!("  {}", line);
        }
    }
    Ok(())
}

fn selected<'a>(folio: &'a Folio, name: Option<&str>) -> Result<Vec<&'a Collection>> {
    match name {
        None => Ok(folio.config.collections.iter().collect()),
        Some(name) => match folio.config.collection(name) {
            Some(collection) => Ok(vec![collection]),
            None => {
                let known: Vec<_> = folio
                    .config
                    .collections
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect();
                anyhow::bail!("Unknown collection: {}. Available: {}", name, known.join(", "))
            }
        },
    }
}

/// `date - title [href]` for every listed document, newest first
pub async fn listing(folio: &Folio, collection: &Collection) -> Result<Vec<String>> {
    let files = folio.load_collection(collection).await?;
    let files = published(files, folio.config.render_drafts);
    let index = build_index(&files, &folio.content_dir, &folio.config.url);

    Ok(index
        .iter()
        .map(|entry| {
            let date = parse_date(&entry.date)
                .map(|d| format_date(&d, &folio.config.date_format))
                .unwrap_or_else(|| entry.date.clone());
            format!("{} - {} [{}]", date, entry.title, entry.href)
        })
        .collect())
}
