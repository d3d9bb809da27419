//! Build the static data files

use anyhow::Result;

use crate::generator::Generator;
use crate::Folio;

/// Generate data for every collection
pub async fn run(folio: &Folio) -> Result<()> {
    let start = std::time::Instant::now();

    let summary = Generator::new(folio).generate().await?;

    tracing::info!(
        "Generated {} documents in {} collections in {:.2}s",
        summary.documents,
        summary.collections,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
