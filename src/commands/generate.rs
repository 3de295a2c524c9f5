//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::store::ContentStore;
use crate::Blog;

/// Generate the static site from the store
pub async fn run(blog: &Blog, store: &dyn ContentStore) -> Result<()> {
    let start = std::time::Instant::now();

    let generator = Generator::new(blog, store)?;
    let report = generator.generate().await?;

    if !report.skipped.is_empty() {
        tracing::warn!("Skipped {} posts: {}", report.skipped.len(), report.skipped.join(", "));
    }

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} post pages and a listing of {} in {:.2}s",
        report.post_pages,
        report.listing_posts,
        duration.as_secs_f64()
    );

    Ok(())
}
