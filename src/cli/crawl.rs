use std::path::Path;
use std::time::Duration;

use tracing::info;

use crate::cli::commands::CrawlArgs;
use crate::crawler;
use crate::db::Database;
use crate::errors::TriageError;
use crate::fetch::CachedClient;
use crate::vocabulary::Vocabulary;

pub async fn handle_crawl(args: CrawlArgs) -> Result<(), TriageError> {
    info!(listing = %args.listing_url, "Starting advisory crawl");

    let vocabulary = Vocabulary::load(Path::new(&args.vocabulary))?;
    let db = Database::new(&args.db)?;
    let fetcher = CachedClient::new(db.clone())?;

    let summary = crawler::run_crawl(
        &db,
        &fetcher,
        &vocabulary,
        &args.listing_url,
        Duration::from_millis(args.delay_ms),
    )
    .await?;

    info!(
        pages = summary.pages,
        advisories = summary.advisories,
        "Crawl completed"
    );
    println!(
        "Crawled {} advisories across {} pages",
        summary.advisories, summary.pages
    );
    Ok(())
}
