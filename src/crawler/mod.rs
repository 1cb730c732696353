pub mod listing;

use std::time::Duration;

use tracing::{debug, info};
use url::Url;

use crate::classifier;
use crate::db::Database;
use crate::errors::TriageError;
use crate::fetch::Fetch;
use crate::models::{Advisory, AdvisorySummary};
use crate::parser;
use crate::vocabulary::Vocabulary;

use listing::parse_listing_page;

/// Cursor over the paginated advisory index. Yields one page of summaries at
/// a time; a fresh pager repeats the walk from the start. There is no
/// mid-stream restart.
pub struct ListingPager<'a> {
    fetcher: &'a dyn Fetch,
    next_url: Option<Url>,
    pages_seen: usize,
    delay: Duration,
}

impl<'a> ListingPager<'a> {
    pub fn new(fetcher: &'a dyn Fetch, start_url: Url, delay: Duration) -> Self {
        Self {
            fetcher,
            next_url: Some(start_url),
            pages_seen: 0,
            delay,
        }
    }

    pub fn pages_seen(&self) -> usize {
        self.pages_seen
    }

    pub async fn next_page(&mut self) -> Result<Option<Vec<AdvisorySummary>>, TriageError> {
        let Some(url) = self.next_url.take() else {
            return Ok(None);
        };

        tokio::time::sleep(self.delay).await;
        let response = self.fetcher.fetch(url.as_str()).await?;
        if !(200..300).contains(&response.status) {
            return Err(TriageError::Listing(format!(
                "Listing page {} returned status {}",
                url, response.status
            )));
        }

        let page = parse_listing_page(&response.body, &url)?;
        self.pages_seen += 1;
        debug!(url = %url, entries = page.summaries.len(), "Parsed listing page");

        match page.next_url {
            Some(next) => self.next_url = Some(next),
            None if self.pages_seen == 1 => {
                // The index is known to span many pages; a lone page without
                // a pager means the listing markup changed.
                return Err(TriageError::Listing(format!(
                    "No next-page link found on {}",
                    url
                )));
            }
            None => {}
        }

        Ok(Some(page.summaries))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CrawlSummary {
    pub pages: usize,
    pub advisories: usize,
}

/// Walk the full advisory index, fetch and classify every advisory, and
/// replace the advisory table with the results.
pub async fn run_crawl(
    db: &Database,
    fetcher: &dyn Fetch,
    vocabulary: &Vocabulary,
    listing_url: &str,
    delay: Duration,
) -> Result<CrawlSummary, TriageError> {
    let start_url = Url::parse(listing_url)
        .map_err(|e| TriageError::Config(format!("Invalid listing URL {:?}: {}", listing_url, e)))?;

    db.clear_advisories()?;

    let mut pager = ListingPager::new(fetcher, start_url, delay);
    let mut advisories = 0usize;
    while let Some(page) = pager.next_page().await? {
        for summary in page {
            let advisory = fetch_advisory(fetcher, vocabulary, summary, delay).await?;
            db.insert_advisory(&advisory)?;
            info!(
                docid = %advisory.docid,
                classification = %advisory.automatic,
                weaknesses = ?advisory.weakness_ids,
                "Stored advisory"
            );
            advisories += 1;
        }
    }

    Ok(CrawlSummary {
        pages: pager.pages_seen(),
        advisories,
    })
}

async fn fetch_advisory(
    fetcher: &dyn Fetch,
    vocabulary: &Vocabulary,
    summary: AdvisorySummary,
    delay: Duration,
) -> Result<Advisory, TriageError> {
    tokio::time::sleep(delay).await;
    let response = fetcher.fetch(&summary.url).await?;
    if !(200..300).contains(&response.status) {
        return Err(TriageError::Network(format!(
            "Advisory {} returned status {}",
            summary.url, response.status
        )));
    }

    let parsed = parser::parse(&response.body)?;
    let automatic = classifier::classify(&parsed.weakness_ids, vocabulary);

    Ok(Advisory {
        docid: summary.docid,
        url: summary.url,
        title: summary.title,
        html: response.body,
        weakness_ids: parsed.weakness_ids,
        automatic,
    })
}
