use serde::Serialize;

use super::classification::Classification;

/// One entry from the paginated advisory listing, consumed once to drive a
/// per-advisory fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisorySummary {
    pub docid: String,
    pub url: String,
    pub title: String,
}

/// A fully fetched and classified advisory, as stored by a crawl run.
#[derive(Debug, Clone, Serialize)]
pub struct Advisory {
    pub docid: String,
    pub url: String,
    pub title: String,
    pub html: String,
    /// Deduplicated, ordered by (length, lexical) for stable display.
    pub weakness_ids: Vec<String>,
    pub automatic: Classification,
}
