use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use icsa_triage::crawler;
use icsa_triage::db::Database;
use icsa_triage::errors::TriageError;
use icsa_triage::fetch::{Fetch, FetchedBody};
use icsa_triage::models::Classification;
use icsa_triage::review::{self, snapshot, ReviewPrompt};
use icsa_triage::vocabulary::Vocabulary;

struct StubFetcher {
    responses: HashMap<String, String>,
}

#[async_trait]
impl Fetch for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedBody, TriageError> {
        self.responses
            .get(url)
            .map(|body| FetchedBody {
                status: 200,
                body: body.clone(),
            })
            .ok_or_else(|| TriageError::Network(format!("No stub response for {}", url)))
    }
}

struct ScriptedPrompt {
    responses: Vec<String>,
    next: usize,
}

impl ScriptedPrompt {
    fn new(responses: &[&str]) -> Self {
        Self {
            responses: responses.iter().map(|s| s.to_string()).collect(),
            next: 0,
        }
    }
}

impl ReviewPrompt for ScriptedPrompt {
    fn ask(&mut self, _prompt: &str) -> Result<String, TriageError> {
        let response = self
            .responses
            .get(self.next)
            .cloned()
            .ok_or_else(|| TriageError::Internal("Prompt script exhausted".to_string()))?;
        self.next += 1;
        Ok(response)
    }
}

fn listing_item(docid: &str, href: &str, title: &str) -> String {
    format!(
        "<li>\
         <div class=\"views-field-field-ics-docid-advisory\">\
         <span class=\"field-content\">{}</span></div>\
         <div class=\"views-field-title\">\
         <span class=\"field-content\"><a href=\"{}\">{}</a></span></div>\
         </li>",
        docid, href, title
    )
}

fn listing_page(items: &str, next_href: Option<&str>) -> String {
    let pager = match next_href {
        Some(href) => format!(
            "<ul><li class=\"pager__item--next\"><a href=\"{}\">Next</a></li></ul>",
            href
        ),
        None => String::new(),
    };
    format!(
        "<html><body>\
         <div class=\"view-ics-advisories\"><div class=\"view-content\"><ul>{}</ul></div></div>\
         {}\
         </body></html>",
        items, pager
    )
}

fn advisory_page(overview: &str) -> String {
    format!(
        "<html><body><article class=\"ics-advisory\">\
         <h3>1. EXECUTIVE SUMMARY</h3><p>Summary text.</p>\
         <h3>3.2 VULNERABILITY OVERVIEW</h3>{}\
         <h3>4.1 BACKGROUND</h3><p>Vendor background.</p>\
         </article></body></html>",
        overview
    )
}

fn fixture_fetcher() -> StubFetcher {
    let mut responses = HashMap::new();
    responses.insert(
        "https://example.com/ics/advisories".to_string(),
        listing_page(
            &format!(
                "{}{}",
                listing_item("ICSA-20-001-01", "/adv/1", "Controller Overflow"),
                listing_item("ICSA-20-002-01", "/adv/2", "Gateway CSRF"),
            ),
            Some("/ics/advisories?page=1"),
        ),
    );
    responses.insert(
        "https://example.com/ics/advisories?page=1".to_string(),
        listing_page(
            &listing_item("ICSA-20-003-01", "/adv/3", "Historian Mystery"),
            None,
        ),
    );
    responses.insert(
        "https://example.com/adv/1".to_string(),
        advisory_page("<p>Stack-based buffer overflow CWE-121 in the controller.</p>"),
    );
    responses.insert(
        "https://example.com/adv/2".to_string(),
        advisory_page("<p>Cross-site request forgery CWE-352 in the gateway.</p>"),
    );
    responses.insert(
        "https://example.com/adv/3".to_string(),
        advisory_page("<p>An unclassified weakness CWE-9999 in the historian.</p>"),
    );
    StubFetcher { responses }
}

fn vocabulary() -> Vocabulary {
    Vocabulary::from_yaml_str("CWE-121: yes\nCWE-352: no\n").unwrap()
}

#[tokio::test]
async fn test_crawl_classify_report_pipeline() {
    let db = Database::in_memory().unwrap();
    let fetcher = fixture_fetcher();

    let summary = crawler::run_crawl(
        &db,
        &fetcher,
        &vocabulary(),
        "https://example.com/ics/advisories",
        Duration::ZERO,
    )
    .await
    .unwrap();

    assert_eq!(summary.pages, 2);
    assert_eq!(summary.advisories, 3);

    let counts = db.synthesized_counts().unwrap();
    assert_eq!(
        counts,
        vec![
            (Classification::Maybe, 1),
            (Classification::No, 1),
            (Classification::Yes, 1),
        ]
    );
}

#[tokio::test]
async fn test_manual_review_feeds_synthesis() {
    let db = Database::in_memory().unwrap();
    let fetcher = fixture_fetcher();

    crawler::run_crawl(
        &db,
        &fetcher,
        &vocabulary(),
        "https://example.com/ics/advisories",
        Duration::ZERO,
    )
    .await
    .unwrap();

    // Only the unclassified historian advisory needs review.
    let mut prompt = ScriptedPrompt::new(&["y"]);
    let outcome = review::run_review(&db, &mut prompt).unwrap();
    assert_eq!(outcome.reviewed, 1);

    let counts = db.synthesized_counts().unwrap();
    assert_eq!(
        counts,
        vec![(Classification::No, 1), (Classification::Yes, 2)]
    );

    // The manual verdict wins over the automatic one.
    let synthesized = db.synthesize().unwrap();
    let historian = synthesized
        .iter()
        .find(|s| s.docid == "ICSA-20-003-01")
        .unwrap();
    assert_eq!(historian.classification, Classification::Yes);
    assert_eq!(
        db.automatic_classification("ICSA-20-003-01").unwrap(),
        Some(Classification::Maybe)
    );
}

#[test]
fn test_override_snapshot_roundtrip_through_store() {
    let db = Database::in_memory().unwrap();
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("manual_classification.yaml");

    std::fs::write(
        &path,
        "ICSA-20-001-01: no\nICSA-20-003-01: yes\n",
    )
    .unwrap();

    let loaded = snapshot::load(&path).unwrap();
    db.replace_overrides(&loaded).unwrap();

    let exported = db.all_overrides().unwrap();
    snapshot::save(&path, &exported).unwrap();

    assert_eq!(snapshot::load(&path).unwrap(), loaded);
}

#[tokio::test]
async fn test_recrawl_is_idempotent() {
    let db = Database::in_memory().unwrap();
    let fetcher = fixture_fetcher();

    for _ in 0..2 {
        crawler::run_crawl(
            &db,
            &fetcher,
            &vocabulary(),
            "https://example.com/ics/advisories",
            Duration::ZERO,
        )
        .await
        .unwrap();
    }

    assert_eq!(db.advisory_count().unwrap(), 3);
}
