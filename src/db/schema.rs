pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS advisories (
    docid TEXT PRIMARY KEY,
    url TEXT NOT NULL,
    title TEXT NOT NULL,
    html TEXT NOT NULL,
    automatic_classification TEXT NOT NULL,
    crawled_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS manual_classifications (
    docid TEXT PRIMARY KEY,
    manual_classification TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS fetch_cache (
    url TEXT PRIMARY KEY,
    status INTEGER NOT NULL,
    body TEXT NOT NULL,
    fetched_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_advisories_classification ON advisories(automatic_classification);
";
