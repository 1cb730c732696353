use chrono::Utc;

use crate::errors::TriageError;
use crate::models::{Advisory, Classification};

use super::Database;

/// One advisory row as needed by the manual review loop.
#[derive(Debug, Clone)]
pub struct ReviewCandidate {
    pub docid: String,
    pub title: String,
    pub url: String,
    pub html: String,
}

impl Database {
    /// Drop all advisory rows. Each crawl run fully replaces the table.
    pub fn clear_advisories(&self) -> Result<(), TriageError> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM advisories", [])
            .map_err(|e| TriageError::Database(format!("Failed to clear advisories: {}", e)))?;
        Ok(())
    }

    pub fn insert_advisory(&self, advisory: &Advisory) -> Result<(), TriageError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO advisories (docid, url, title, html, automatic_classification, crawled_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                advisory.docid,
                advisory.url,
                advisory.title,
                advisory.html,
                advisory.automatic.as_str(),
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| TriageError::Database(format!("Failed to insert advisory: {}", e)))?;
        Ok(())
    }

    pub fn advisory_count(&self) -> Result<usize, TriageError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM advisories", [], |row| {
            row.get::<_, i64>(0)
        })
        .map(|count| count as usize)
        .map_err(|e| TriageError::Database(format!("Count failed: {}", e)))
    }

    pub fn automatic_classification(
        &self,
        docid: &str,
    ) -> Result<Option<Classification>, TriageError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT automatic_classification FROM advisories WHERE docid = ?1")
            .map_err(|e| TriageError::Database(format!("Query failed: {}", e)))?;

        match stmt.query_row(rusqlite::params![docid], |row| row.get::<_, String>(0)) {
            Ok(token) => Classification::from_token(&token)
                .map(Some)
                .map_err(|e| TriageError::Database(format!("Stored classification invalid: {}", e))),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(TriageError::Database(format!("Query error: {}", e))),
        }
    }

    /// Advisories with an ambiguous automatic verdict and no manual override,
    /// in docid order so review sessions are reproducible.
    pub fn unreviewed_maybes(&self) -> Result<Vec<ReviewCandidate>, TriageError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT advisories.docid, title, url, html \
                 FROM advisories \
                 LEFT JOIN manual_classifications \
                 ON advisories.docid = manual_classifications.docid \
                 WHERE advisories.automatic_classification = 'maybe' \
                 AND manual_classifications.manual_classification IS NULL \
                 ORDER BY advisories.docid",
            )
            .map_err(|e| TriageError::Database(format!("Query failed: {}", e)))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ReviewCandidate {
                    docid: row.get(0)?,
                    title: row.get(1)?,
                    url: row.get(2)?,
                    html: row.get(3)?,
                })
            })
            .map_err(|e| TriageError::Database(format!("Query error: {}", e)))?;

        let mut candidates = Vec::new();
        for row in rows {
            candidates.push(row.map_err(|e| TriageError::Database(format!("Row error: {}", e)))?);
        }
        Ok(candidates)
    }
}
