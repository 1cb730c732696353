use serde::Serialize;

use crate::errors::TriageError;
use crate::models::Classification;

use super::Database;

/// Final verdict for one advisory: the manual override when present, the
/// automatic classification otherwise. Derived at query time, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesizedClassification {
    pub docid: String,
    pub classification: Classification,
}

const SYNTHESIS_QUERY: &str = "SELECT advisories.docid, \
    CASE \
    WHEN manual_classifications.manual_classification IS NOT NULL \
    THEN manual_classifications.manual_classification \
    ELSE advisories.automatic_classification \
    END AS classification \
    FROM advisories \
    LEFT OUTER JOIN manual_classifications \
    ON advisories.docid = manual_classifications.docid";

impl Database {
    /// Merge both stores into one verdict per advisory, recomputed on every
    /// call.
    pub fn synthesize(&self) -> Result<Vec<SynthesizedClassification>, TriageError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(&format!("{} ORDER BY advisories.docid", SYNTHESIS_QUERY))
            .map_err(|e| TriageError::Database(format!("Query failed: {}", e)))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| TriageError::Database(format!("Query error: {}", e)))?;

        let mut entries = Vec::new();
        for row in rows {
            let (docid, token) =
                row.map_err(|e| TriageError::Database(format!("Row error: {}", e)))?;
            let classification = Classification::from_token(&token).map_err(|e| {
                TriageError::Database(format!("Stored classification invalid: {}", e))
            })?;
            entries.push(SynthesizedClassification {
                docid,
                classification,
            });
        }
        Ok(entries)
    }

    /// Count advisories per synthesized verdict, ordered by verdict token for
    /// deterministic output.
    pub fn synthesized_counts(&self) -> Result<Vec<(Classification, usize)>, TriageError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT classification, COUNT(*) FROM ({}) GROUP BY classification ORDER BY classification",
                SYNTHESIS_QUERY
            ))
            .map_err(|e| TriageError::Database(format!("Query failed: {}", e)))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })
            .map_err(|e| TriageError::Database(format!("Query error: {}", e)))?;

        let mut counts = Vec::new();
        for row in rows {
            let (token, count) =
                row.map_err(|e| TriageError::Database(format!("Row error: {}", e)))?;
            let classification = Classification::from_token(&token).map_err(|e| {
                TriageError::Database(format!("Stored classification invalid: {}", e))
            })?;
            counts.push((classification, count as usize));
        }
        Ok(counts)
    }
}
