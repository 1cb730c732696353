use std::collections::BTreeMap;

use crate::errors::TriageError;
use crate::models::Classification;

use super::Database;

impl Database {
    /// Record one manual verdict. Written immediately so an interrupted
    /// review session never loses entered judgments.
    pub fn upsert_override(
        &self,
        docid: &str,
        classification: Classification,
    ) -> Result<(), TriageError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO manual_classifications (docid, manual_classification) VALUES (?1, ?2)",
            rusqlite::params![docid, classification.as_str()],
        )
        .map_err(|e| TriageError::Database(format!("Failed to record override: {}", e)))?;
        Ok(())
    }

    pub fn get_override(&self, docid: &str) -> Result<Option<Classification>, TriageError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT manual_classification FROM manual_classifications WHERE docid = ?1")
            .map_err(|e| TriageError::Database(format!("Query failed: {}", e)))?;

        match stmt.query_row(rusqlite::params![docid], |row| row.get::<_, String>(0)) {
            Ok(token) => Classification::from_token(&token)
                .map(Some)
                .map_err(|e| TriageError::Database(format!("Stored override invalid: {}", e))),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(TriageError::Database(format!("Query error: {}", e))),
        }
    }

    /// Replace the whole override table from a snapshot mapping.
    pub fn replace_overrides(
        &self,
        overrides: &BTreeMap<String, Classification>,
    ) -> Result<(), TriageError> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM manual_classifications", [])
            .map_err(|e| TriageError::Database(format!("Failed to clear overrides: {}", e)))?;
        for (docid, classification) in overrides {
            conn.execute(
                "INSERT INTO manual_classifications (docid, manual_classification) VALUES (?1, ?2)",
                rusqlite::params![docid, classification.as_str()],
            )
            .map_err(|e| TriageError::Database(format!("Failed to insert override: {}", e)))?;
        }
        Ok(())
    }

    pub fn all_overrides(&self) -> Result<BTreeMap<String, Classification>, TriageError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT docid, manual_classification FROM manual_classifications")
            .map_err(|e| TriageError::Database(format!("Query failed: {}", e)))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| TriageError::Database(format!("Query error: {}", e)))?;

        let mut overrides = BTreeMap::new();
        for row in rows {
            let (docid, token) =
                row.map_err(|e| TriageError::Database(format!("Row error: {}", e)))?;
            let classification = Classification::from_token(&token)
                .map_err(|e| TriageError::Database(format!("Stored override invalid: {}", e)))?;
            overrides.insert(docid, classification);
        }
        Ok(overrides)
    }
}
