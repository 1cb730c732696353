use chrono::{DateTime, Utc};

use crate::errors::TriageError;
use crate::fetch::FetchedBody;

use super::Database;

impl Database {
    pub fn cached_response(
        &self,
        url: &str,
    ) -> Result<Option<(FetchedBody, DateTime<Utc>)>, TriageError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT status, body, fetched_at FROM fetch_cache WHERE url = ?1")
            .map_err(|e| TriageError::Database(format!("Query failed: {}", e)))?;

        match stmt.query_row(rusqlite::params![url], |row| {
            Ok((
                FetchedBody {
                    status: row.get::<_, i64>(0)? as u16,
                    body: row.get(1)?,
                },
                row.get::<_, String>(2)?,
            ))
        }) {
            Ok((response, fetched_at)) => {
                let fetched_at = DateTime::parse_from_rfc3339(&fetched_at)
                    .map_err(|e| {
                        TriageError::Database(format!("Cached timestamp invalid: {}", e))
                    })?
                    .with_timezone(&Utc);
                Ok(Some((response, fetched_at)))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(TriageError::Database(format!("Query error: {}", e))),
        }
    }

    pub fn store_response(&self, url: &str, response: &FetchedBody) -> Result<(), TriageError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO fetch_cache (url, status, body, fetched_at) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                url,
                response.status as i64,
                response.body,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| TriageError::Database(format!("Failed to cache response: {}", e)))?;
        Ok(())
    }
}
