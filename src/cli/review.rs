use std::path::PathBuf;

use tracing::info;

use crate::cli::commands::ReviewArgs;
use crate::db::Database;
use crate::errors::TriageError;
use crate::review::{self, snapshot, TerminalPrompt};

pub async fn handle_review(args: ReviewArgs) -> Result<(), TriageError> {
    let snapshot_path = PathBuf::from(&args.overrides);
    let overrides = snapshot::load(&snapshot_path)?;
    info!(entries = overrides.len(), "Loaded override snapshot");

    let db = Database::new(&args.db)?;
    db.replace_overrides(&overrides)?;

    // rustyline blocks, so the whole loop runs on a blocking task.
    let loop_db = db.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let mut prompt = TerminalPrompt::new()?;
        review::run_review(&loop_db, &mut prompt)
    })
    .await
    .map_err(|e| TriageError::Internal(format!("Review task failed: {}", e)))??;

    snapshot::save(&snapshot_path, &db.all_overrides()?)?;
    info!(
        reviewed = outcome.reviewed,
        skipped = outcome.skipped,
        "Review session finished"
    );
    Ok(())
}
