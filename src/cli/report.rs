use crate::cli::commands::ReportArgs;
use crate::db::Database;
use crate::errors::TriageError;
use crate::reporting;

pub async fn handle_report(args: ReportArgs) -> Result<(), TriageError> {
    let db = Database::new(&args.db)?;
    let counts = db.synthesized_counts()?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&reporting::counts_json(&counts))?
        );
    } else {
        print!("{}", reporting::format_counts(&counts));
    }
    Ok(())
}
