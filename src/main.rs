use clap::Parser;
use tracing_subscriber::EnvFilter;

use icsa_triage::cli::{self, Cli, Commands};
use icsa_triage::errors::TriageError;
use icsa_triage::vocabulary::Vocabulary;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .init();

    let result = match cli.command {
        Commands::Crawl(args) => cli::crawl::handle_crawl(args).await,
        Commands::Review(args) => cli::review::handle_review(args).await,
        Commands::Report(args) => cli::report::handle_report(args).await,
        Commands::Validate(args) => handle_validate(args).await,
    };

    match result {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            let exit_code = match &e {
                TriageError::Config(_)
                | TriageError::Vocabulary(_)
                | TriageError::Snapshot(_) => 2,
                TriageError::Network(_) => 3,
                TriageError::Listing(_) | TriageError::Parse(_) => 4,
                TriageError::Database(_) => 5,
                _ => 1,
            };
            std::process::exit(exit_code);
        }
    }
}

async fn handle_validate(args: cli::commands::ValidateArgs) -> Result<(), TriageError> {
    let vocabulary = Vocabulary::load(std::path::Path::new(&args.vocabulary))?;
    println!(
        "Vocabulary is valid: {} ({} entries)",
        args.vocabulary,
        vocabulary.len()
    );
    Ok(())
}
