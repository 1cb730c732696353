use clap::{Args, Parser, Subcommand};

pub const DEFAULT_LISTING_URL: &str = "https://www.us-cert.gov/ics/advisories";

#[derive(Parser)]
#[command(name = "icsa-triage", version, about = "ICS advisory crawler and memory-safety triage")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Crawl the advisory listing and classify every advisory
    Crawl(CrawlArgs),
    /// Interactively review advisories with an ambiguous verdict
    Review(ReviewArgs),
    /// Report synthesized classification counts
    Report(ReportArgs),
    /// Validate a weakness vocabulary file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct CrawlArgs {
    /// SQLite database path
    #[arg(long, default_value = "./advisories.db")]
    pub db: String,

    /// YAML weakness vocabulary file
    #[arg(long, default_value = "./cwe_classification.yaml")]
    pub vocabulary: String,

    /// Advisory listing start URL
    #[arg(long, default_value = DEFAULT_LISTING_URL)]
    pub listing_url: String,

    /// Courtesy delay before each fetch, in milliseconds
    #[arg(long, default_value = "1000")]
    pub delay_ms: u64,
}

#[derive(Args, Clone)]
pub struct ReviewArgs {
    /// SQLite database path
    #[arg(long, default_value = "./advisories.db")]
    pub db: String,

    /// YAML manual override snapshot
    #[arg(long, default_value = "./manual_classification.yaml")]
    pub overrides: String,
}

#[derive(Args, Clone)]
pub struct ReportArgs {
    /// SQLite database path
    #[arg(long, default_value = "./advisories.db")]
    pub db: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Vocabulary file to validate
    pub vocabulary: String,
}
