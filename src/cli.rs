use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a page view in the visit log and the interest summary.
    Log(LogArgs),
    /// Print the recent-visit log, most recent first.
    Recent(StoreArgs),
    /// Check whether a page has been visited more than once.
    Revisit(RevisitArgs),
    /// Print all summarized tags, most popular first.
    Popular(StoreArgs),
    /// Print per-series view counts and the most viewed series.
    Series(StoreArgs),
    /// Clear the persisted visit log and interest summary.
    Reset(StoreArgs),
}

#[derive(Debug, Args)]
pub struct StoreArgs {
    /// Directory holding the persisted history documents.
    #[arg(long)]
    pub store: String,
}

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Directory holding the persisted history documents.
    #[arg(long)]
    pub store: String,

    /// Path to a page descriptor JSON file, or `-` for stdin.
    #[arg(long, default_value = "-")]
    pub page: String,

    /// Reference day (days since epoch) to date the summary entry with.
    /// Defaults to today.
    #[arg(long)]
    pub day: Option<i64>,
}

#[derive(Debug, Args)]
pub struct RevisitArgs {
    /// Directory holding the persisted history documents.
    #[arg(long)]
    pub store: String,

    /// Page id to check.
    #[arg(long)]
    pub page_id: String,
}
