use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "visitor-log")]
#[command(about = "Imports and deduplicates institutional visitor logs", long_about = None)]
pub struct Cli {
    /// SQLite database file (overrides `database_path` from Config.toml)
    #[arg(long, global = true)]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import one CSV export and print the number of new visitors
    Import(ImportArgs),
    /// Import every CSV file under the configured import paths
    ImportAll(RowPolicyArgs),
    /// Recompute per-institution statistics
    RecomputeStats,
    /// Show the last computed statistics
    Stats,
    /// Display the number of stored visitors per institution
    Count,
    /// List recent import runs
    History {
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// CSV file to import
    pub file: PathBuf,

    /// Institution identifier stamped on every record
    #[arg(long)]
    pub institution: Option<String>,

    #[command(flatten)]
    pub policy: RowPolicyArgs,
}

#[derive(Debug, Args)]
pub struct RowPolicyArgs {
    /// Log and skip rows with unknown dates or missing columns instead of
    /// aborting the import
    #[arg(long)]
    pub skip_bad_rows: bool,
}
