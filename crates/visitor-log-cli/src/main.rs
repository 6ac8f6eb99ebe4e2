mod commands;
mod logging;
mod progress;

use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, ImportArgs, RowPolicyArgs};
use dotenv::dotenv;
use progress::CliReporter;
use visitor_log_core::importer::{self, ImportOptions, ImportSummary};
use visitor_log_core::{scanner, tasks, AppConfig, Database, RowErrorPolicy};
use tracing::{error, info};

/// Exits through the return value so `_guard` flushes the log file.
fn main() -> ExitCode {
    dotenv().ok();

    let _guard = logging::init_logger();

    let mut config = match visitor_log_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let args = Cli::parse();
    if let Some(database) = args.database {
        config.database_path = database;
    }

    let result = match args.command {
        Some(Commands::Import(import_args)) => run_import(&config, import_args),
        Some(Commands::ImportAll(policy)) => run_import_all(&config, policy),
        Some(Commands::RecomputeStats) => {
            if tasks::run_stats(&config.database_path) {
                Ok(())
            } else {
                Err(anyhow::anyhow!("statistics recompute failed"))
            }
        }
        Some(Commands::Stats) => print_stats(&config),
        Some(Commands::Count) => print_counts(&config),
        Some(Commands::History { limit }) => print_history(&config, limit),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
            Ok(())
        }
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn import_options(config: &AppConfig, institution: Option<String>, policy: &RowPolicyArgs) -> ImportOptions {
    let mut options = ImportOptions::from(config);
    if let Some(institution) = institution {
        options.institution = institution;
    }
    if policy.skip_bad_rows {
        options.on_row_error = RowErrorPolicy::Skip;
    }
    options
}

fn open_database(config: &AppConfig) -> anyhow::Result<Database> {
    Database::open(&config.database_path)
        .with_context(|| format!("opening database {}", config.database_path))
}

fn run_import(config: &AppConfig, args: ImportArgs) -> anyhow::Result<()> {
    let db = open_database(config)?;
    let options = import_options(config, args.institution, &args.policy);
    let reporter = CliReporter::new();

    let summary = importer::run_import(&db, &args.file, options, &reporter)
        .with_context(|| format!("importing {}", args.file.display()))?;

    print_summary(&summary);
    println!("{}", summary.inserted);
    Ok(())
}

fn run_import_all(config: &AppConfig, policy: RowPolicyArgs) -> anyhow::Result<()> {
    if config.import_paths.is_empty() {
        bail!("no import_paths configured");
    }

    let files = scanner::find_csv_files(&config.import_paths, &config.ignore_patterns)?;
    info!("Found {} CSV files", files.len());

    let db = open_database(config)?;
    let options = import_options(config, None, &policy);
    let reporter = CliReporter::new();
    let mut total_inserted = 0;

    for file in &files {
        let summary = importer::run_import(&db, file, options.clone(), &reporter)
            .with_context(|| format!("importing {}", file.display()))?;
        print_summary(&summary);
        total_inserted += summary.inserted;
    }

    info!(
        "{} new visitors from {} files",
        format!("{}", total_inserted).green(),
        files.len()
    );
    println!("{}", total_inserted);
    Ok(())
}

fn print_summary(summary: &ImportSummary) {
    info!(
        "{} new, {} duplicates in file, {} already stored, {} conflicts, {} skipped ({} rows in {})",
        format!("{}", summary.inserted).green(),
        format!("{}", summary.duplicates_in_file).yellow(),
        format!("{}", summary.duplicates_in_store).yellow(),
        format!("{}", summary.conflicts).yellow(),
        format!("{}", summary.skipped_rows).red(),
        summary.rows_read,
        format!("{:.2}s", summary.duration.as_secs_f64()).green(),
    );
}

fn print_stats(config: &AppConfig) -> anyhow::Result<()> {
    let db = open_database(config)?;
    let stats = db.get_institution_stats()?;
    if stats.is_empty() {
        println!("No statistics yet; run `recompute-stats`.");
        return Ok(());
    }
    for s in stats {
        println!(
            "{:<24} {:>10} visits {:>10} visitors  {} .. {}  ({})",
            s.institution.cyan(),
            s.visit_count,
            s.distinct_visitors,
            s.first_visit.as_deref().unwrap_or("-"),
            s.last_visit.as_deref().unwrap_or("-"),
            s.computed_at,
        );
    }
    Ok(())
}

fn print_counts(config: &AppConfig) -> anyhow::Result<()> {
    let db = open_database(config)?;
    for (institution, count) in db.count_visitors_by_institution()? {
        println!("{:<24} {:>10}", institution.cyan(), count);
    }
    println!("{:<24} {:>10}", "total".bold(), db.count_visitors()?);
    Ok(())
}

fn print_history(config: &AppConfig, limit: i64) -> anyhow::Result<()> {
    let db = open_database(config)?;
    for session in db.list_import_sessions(0, limit)? {
        println!(
            "#{:<5} {} {:<16} {:>6} rows {:>6} new {:>6} dupes {:>4} skipped  {}",
            session.id,
            session.completed_at,
            session.institution.cyan(),
            session.rows_read,
            format!("{}", session.inserted).green(),
            session.duplicates_in_file + session.duplicates_in_store + session.conflicts,
            session.skipped_rows,
            session.file_path,
        );
    }
    Ok(())
}
