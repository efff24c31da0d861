//! Command execution for the race stats CLI
//!
//! Sets up logging, loads the layered configuration, runs the update and
//! prints a summary of what was written.

use crate::cli::args::Args;
use crate::config::PipelineConfig;
use crate::models::{RacePointer, UpdateReport};
use crate::updater::DataUpdater;

use anyhow::Context;
use colored::*;
use indicatif::HumanDuration;
use tracing::{debug, info};

/// Run one update with the given arguments
pub async fn run(args: Args) -> anyhow::Result<UpdateReport> {
    setup_logging(&args)?;
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {:?}", config);

    let today = args.run_date();
    let updater = DataUpdater::new(config);
    let report = updater.update(today).await.with_context(|| {
        format!(
            "Failed to update artifacts from {}",
            updater.config().data_dir.display()
        )
    })?;

    if !args.quiet {
        print_report(&report);
    }
    Ok(report)
}

fn setup_logging(args: &Args) -> anyhow::Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("race_stats={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Defaults, then config file, then environment, then command-line flags
fn load_configuration(args: &Args) -> anyhow::Result<PipelineConfig> {
    let default_config_path = match &args.config_file {
        Some(_) => None,
        None => PipelineConfig::default_config_path().ok(),
    };

    let config_file = match &args.config_file {
        Some(path) => Some(path.as_path()),
        None => default_config_path
            .as_deref()
            .filter(|path| path.exists()),
    };

    match config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => info!("No config file found, using defaults and environment variables"),
    }

    let mut config = PipelineConfig::load_layered(config_file)?;
    args.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

fn describe_race(pointer: &RacePointer) -> String {
    format!(
        "{} #{} {} ({}, {})",
        pointer.season,
        pointer.number,
        pointer.track,
        pointer.track_type.as_deref().unwrap_or("unknown type"),
        pointer.date
    )
}

fn print_report(report: &UpdateReport) {
    println!("\n{}", "Update complete".bright_green().bold());

    println!("  {} {}", "Last race:".bright_cyan(), describe_race(&report.last_race));
    println!("  {} {}", "Next race:".bright_cyan(), describe_race(&report.next_race));

    println!(
        "  {} {} rows for {} drivers",
        "Features:".bright_cyan(),
        report.dataset_rows.to_string().bright_white().bold(),
        report.drivers.to_string().bright_white().bold()
    );
    println!(
        "  {} {} records",
        "Standings:".bright_cyan(),
        report.standings_records.to_string().bright_white().bold()
    );
    println!(
        "  {} {} drivers",
        "Fantasy groups:".bright_cyan(),
        report.grouped_drivers.to_string().bright_white().bold()
    );

    println!("  {}", "Written:".bright_cyan());
    for path in &report.written {
        println!("    {}", path.display());
    }
    println!(
        "  {} {}",
        "Elapsed:".bright_cyan(),
        HumanDuration(report.processing_time)
    );
}
