//! Command-line argument definitions for the race stats updater

use crate::config::PipelineConfig;
use crate::error::{RaceStatsError, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Regenerate the race statistics artifacts from the raw CSV snapshots
///
/// Reads the race results, race metadata, track metadata, standings and
/// calendar snapshots, then writes the next/last race pointers, the
/// standings history and the grouped feature table as JSON.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "race_stats",
    version,
    about = "Turn race result CSV snapshots into feature, standings and fantasy-group JSON"
)]
pub struct Args {
    /// Directory holding the CSV snapshots
    #[arg(short = 'd', long = "data-dir", value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Directory the JSON artifacts are written to
    #[arg(short = 'o', long = "output-dir", value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Configuration file (defaults to <config dir>/race-stats/config.toml when present)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Run date used to find the next and last race (defaults to the local date)
    #[arg(long = "today", value_name = "YYYY-MM-DD", value_parser = parse_date)]
    pub today: Option<NaiveDate>,

    /// Do not copy the race pointers into the data directory
    #[arg(long = "no-mirror")]
    pub no_mirror: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress bars are drawn unless running quietly
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// The explicit run date, or today's local date
    pub fn run_date(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Apply the command-line overrides on top of a loaded configuration
    pub fn apply_overrides(&self, config: &mut PipelineConfig) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if self.no_mirror {
            config.mirror_pointers_to_data_dir = false;
        }
        if !self.show_progress() {
            config.show_progress = false;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.config_file {
            if !path.exists() {
                return Err(RaceStatsError::configuration(format!(
                    "Config file does not exist: {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{}': {}", value, e))
}
