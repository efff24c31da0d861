//! Configuration management and validation.
//!
//! Provides the pipeline configuration: where the raw CSV snapshots live,
//! where artifacts are written, which drivers and seasons are kept, and
//! the file names of every input and output. Configuration is layered:
//! defaults, then an optional TOML file, then environment variables, then
//! command-line overrides applied by the caller.

use crate::constants::{
    self, CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_DATA_DIR, DEFAULT_OUTPUT_DIR,
    DEFAULT_ROSTER, DEFAULT_SEASONS,
};
use crate::error::{RaceStatsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Names of the raw CSV snapshots inside the data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFiles {
    pub race_results: String,
    pub race_data: String,
    pub track_data: String,
    pub standings: String,
    pub calendar: String,
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            race_results: constants::RACE_RESULTS_FILE.to_string(),
            race_data: constants::RACE_DATA_FILE.to_string(),
            track_data: constants::TRACK_DATA_FILE.to_string(),
            standings: constants::STANDINGS_FILE.to_string(),
            calendar: constants::CALENDAR_FILE.to_string(),
        }
    }
}

/// Names of the JSON artifacts inside the output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputFiles {
    pub next_race: String,
    pub last_race: String,
    pub standings: String,
    pub dataset: String,
}

impl Default for OutputFiles {
    fn default() -> Self {
        Self {
            next_race: constants::NEXT_RACE_FILE.to_string(),
            last_race: constants::LAST_RACE_FILE.to_string(),
            standings: constants::STANDINGS_OUTPUT_FILE.to_string(),
            dataset: constants::DATASET_OUTPUT_FILE.to_string(),
        }
    }
}

/// Global configuration for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding the raw CSV snapshots
    pub data_dir: PathBuf,

    /// Directory the JSON artifacts are written to
    pub output_dir: PathBuf,

    /// Drivers kept in the feature table (empty keeps everyone)
    pub roster: Vec<String>,

    /// Seasons kept in the feature table and standings history (empty keeps all)
    pub seasons: Vec<i64>,

    /// Also write the next/last race pointers into the data directory
    pub mirror_pointers_to_data_dir: bool,

    /// Draw a progress bar while composing the standings history
    pub show_progress: bool,

    pub inputs: InputFiles,

    pub outputs: OutputFiles,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            roster: DEFAULT_ROSTER.iter().map(|s| s.to_string()).collect(),
            seasons: DEFAULT_SEASONS.to_vec(),
            mirror_pointers_to_data_dir: true,
            show_progress: true,
            inputs: InputFiles::default(),
            outputs: OutputFiles::default(),
        }
    }
}

impl PipelineConfig {
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_roster<I, S>(mut self, roster: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roster = roster.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_seasons(mut self, seasons: impl Into<Vec<i64>>) -> Self {
        self.seasons = seasons.into();
        self
    }

    /// Keep every driver and every season found in the data
    pub fn without_filters(mut self) -> Self {
        self.roster.clear();
        self.seasons.clear();
        self
    }

    pub fn without_pointer_mirror(mut self) -> Self {
        self.mirror_pointers_to_data_dir = false;
        self
    }

    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn input_path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    /// Roster as a lookup set, or `None` when every driver is kept
    pub fn roster_filter(&self) -> Option<HashSet<&str>> {
        if self.roster.is_empty() {
            None
        } else {
            Some(self.roster.iter().map(String::as_str).collect())
        }
    }

    /// Season list as a lookup set, or `None` when every season is kept
    pub fn season_filter(&self) -> Option<HashSet<i64>> {
        if self.seasons.is_empty() {
            None
        } else {
            Some(self.seasons.iter().copied().collect())
        }
    }

    /// Default config file location, e.g. `~/.config/race-stats/config.toml`
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            RaceStatsError::configuration("Could not determine user config directory")
        })?;
        Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse a TOML config file; missing keys fall back to defaults
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RaceStatsError::configuration(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content).map_err(|e| {
            RaceStatsError::configuration(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load defaults, then the config file (if any), then environment variables
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => {
                debug!("Loading config file {}", path.display());
                Self::from_toml_file(path)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(constants::env::DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(constants::env::OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(seasons) = lookup(constants::env::SEASONS) {
            self.seasons = parse_season_list(&seasons)?;
        }
        Ok(())
    }

    /// Check the configuration is usable before any file is touched
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(RaceStatsError::configuration("data_dir must not be empty"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(RaceStatsError::configuration("output_dir must not be empty"));
        }

        let outputs = [
            &self.outputs.next_race,
            &self.outputs.last_race,
            &self.outputs.standings,
            &self.outputs.dataset,
        ];
        let unique: HashSet<_> = outputs.iter().collect();
        if unique.len() != outputs.len() {
            return Err(RaceStatsError::configuration(
                "output file names must be distinct",
            ));
        }

        if let Some(season) = self.seasons.iter().find(|s| **s < 1949) {
            return Err(RaceStatsError::configuration(format!(
                "season {} predates the championship",
                season
            )));
        }
        Ok(())
    }
}

/// Parse a comma-separated season list such as `2023,2024,2025`
pub fn parse_season_list(value: &str) -> Result<Vec<i64>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>().map_err(|_| {
                RaceStatsError::configuration(format!("invalid season '{}'", s))
            })
        })
        .collect()
}
