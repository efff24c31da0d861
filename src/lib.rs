//! Race statistics pipeline
//!
//! Turns raw motor-racing CSV snapshots into the JSON artifacts a stats
//! front end reads:
//! - a per-driver, per-race feature table with normalized statuses,
//!   corrected track types and stage points
//! - the next and last race relative to the run date
//! - season-to-date standings after every race
//! - fantasy league groups assigned from the current standings

pub mod config;
pub mod constants;
pub mod error;
pub mod features;
pub mod models;
pub mod standings;
pub mod updater;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

pub use config::PipelineConfig;
pub use error::{RaceStatsError, Result};
pub use features::{FeatureProcessor, PreparedDataset};
pub use models::{
    FantasyGroups, LastRaceRecord, NextRaceRecord, RacePointer, RaceSlot, StandingsEntry, UpdateReport,
};
pub use standings::compose_season_standings;
pub use updater::DataUpdater;
