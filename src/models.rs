//! Core data structures and types for the race statistics pipeline.
//!
//! Defines normalized race statuses, calendar entries, race pointers,
//! standings rows and the statistics reported after an update.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Normalized outcome of a driver's race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RaceStatus {
    Finished,
    Crash,
    Dq,
    Failure,
}

impl RaceStatus {
    /// Fold a raw status string into one of the four categories.
    ///
    /// Matching is exact. Everything other than `running`, `crash` and
    /// `disqualified`, including a missing value, becomes `Failure`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("running") => RaceStatus::Finished,
            Some("crash") => RaceStatus::Crash,
            Some("disqualified") => RaceStatus::Dq,
            _ => RaceStatus::Failure,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RaceStatus::Finished => "finished",
            RaceStatus::Crash => "crash",
            RaceStatus::Dq => "dq",
            RaceStatus::Failure => "failure",
        }
    }
}

/// One scheduled race from the calendar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEntry {
    pub track_name: String,
    pub race_date: NaiveDate,
    pub season_year: i64,
    pub race_number: i64,
    pub season_stage: String,
}

/// Which of the two race pointer files a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceSlot {
    Next,
    Last,
}

impl RaceSlot {
    pub fn prefix(&self) -> &'static str {
        match self {
            RaceSlot::Next => "next",
            RaceSlot::Last => "last",
        }
    }
}

/// The race resolved as next or last relative to the run date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RacePointer {
    pub date: NaiveDate,
    pub season: i64,
    pub number: i64,
    pub track: String,
    pub track_type: Option<String>,
}

/// `next_race_data.json` as read by the front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NextRaceRecord {
    #[serde(rename = "next_race_date")]
    pub date: NaiveDate,
    #[serde(rename = "next_race_season")]
    pub season: i64,
    #[serde(rename = "next_race_number")]
    pub number: i64,
    #[serde(rename = "next_race_track")]
    pub track: String,
    #[serde(rename = "next_race_track_type")]
    pub track_type: Option<String>,
}

/// `last_race_data.json` as read by the front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LastRaceRecord {
    #[serde(rename = "last_race_date")]
    pub date: NaiveDate,
    #[serde(rename = "last_race_season")]
    pub season: i64,
    #[serde(rename = "last_race_number")]
    pub number: i64,
    #[serde(rename = "last_race_track")]
    pub track: String,
    #[serde(rename = "last_race_track_type")]
    pub track_type: Option<String>,
}

impl From<&RacePointer> for NextRaceRecord {
    fn from(pointer: &RacePointer) -> Self {
        Self {
            date: pointer.date,
            season: pointer.season,
            number: pointer.number,
            track: pointer.track.clone(),
            track_type: pointer.track_type.clone(),
        }
    }
}

impl From<NextRaceRecord> for RacePointer {
    fn from(record: NextRaceRecord) -> Self {
        Self {
            date: record.date,
            season: record.season,
            number: record.number,
            track: record.track,
            track_type: record.track_type,
        }
    }
}

impl From<&RacePointer> for LastRaceRecord {
    fn from(pointer: &RacePointer) -> Self {
        Self {
            date: pointer.date,
            season: pointer.season,
            number: pointer.number,
            track: pointer.track.clone(),
            track_type: pointer.track_type.clone(),
        }
    }
}

impl From<LastRaceRecord> for RacePointer {
    fn from(record: LastRaceRecord) -> Self {
        Self {
            date: record.date,
            season: record.season,
            number: record.number,
            track: record.track,
            track_type: record.track_type,
        }
    }
}

/// One driver's contribution in a single race, as stored in `standings.csv`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StandingsRow {
    pub season_year: i64,
    pub race_number: i64,
    pub driver_name: String,
    pub wins: i64,
    pub stage_wins: i64,
    pub race_stage_points: i64,
    pub race_finish_points: i64,
    pub race_season_points: i64,
    pub race_playoff_points: i64,
}

/// A driver's season-to-date standing as of a given race
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingsEntry {
    pub driver_name: String,
    pub position: u32,
    pub wins: i64,
    pub stage_wins: i64,
    pub race_stage_points: i64,
    pub race_finish_points: i64,
    pub race_season_points: i64,
    pub race_playoff_points: i64,
    pub race_number: i64,
    pub season_year: i64,
}

/// A standings entry enriched for `standings.json`.
///
/// `season_points` and `playoff_points` repeat the `race_*` totals under the
/// names the standings page reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingsRecord {
    #[serde(flatten)]
    pub standing: StandingsEntry,
    pub season_points: i64,
    pub playoff_points: i64,
    pub car_number: Option<String>,
    pub race_date: Option<String>,
}

impl StandingsRecord {
    pub fn new(standing: StandingsEntry, car_number: Option<String>, race_date: Option<String>) -> Self {
        Self {
            season_points: standing.race_season_points,
            playoff_points: standing.race_playoff_points,
            standing,
            car_number,
            race_date,
        }
    }
}

/// Group of the open fantasy league
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OpenGroup {
    #[serde(rename = "I-II")]
    OneTwo,
    #[serde(rename = "III")]
    Three,
    #[serde(rename = "IV")]
    Four,
}

impl OpenGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpenGroup::OneTwo => "I-II",
            OpenGroup::Three => "III",
            OpenGroup::Four => "IV",
        }
    }
}

/// Group of the star fantasy league
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StarGroup {
    #[serde(rename = "I")]
    One,
    #[serde(rename = "II")]
    Two,
    #[serde(rename = "III")]
    Three,
    #[serde(rename = "IV")]
    Four,
}

impl StarGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            StarGroup::One => "I",
            StarGroup::Two => "II",
            StarGroup::Three => "III",
            StarGroup::Four => "IV",
        }
    }
}

/// Fantasy group labels for one driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FantasyGroups {
    pub driver_name: String,
    pub open_group: OpenGroup,
    pub star_group: StarGroup,
}

/// Statistics and artifacts produced by one update run
#[derive(Debug)]
pub struct UpdateReport {
    pub dataset_rows: usize,
    pub drivers: usize,
    pub standings_records: usize,
    pub grouped_drivers: usize,
    pub next_race: RacePointer,
    pub last_race: RacePointer,
    pub written: Vec<PathBuf>,
    pub processing_time: Duration,
}
