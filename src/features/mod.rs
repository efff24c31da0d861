//! Feature processing for the race results dataset.
//!
//! Loads the raw CSV snapshots, joins them into one row per driver per
//! race, and applies the feature derivations:
//!
//! 1. results ⋈ race metadata on season and race number (inner)
//! 2. ⋈ track metadata on track name (left)
//! 3. ⋈ standings on season, race number and driver (inner)
//! 4. ⋈ calendar season stage on season and race number (inner)
//! 5. roster and season filters
//! 6. status fold, track-type overrides and stage points
//!
//! The next and last race relative to the run date are returned alongside
//! the table in [`PreparedDataset`].

pub mod calendar;
pub mod derive;
pub mod loader;

use self::calendar::{resolve_race_pointers, RacePointers};
use self::loader::CarNumbers;

use crate::config::PipelineConfig;
use crate::constants::columns;
use crate::error::Result;
use crate::models::{CalendarEntry, RacePointer, StandingsRow};

use chrono::NaiveDate;
use polars::prelude::*;
use tracing::{debug, info};

/// Output of [`FeatureProcessor::prepare_dataset`]
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    /// Joined and derived feature table, sorted by driver and race date
    pub table: DataFrame,
    pub next_race: RacePointer,
    pub last_race: RacePointer,
    /// Full calendar, used to date standings history entries
    pub calendar: Vec<CalendarEntry>,
    /// Every standings row, unfiltered
    pub standings: Vec<StandingsRow>,
    /// Car numbers from every result row, unfiltered
    pub car_numbers: CarNumbers,
}

/// Raw tables after loading and type conformance
#[derive(Debug, Clone)]
pub struct RawTables {
    pub results: DataFrame,
    pub race_data: DataFrame,
    pub track_data: DataFrame,
    pub standings: DataFrame,
    pub calendar: DataFrame,
}

/// Joins the raw tables and derives per-race features
#[derive(Debug, Clone)]
pub struct FeatureProcessor {
    config: PipelineConfig,
}

impl FeatureProcessor {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load, join, filter and derive the full feature table
    pub fn prepare_dataset(&self, today: NaiveDate) -> Result<PreparedDataset> {
        let raw = self.load_tables()?;

        let calendar = loader::calendar_entries(&raw.calendar)?;
        let track_types = loader::track_types(&raw.track_data)?;
        let RacePointers { next, last } = resolve_race_pointers(&calendar, today, &track_types)?;
        info!(
            "Last race: {} #{} at {} ({}); next race: {} #{} at {} ({})",
            last.season, last.number, last.track, last.date, next.season, next.number, next.track,
            next.date
        );

        let standings = loader::standings_rows(&raw.standings)?;
        let car_numbers = CarNumbers::from_results(&raw.results)?;

        let joined = join_tables(&raw)?;
        let filtered = self.apply_filters(joined)?;
        let derived = derive::process_features(&filtered)?;
        let table = sort_by_driver_and_date(derived)?;

        info!(
            "Prepared feature table: {} rows, {} columns",
            table.height(),
            table.width()
        );

        Ok(PreparedDataset {
            table,
            next_race: next,
            last_race: last,
            calendar,
            standings,
            car_numbers,
        })
    }

    /// Read every input file and conform its column types
    pub fn load_tables(&self) -> Result<RawTables> {
        let inputs = &self.config.inputs;
        let path = |name: &str| self.config.input_path(name);

        let results = loader::load_table(
            &path(&inputs.race_results),
            "race results",
            &loader::race_results_columns(),
        )?;
        let race_data = loader::load_table(
            &path(&inputs.race_data),
            "race data",
            &loader::race_data_columns(),
        )?;
        let track_data = loader::load_table(
            &path(&inputs.track_data),
            "track data",
            &loader::track_data_columns(),
        )?;
        let standings = loader::load_table(
            &path(&inputs.standings),
            "standings",
            &loader::standings_columns(),
        )?;
        let calendar = loader::load_table(
            &path(&inputs.calendar),
            "calendar",
            &loader::calendar_columns(),
        )?;

        Ok(RawTables {
            results,
            race_data,
            track_data,
            standings,
            calendar,
        })
    }

    fn apply_filters(&self, df: DataFrame) -> Result<DataFrame> {
        let df = match self.config.roster_filter() {
            Some(roster) => derive::filter_roster(&df, &roster)?,
            None => df,
        };
        let df = match self.config.season_filter() {
            Some(seasons) => derive::filter_seasons(&df, &seasons)?,
            None => df,
        };
        debug!("{} rows after roster and season filters", df.height());
        Ok(df)
    }
}

/// Join the raw tables with the fixed inner/left policy of each step
pub fn join_tables(raw: &RawTables) -> Result<DataFrame> {
    let race_keys = [columns::SEASON_YEAR, columns::RACE_NUMBER];
    let driver_keys = [
        columns::SEASON_YEAR,
        columns::RACE_NUMBER,
        columns::DRIVER_NAME,
    ];

    let race_data = loader::without_columns(&raw.race_data, &[columns::RACE_NAME])?;
    let race_data = derive::normalize_race_dates(&race_data, "race data")?;
    loader::ensure_unique_keys(&race_data, "race data", &race_keys)?;

    let track_data = raw
        .track_data
        .select([columns::TRACK_NAME, columns::TRACK_TYPE])?;
    loader::ensure_unique_keys(&track_data, "track data", &[columns::TRACK_NAME])?;

    loader::ensure_unique_keys(&raw.standings, "standings", &driver_keys)?;

    let calendar_stage = raw.calendar.select([
        columns::SEASON_YEAR,
        columns::RACE_NUMBER,
        columns::SEASON_STAGE,
    ])?;
    loader::ensure_unique_keys(&calendar_stage, "calendar", &race_keys)?;

    let with_race = inner_join(raw.results.clone(), race_data, &race_keys)?;
    debug!("{} rows after joining race data", with_race.height());

    let with_track = with_race
        .lazy()
        .join(
            track_data.lazy(),
            [col(columns::TRACK_NAME)],
            [col(columns::TRACK_NAME)],
            JoinArgs::new(JoinType::Left),
        )
        .collect()?;

    let with_standings = inner_join(with_track, raw.standings.clone(), &driver_keys)?;
    debug!("{} rows after joining standings", with_standings.height());

    let with_stage = inner_join(with_standings, calendar_stage, &race_keys)?;
    debug!("{} rows after joining calendar", with_stage.height());

    Ok(with_stage)
}

fn inner_join(left: DataFrame, right: DataFrame, keys: &[&str]) -> Result<DataFrame> {
    let on: Vec<Expr> = keys.iter().map(|k| col(*k)).collect();
    Ok(left
        .lazy()
        .join(right.lazy(), on.clone(), on, JoinArgs::new(JoinType::Inner))
        .collect()?)
}

/// Sort rows by driver name, then race date
pub fn sort_by_driver_and_date(df: DataFrame) -> Result<DataFrame> {
    Ok(df
        .lazy()
        .sort(
            [columns::DRIVER_NAME, columns::RACE_DATE],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?)
}
