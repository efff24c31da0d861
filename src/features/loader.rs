//! CSV loading for the raw race tables
//!
//! Every table is read eagerly with polars, checked for its required
//! columns and cast to the column types the joins rely on. Text columns
//! are read as strings from the start so values such as car `"00"` keep
//! their leading zeros. Integer columns are cast strictly. Tables that
//! sit on the right-hand side of a join are checked for duplicate keys.

use crate::constants::{columns, CSV_INFER_SCHEMA_ROWS};
use crate::error::{RaceStatsError, Result};
use crate::features::derive::parse_race_date;
use crate::models::{CalendarEntry, StandingsRow};

use polars::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Column name and the type it is cast to after loading.
///
/// `String` columns are read as text; `Int64` columns must hold integers.
pub type ColumnSpec = (&'static str, DataType);

pub fn race_results_columns() -> Vec<ColumnSpec> {
    let mut specs = vec![
        (columns::SEASON_YEAR, DataType::Int64),
        (columns::RACE_NUMBER, DataType::Int64),
        (columns::DRIVER_NAME, DataType::String),
        (columns::CAR_NUMBER, DataType::String),
        (columns::STATUS, DataType::String),
    ];
    // Parsed into positions when stage points are derived
    specs.extend(
        columns::STAGE_COLUMNS
            .iter()
            .map(|(position, _)| (*position, DataType::String)),
    );
    specs
}

pub fn race_data_columns() -> Vec<ColumnSpec> {
    vec![
        (columns::SEASON_YEAR, DataType::Int64),
        (columns::RACE_NUMBER, DataType::Int64),
        (columns::RACE_DATE, DataType::String),
        (columns::TRACK_NAME, DataType::String),
    ]
}

pub fn track_data_columns() -> Vec<ColumnSpec> {
    vec![
        (columns::TRACK_NAME, DataType::String),
        (columns::TRACK_TYPE, DataType::String),
    ]
}

pub fn standings_columns() -> Vec<ColumnSpec> {
    vec![
        (columns::SEASON_YEAR, DataType::Int64),
        (columns::RACE_NUMBER, DataType::Int64),
        (columns::DRIVER_NAME, DataType::String),
        (columns::WINS, DataType::Int64),
        (columns::STAGE_WINS, DataType::Int64),
        (columns::RACE_STAGE_POINTS, DataType::Int64),
        (columns::RACE_FINISH_POINTS, DataType::Int64),
        (columns::RACE_SEASON_POINTS, DataType::Int64),
        (columns::RACE_PLAYOFF_POINTS, DataType::Int64),
    ]
}

pub fn calendar_columns() -> Vec<ColumnSpec> {
    vec![
        (columns::TRACK_NAME, DataType::String),
        (columns::RACE_DATE, DataType::String),
        (columns::SEASON_YEAR, DataType::Int64),
        (columns::RACE_NUMBER, DataType::Int64),
        (columns::SEASON_STAGE, DataType::String),
    ]
}

/// Column names from the header row
fn read_csv_header(path: &Path) -> Result<Vec<PlSmallStr>> {
    let header = CsvReadOptions::default()
        .with_has_header(true)
        .with_n_rows(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(header.get_column_names().into_iter().cloned().collect())
}

/// Read a CSV file with a header row into a DataFrame.
///
/// Columns named in `text_columns` are read as strings; the rest are
/// inferred.
pub fn read_csv_table(path: &Path, text_columns: &[&str]) -> Result<DataFrame> {
    if !path.exists() {
        return Err(RaceStatsError::DataFileNotFound {
            path: path.to_path_buf(),
        });
    }

    let header = read_csv_header(path)?;
    let text_schema: Schema = text_columns
        .iter()
        .filter(|name| header.iter().any(|column| column.as_str() == **name))
        .map(|name| Field::new((*name).into(), DataType::String))
        .collect();

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(CSV_INFER_SCHEMA_ROWS))
        .with_schema_overwrite(Some(Arc::new(text_schema)))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    debug!(
        "Loaded {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(df)
}

/// Check required columns exist and cast them to their expected types.
///
/// Integer casts are strict: a value that cannot be read as an integer
/// fails the load instead of becoming null.
pub fn conform_table(df: DataFrame, table: &str, specs: &[ColumnSpec]) -> Result<DataFrame> {
    for (name, _) in specs {
        if df.get_column_index(name).is_none() {
            return Err(RaceStatsError::missing_column(table, *name));
        }
    }

    let casts: Vec<Expr> = specs
        .iter()
        .map(|(name, dtype)| match dtype {
            DataType::String => col(*name).cast(DataType::String),
            dtype => col(*name).strict_cast(dtype.clone()),
        })
        .collect();

    Ok(df.lazy().with_columns(casts).collect()?)
}

/// Read and conform a table in one step
pub fn load_table(path: &Path, table: &str, specs: &[ColumnSpec]) -> Result<DataFrame> {
    let text_columns: Vec<&str> = specs
        .iter()
        .filter(|(_, dtype)| *dtype == DataType::String)
        .map(|(name, _)| *name)
        .collect();
    conform_table(read_csv_table(path, &text_columns)?, table, specs)
}

/// Fail when any key combination occurs on more than one row
pub fn ensure_unique_keys(df: &DataFrame, table: &str, keys: &[&str]) -> Result<()> {
    let key_exprs: Vec<Expr> = keys.iter().map(|k| col(*k)).collect();
    let duplicates = df
        .clone()
        .lazy()
        .group_by(key_exprs)
        .agg([len().alias("rows")])
        .filter(col("rows").gt(lit(1)))
        .collect()?;

    if duplicates.height() > 0 {
        return Err(RaceStatsError::DuplicateKeys {
            table: table.to_string(),
            keys: keys.join(", "),
            count: duplicates.height(),
        });
    }
    Ok(())
}

/// Keep every column except those named in `excluded`
pub fn without_columns(df: &DataFrame, excluded: &[&str]) -> Result<DataFrame> {
    let kept: Vec<PlSmallStr> = df
        .get_column_names()
        .into_iter()
        .filter(|name| !excluded.contains(&name.as_str()))
        .cloned()
        .collect();
    Ok(df.select(kept)?)
}

fn required<T>(value: Option<T>, table: &str, column: &str, row: usize) -> Result<T> {
    value.ok_or_else(|| RaceStatsError::MissingValue {
        table: table.to_string(),
        column: column.to_string(),
        row,
    })
}

/// Convert a conformed calendar table into typed entries
pub fn calendar_entries(df: &DataFrame) -> Result<Vec<CalendarEntry>> {
    const TABLE: &str = "calendar";

    let tracks = df.column(columns::TRACK_NAME)?.str()?;
    let dates = df.column(columns::RACE_DATE)?.str()?;
    let seasons = df.column(columns::SEASON_YEAR)?.i64()?;
    let races = df.column(columns::RACE_NUMBER)?.i64()?;
    let stages = df.column(columns::SEASON_STAGE)?.str()?;

    let mut entries = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let raw_date = required(dates.get(row), TABLE, columns::RACE_DATE, row)?;
        let race_date = parse_race_date(raw_date).ok_or_else(|| RaceStatsError::DateParse {
            table: TABLE.to_string(),
            value: raw_date.to_string(),
        })?;

        entries.push(CalendarEntry {
            track_name: required(tracks.get(row), TABLE, columns::TRACK_NAME, row)?.to_string(),
            race_date,
            season_year: required(seasons.get(row), TABLE, columns::SEASON_YEAR, row)?,
            race_number: required(races.get(row), TABLE, columns::RACE_NUMBER, row)?,
            season_stage: stages.get(row).unwrap_or_default().to_string(),
        });
    }
    Ok(entries)
}

/// Convert a conformed standings table into typed rows.
///
/// Missing counts and points are read as zero.
pub fn standings_rows(df: &DataFrame) -> Result<Vec<StandingsRow>> {
    const TABLE: &str = "standings";

    let seasons = df.column(columns::SEASON_YEAR)?.i64()?;
    let races = df.column(columns::RACE_NUMBER)?.i64()?;
    let drivers = df.column(columns::DRIVER_NAME)?.str()?;
    let wins = df.column(columns::WINS)?.i64()?;
    let stage_wins = df.column(columns::STAGE_WINS)?.i64()?;
    let stage_points = df.column(columns::RACE_STAGE_POINTS)?.i64()?;
    let finish_points = df.column(columns::RACE_FINISH_POINTS)?.i64()?;
    let season_points = df.column(columns::RACE_SEASON_POINTS)?.i64()?;
    let playoff_points = df.column(columns::RACE_PLAYOFF_POINTS)?.i64()?;

    let mut rows = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        rows.push(StandingsRow {
            season_year: required(seasons.get(row), TABLE, columns::SEASON_YEAR, row)?,
            race_number: required(races.get(row), TABLE, columns::RACE_NUMBER, row)?,
            driver_name: required(drivers.get(row), TABLE, columns::DRIVER_NAME, row)?
                .to_string(),
            wins: wins.get(row).unwrap_or(0),
            stage_wins: stage_wins.get(row).unwrap_or(0),
            race_stage_points: stage_points.get(row).unwrap_or(0),
            race_finish_points: finish_points.get(row).unwrap_or(0),
            race_season_points: season_points.get(row).unwrap_or(0),
            race_playoff_points: playoff_points.get(row).unwrap_or(0),
        });
    }
    Ok(rows)
}

/// Track name to track type, as given by the track metadata table
pub fn track_types(df: &DataFrame) -> Result<HashMap<String, String>> {
    let names = df.column(columns::TRACK_NAME)?.str()?;
    let types = df.column(columns::TRACK_TYPE)?.str()?;

    Ok(names
        .into_iter()
        .zip(types.into_iter())
        .filter_map(|(name, track_type)| Some((name?.to_string(), track_type?.to_string())))
        .collect())
}

/// Car numbers per season and driver, keyed by race number
#[derive(Debug, Clone, Default)]
pub struct CarNumbers {
    by_driver: HashMap<(i64, String), BTreeMap<i64, String>>,
}

impl CarNumbers {
    /// Index the car number of every result row
    pub fn from_results(df: &DataFrame) -> Result<Self> {
        let seasons = df.column(columns::SEASON_YEAR)?.i64()?;
        let races = df.column(columns::RACE_NUMBER)?.i64()?;
        let drivers = df.column(columns::DRIVER_NAME)?.str()?;
        let cars = df.column(columns::CAR_NUMBER)?.str()?;

        let mut index = Self::default();
        for row in 0..df.height() {
            if let (Some(season), Some(race), Some(driver), Some(car)) = (
                seasons.get(row),
                races.get(row),
                drivers.get(row),
                cars.get(row),
            ) {
                index.insert(season, race, driver, car);
            }
        }
        Ok(index)
    }

    pub fn insert(&mut self, season: i64, race: i64, driver: &str, car: &str) {
        self.by_driver
            .entry((season, driver.to_string()))
            .or_default()
            .insert(race, car.to_string());
    }

    /// Car number used in `race`, or in the latest earlier race of the season
    pub fn as_of(&self, season: i64, race: i64, driver: &str) -> Option<&str> {
        self.by_driver
            .get(&(season, driver.to_string()))?
            .range(..=race)
            .next_back()
            .map(|(_, car)| car.as_str())
    }
}
