//! Feature derivations over the joined race table
//!
//! Each transformation takes a table and returns a new one; the input is
//! never modified. Scalar rules (status fold, track overrides, stage
//! points, date parsing) are exposed separately so they can be tested on
//! their own.

use crate::constants::{columns, STAGE_POINTS, TRACK_TYPE_OVERRIDES};
use crate::error::{RaceStatsError, Result};
use crate::models::RaceStatus;

use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::HashSet;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%m/%d/%Y"];

/// Parse a race date in any of the formats the snapshots use.
///
/// A trailing time part (`2025-02-16 00:00:00`, `2025-02-16T19:30:00`) is ignored.
pub fn parse_race_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed
        .split(|c| c == 'T' || c == ' ')
        .next()
        .unwrap_or(trimmed);

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

/// Fixed track type for tracks whose metadata is known to be wrong
pub fn track_type_override(track_name: &str) -> Option<&'static str> {
    TRACK_TYPE_OVERRIDES
        .iter()
        .find(|(name, _)| *name == track_name)
        .map(|(_, track_type)| *track_type)
}

/// Points for a stage finishing position; 0 means no stage result
pub fn stage_points(position: i64) -> Option<i64> {
    match position {
        0 => Some(0),
        1..=10 => Some(STAGE_POINTS[(position - 1) as usize]),
        _ => None,
    }
}

/// Read a stage finishing position from its CSV text.
///
/// Integers are accepted as written or with a zero fraction (`"3.0"`).
/// Anything else, including `"2.5"` or `"DNF"`, is `None`.
pub fn parse_stage_position(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(position) = trimmed.parse::<i64>() {
        return Some(position);
    }
    let value = trimmed.parse::<f64>().ok()?;
    (value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64)
        .then_some(value as i64)
}

/// Replace raw statuses with `finished`, `crash`, `dq` or `failure`
pub fn normalize_status(df: &DataFrame) -> Result<DataFrame> {
    let statuses: Vec<&str> = df
        .column(columns::STATUS)?
        .str()?
        .into_iter()
        .map(|raw| RaceStatus::from_raw(raw).as_str())
        .collect();

    let mut out = df.clone();
    out.with_column(Series::new(columns::STATUS.into(), statuses))?;
    Ok(out)
}

/// Overwrite the track type of the overridden tracks, keeping every other value
pub fn correct_track_types(df: &DataFrame) -> Result<DataFrame> {
    let names = df.column(columns::TRACK_NAME)?.str()?;
    let current = df.column(columns::TRACK_TYPE)?.str()?;

    let corrected: Vec<Option<&str>> = names
        .into_iter()
        .zip(current.into_iter())
        .map(|(name, track_type)| name.and_then(track_type_override).or(track_type))
        .collect();

    let mut out = df.clone();
    out.with_column(Series::new(columns::TRACK_TYPE.into(), corrected))?;
    Ok(out)
}

/// Add `stage_N_pts` next to every `stage_N_pos` column.
///
/// Positions arrive as text and are rewritten as integers. A blank or
/// missing position counts as no stage result. A value that is not an
/// integer, or a position outside the points table, fails the whole
/// derivation.
pub fn add_stage_points(df: &DataFrame) -> Result<DataFrame> {
    let mut out = df.clone();

    for (position_column, points_column) in columns::STAGE_COLUMNS {
        let raw = df.column(position_column)?.cast(&DataType::String)?;
        let mut positions = Vec::with_capacity(df.height());
        let mut points = Vec::with_capacity(df.height());

        for value in raw.str()?.into_iter() {
            let value = value.map(str::trim).filter(|v| !v.is_empty());
            let Some(value) = value else {
                positions.push(None);
                points.push(0);
                continue;
            };

            let (position, awarded) = parse_stage_position(value)
                .and_then(|position| Some((position, stage_points(position)?)))
                .ok_or_else(|| RaceStatsError::NoStagePointsMapping {
                    column: position_column.to_string(),
                    value: value.to_string(),
                })?;
            positions.push(Some(position));
            points.push(awarded);
        }

        out.with_column(Series::new(position_column.into(), positions))?;
        out.with_column(Series::new(points_column.into(), points))?;
    }
    Ok(out)
}

/// Rewrite `race_date` as `YYYY-MM-DD` strings
pub fn normalize_race_dates(df: &DataFrame, table: &str) -> Result<DataFrame> {
    let dates = df
        .column(columns::RACE_DATE)?
        .str()?
        .into_iter()
        .map(|raw| match raw {
            None => Ok(None),
            Some(value) => parse_race_date(value)
                .map(|date| Some(date.format("%Y-%m-%d").to_string()))
                .ok_or_else(|| RaceStatsError::DateParse {
                    table: table.to_string(),
                    value: value.to_string(),
                }),
        })
        .collect::<Result<Vec<Option<String>>>>()?;

    let mut out = df.clone();
    out.with_column(Series::new(columns::RACE_DATE.into(), dates))?;
    Ok(out)
}

/// Keep rows whose driver is in `roster`
pub fn filter_roster(df: &DataFrame, roster: &HashSet<&str>) -> Result<DataFrame> {
    let mask: BooleanChunked = df
        .column(columns::DRIVER_NAME)?
        .str()?
        .into_iter()
        .map(|driver| driver.is_some_and(|name| roster.contains(name)))
        .collect();
    Ok(df.filter(&mask)?)
}

/// Keep rows whose season is in `seasons`
pub fn filter_seasons(df: &DataFrame, seasons: &HashSet<i64>) -> Result<DataFrame> {
    let mask: BooleanChunked = df
        .column(columns::SEASON_YEAR)?
        .i64()?
        .into_iter()
        .map(|season| season.is_some_and(|year| seasons.contains(&year)))
        .collect();
    Ok(df.filter(&mask)?)
}

/// Status, track-type and stage-point derivations, in that order
pub fn process_features(df: &DataFrame) -> Result<DataFrame> {
    let df = normalize_status(df)?;
    let df = correct_track_types(&df)?;
    add_stage_points(&df)
}
