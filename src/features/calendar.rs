//! Next and last race resolution against the season calendar

use crate::error::{RaceStatsError, Result};
use crate::features::derive::track_type_override;
use crate::models::{CalendarEntry, RacePointer};

use chrono::NaiveDate;
use std::collections::HashMap;

/// The races either side of the run date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RacePointers {
    pub next: RacePointer,
    pub last: RacePointer,
}

/// Track type for a calendar race: fixed overrides first, then the track table
pub fn resolve_track_type(track_name: &str, track_types: &HashMap<String, String>) -> Option<String> {
    track_type_override(track_name)
        .map(str::to_string)
        .or_else(|| track_types.get(track_name).cloned())
}

/// Resolve the last race (latest date strictly before `today`) and the
/// next race (earliest date strictly after the last race).
pub fn resolve_race_pointers(
    calendar: &[CalendarEntry],
    today: NaiveDate,
    track_types: &HashMap<String, String>,
) -> Result<RacePointers> {
    let last_date = calendar
        .iter()
        .map(|entry| entry.race_date)
        .filter(|date| *date < today)
        .max()
        .ok_or(RaceStatsError::NoPastRace { today })?;

    let next_date = calendar
        .iter()
        .map(|entry| entry.race_date)
        .filter(|date| *date > last_date)
        .min()
        .ok_or(RaceStatsError::NoUpcomingRace { after: last_date })?;

    Ok(RacePointers {
        next: pointer_on(calendar, next_date, track_types)?,
        last: pointer_on(calendar, last_date, track_types)?,
    })
}

fn pointer_on(
    calendar: &[CalendarEntry],
    date: NaiveDate,
    track_types: &HashMap<String, String>,
) -> Result<RacePointer> {
    let mut on_date = calendar.iter().filter(|entry| entry.race_date == date);

    let entry = on_date
        .next()
        .ok_or(RaceStatsError::AmbiguousCalendarDate { date, count: 0 })?;
    let extra = on_date.count();
    if extra > 0 {
        return Err(RaceStatsError::AmbiguousCalendarDate {
            date,
            count: extra + 1,
        });
    }

    Ok(RacePointer {
        date,
        season: entry.season_year,
        number: entry.race_number,
        track: entry.track_name.clone(),
        track_type: resolve_track_type(&entry.track_name, track_types),
    })
}
