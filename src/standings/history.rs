//! Standings history across seasons

use super::composer::{compose_season_standings, races_in_season};
use crate::features::loader::CarNumbers;
use crate::models::{CalendarEntry, StandingsRecord, StandingsRow};

use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use tracing::debug;

/// Standings after every race of every season in `seasons`.
///
/// Each entry carries the car number the driver used as of that race and
/// the race date from the calendar, when known.
pub fn build_history(
    rows: &[StandingsRow],
    seasons: &[i64],
    calendar: &[CalendarEntry],
    car_numbers: &CarNumbers,
    show_progress: bool,
) -> Vec<StandingsRecord> {
    let race_dates: HashMap<(i64, i64), String> = calendar
        .iter()
        .map(|entry| {
            (
                (entry.season_year, entry.race_number),
                entry.race_date.format("%Y-%m-%d").to_string(),
            )
        })
        .collect();

    let races: Vec<(i64, i64)> = seasons
        .iter()
        .flat_map(|&season| {
            races_in_season(rows, season)
                .into_iter()
                .map(move |race| (season, race))
        })
        .collect();

    let pb = history_progress_bar(races.len() as u64, show_progress);
    let mut history = Vec::new();

    for (season, race) in races {
        pb.set_message(format!("{season} race {race}"));
        let standings = compose_season_standings(rows, race, season);
        debug!("{} drivers in {} standings after race {}", standings.len(), season, race);

        history.extend(standings.into_iter().map(|standing| {
            let car_number = car_numbers
                .as_of(season, race, &standing.driver_name)
                .map(str::to_string);
            let race_date = race_dates.get(&(season, race)).cloned();
            StandingsRecord::new(standing, car_number, race_date)
        }));
        pb.inc(1);
    }

    pb.finish_and_clear();
    history
}

fn history_progress_bar(total: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} standings {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}
