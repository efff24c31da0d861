//! Season-to-date standings composition

use crate::models::{StandingsEntry, StandingsRow};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Default)]
struct Totals {
    wins: i64,
    stage_wins: i64,
    race_stage_points: i64,
    race_finish_points: i64,
    race_season_points: i64,
    race_playoff_points: i64,
}

/// Standings of `season_year` after race `race_number`.
///
/// Every row of the season up to and including `race_number` is summed
/// per driver. Drivers are ranked by season points, then wins, then stage
/// wins, with the driver name as a final tie-break; `position` starts at 1.
pub fn compose_season_standings(
    rows: &[StandingsRow],
    race_number: i64,
    season_year: i64,
) -> Vec<StandingsEntry> {
    let mut totals: HashMap<&str, Totals> = HashMap::new();

    for row in rows
        .iter()
        .filter(|row| row.season_year == season_year && row.race_number <= race_number)
    {
        let driver = totals.entry(row.driver_name.as_str()).or_default();
        driver.wins += row.wins;
        driver.stage_wins += row.stage_wins;
        driver.race_stage_points += row.race_stage_points;
        driver.race_finish_points += row.race_finish_points;
        driver.race_season_points += row.race_season_points;
        driver.race_playoff_points += row.race_playoff_points;
    }

    let mut ranked: Vec<(&str, Totals)> = totals.into_iter().collect();
    ranked.sort_by(|(a_name, a), (b_name, b)| {
        b.race_season_points
            .cmp(&a.race_season_points)
            .then(b.wins.cmp(&a.wins))
            .then(b.stage_wins.cmp(&a.stage_wins))
            .then(a_name.cmp(b_name))
    });

    ranked
        .into_iter()
        .enumerate()
        .map(|(index, (driver_name, t))| StandingsEntry {
            driver_name: driver_name.to_string(),
            position: index as u32 + 1,
            wins: t.wins,
            stage_wins: t.stage_wins,
            race_stage_points: t.race_stage_points,
            race_finish_points: t.race_finish_points,
            race_season_points: t.race_season_points,
            race_playoff_points: t.race_playoff_points,
            race_number,
            season_year,
        })
        .collect()
}

/// Race numbers with at least one standings row in `season_year`, ascending
pub fn races_in_season(rows: &[StandingsRow], season_year: i64) -> Vec<i64> {
    rows.iter()
        .filter(|row| row.season_year == season_year)
        .map(|row| row.race_number)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Seasons with at least one standings row, ascending
pub fn seasons_present(rows: &[StandingsRow]) -> Vec<i64> {
    rows.iter()
        .map(|row| row.season_year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
