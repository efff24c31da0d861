//! Fantasy league grouping by standings position

use crate::constants::{columns, OPEN_GROUP_LIMITS, STAR_GROUP_LIMITS};
use crate::error::Result;
use crate::models::{FantasyGroups, OpenGroup, StandingsEntry, StarGroup};

use polars::prelude::*;

/// Open league group for a 1-indexed standings position
pub fn open_group(position: u32) -> OpenGroup {
    let (one_two, three) = OPEN_GROUP_LIMITS;
    if position <= one_two {
        OpenGroup::OneTwo
    } else if position <= three {
        OpenGroup::Three
    } else {
        OpenGroup::Four
    }
}

/// Star league group for a 1-indexed standings position
pub fn star_group(position: u32) -> StarGroup {
    let (one, two, three) = STAR_GROUP_LIMITS;
    if position <= one {
        StarGroup::One
    } else if position <= two {
        StarGroup::Two
    } else if position <= three {
        StarGroup::Three
    } else {
        StarGroup::Four
    }
}

/// Both groups for every driver in `standings`, ordered by position
pub fn make_fantasy_groups(standings: &[StandingsEntry]) -> Vec<FantasyGroups> {
    let mut ordered: Vec<&StandingsEntry> = standings.iter().collect();
    ordered.sort_by_key(|entry| entry.position);

    ordered
        .into_iter()
        .map(|entry| FantasyGroups {
            driver_name: entry.driver_name.clone(),
            open_group: open_group(entry.position),
            star_group: star_group(entry.position),
        })
        .collect()
}

/// Groups as a `driver_name`, `open_group`, `star_group` table
pub fn groups_frame(groups: &[FantasyGroups]) -> Result<DataFrame> {
    let drivers: Vec<&str> = groups.iter().map(|g| g.driver_name.as_str()).collect();
    let open: Vec<&str> = groups.iter().map(|g| g.open_group.as_str()).collect();
    let star: Vec<&str> = groups.iter().map(|g| g.star_group.as_str()).collect();

    Ok(DataFrame::new(vec![
        Column::new(columns::DRIVER_NAME.into(), drivers),
        Column::new(columns::OPEN_GROUP.into(), open),
        Column::new(columns::STAR_GROUP.into(), star),
    ])?)
}

/// Left-join the groups onto `table` by driver name.
///
/// Drivers without a standings position keep null groups. Row order of
/// `table` is restored by re-sorting on driver and race date.
pub fn attach_groups(table: &DataFrame, groups: &[FantasyGroups]) -> Result<DataFrame> {
    let groups = groups_frame(groups)?;
    let joined = table
        .clone()
        .lazy()
        .join(
            groups.lazy(),
            [col(columns::DRIVER_NAME)],
            [col(columns::DRIVER_NAME)],
            JoinArgs::new(JoinType::Left),
        )
        .collect()?;
    crate::features::sort_by_driver_and_date(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(driver: &str, position: u32) -> StandingsEntry {
        StandingsEntry {
            driver_name: driver.to_string(),
            position,
            wins: 0,
            stage_wins: 0,
            race_stage_points: 0,
            race_finish_points: 0,
            race_season_points: 0,
            race_playoff_points: 0,
            race_number: 10,
            season_year: 2025,
        }
    }

    #[test]
    fn test_open_group_boundaries() {
        assert_eq!(open_group(1), OpenGroup::OneTwo);
        assert_eq!(open_group(16), OpenGroup::OneTwo);
        assert_eq!(open_group(17), OpenGroup::Three);
        assert_eq!(open_group(28), OpenGroup::Three);
        assert_eq!(open_group(29), OpenGroup::Four);
    }

    #[test]
    fn test_star_group_boundaries() {
        assert_eq!(star_group(10), StarGroup::One);
        assert_eq!(star_group(11), StarGroup::Two);
        assert_eq!(star_group(20), StarGroup::Two);
        assert_eq!(star_group(21), StarGroup::Three);
        assert_eq!(star_group(30), StarGroup::Three);
        assert_eq!(star_group(31), StarGroup::Four);
    }

    #[test]
    fn test_make_fantasy_groups_orders_by_position() {
        let standings = vec![entry("Erik Jones", 29), entry("Denny Hamlin", 2), entry("Josh Berry", 17)];
        let groups = make_fantasy_groups(&standings);

        assert_eq!(groups[0].driver_name, "Denny Hamlin");
        assert_eq!(groups[0].open_group, OpenGroup::OneTwo);
        assert_eq!(groups[0].star_group, StarGroup::One);
        assert_eq!(groups[1].open_group, OpenGroup::Three);
        assert_eq!(groups[1].star_group, StarGroup::Two);
        assert_eq!(groups[2].open_group, OpenGroup::Four);
        assert_eq!(groups[2].star_group, StarGroup::Three);
    }

    #[test]
    fn test_group_labels_serialize_as_roman_numerals() {
        let groups = make_fantasy_groups(&[entry("Cody Ware", 35)]);
        let json = serde_json::to_value(&groups[0]).unwrap();
        assert_eq!(json["open_group"], "IV");
        assert_eq!(json["star_group"], "IV");
    }

    #[test]
    fn test_attach_groups_keeps_unmatched_drivers() {
        let table = df!(
            "driver_name" => ["Chase Elliott", "Chase Elliott", "Unranked Driver"],
            "race_date" => ["2025-02-16", "2025-02-23", "2025-02-16"],
            "race_pos" => [5i64, 12, 30],
        )
        .unwrap();
        let groups = make_fantasy_groups(&[entry("Chase Elliott", 12)]);

        let out = attach_groups(&table, &groups).unwrap();
        assert_eq!(out.height(), 3);

        let open = out.column("open_group").unwrap().str().unwrap();
        let star = out.column("star_group").unwrap().str().unwrap();
        assert_eq!(open.get(0), Some("I-II"));
        assert_eq!(star.get(1), Some("II"));
        assert_eq!(open.get(2), None);
        assert_eq!(star.get(2), None);
    }

    proptest! {
        #[test]
        fn prop_groups_are_monotonic(position in 1u32..60) {
            let rank = |g: OpenGroup| match g { OpenGroup::OneTwo => 0, OpenGroup::Three => 1, OpenGroup::Four => 2 };
            prop_assert!(rank(open_group(position)) <= rank(open_group(position + 1)));

            let star_rank = |g: StarGroup| match g {
                StarGroup::One => 0, StarGroup::Two => 1, StarGroup::Three => 2, StarGroup::Four => 3,
            };
            prop_assert!(star_rank(star_group(position)) <= star_rank(star_group(position + 1)));
        }
    }
}
