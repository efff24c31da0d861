//! End-to-end update runs against the fixture snapshot

use super::fixtures::{read_json, today, Snapshot};
use crate::models::RaceSlot;
use crate::updater::writer::read_race_pointer;
use crate::updater::DataUpdater;
use chrono::NaiveDate;

#[tokio::test]
async fn test_update_writes_every_artifact() {
    let snapshot = Snapshot::new();
    let updater = DataUpdater::new(snapshot.config().without_pointer_mirror());

    let report = updater.update(today()).await.unwrap();

    assert_eq!(report.written.len(), 4);
    for name in [
        "next_race_data.json",
        "last_race_data.json",
        "standings.json",
        "data.json",
    ] {
        assert!(snapshot.output(name).exists(), "{name} was not written");
    }
    assert!(!snapshot.data_dir.join("next_race_data.json").exists());
}

#[tokio::test]
async fn test_race_pointers_bracket_the_run_date() {
    let snapshot = Snapshot::new();
    let report = DataUpdater::new(snapshot.config())
        .update(today())
        .await
        .unwrap();

    let next = read_race_pointer(&snapshot.output("next_race_data.json"), RaceSlot::Next)
        .await
        .unwrap();
    assert_eq!(next.date, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
    assert_eq!(next.number, 3);
    assert_eq!(next.track, "Circuit of The Americas");
    assert_eq!(next.track_type.as_deref(), Some("Road Course"));
    assert_eq!(report.next_race, next);

    let last = read_race_pointer(&snapshot.output("last_race_data.json"), RaceSlot::Last)
        .await
        .unwrap();
    assert_eq!(last.number, 2);
    assert_eq!(last.track, "Atlanta Motor Speedway");
    assert_eq!(report.last_race, last);

    // Mirrored copies for the scrapers
    let mirrored = read_race_pointer(&snapshot.data_dir.join("next_race_data.json"), RaceSlot::Next)
        .await
        .unwrap();
    assert_eq!(mirrored, next);
    assert_eq!(report.written.len(), 6);
}

#[tokio::test]
async fn test_standings_history() {
    let snapshot = Snapshot::new();
    let report = DataUpdater::new(snapshot.config())
        .update(today())
        .await
        .unwrap();

    let standings = read_json(&snapshot.output("standings.json"));
    let records = standings.as_array().unwrap();
    assert_eq!(records.len(), 7);
    assert_eq!(report.standings_records, 7);

    let after_race_2: Vec<_> = records
        .iter()
        .filter(|r| r["season_year"] == 2025 && r["race_number"] == 2)
        .collect();
    assert_eq!(after_race_2.len(), 3);
    assert_eq!(after_race_2[0]["driver_name"], "Kyle Larson");
    assert_eq!(after_race_2[0]["position"], 1);
    assert_eq!(after_race_2[0]["race_season_points"], 105);
    assert_eq!(after_race_2[0]["season_points"], 105);
    assert_eq!(after_race_2[0]["race_playoff_points"], 7);
    assert_eq!(after_race_2[0]["playoff_points"], 7);
    assert_eq!(after_race_2[0]["wins"], 1);
    assert_eq!(after_race_2[0]["car_number"], "5");
    assert_eq!(after_race_2[0]["race_date"], "2025-02-23");
    assert_eq!(after_race_2[1]["driver_name"], "Denny Hamlin");
    assert_eq!(after_race_2[2]["driver_name"], "Ty Gibbs");

    let cassill = records
        .iter()
        .find(|r| r["driver_name"] == "Landon Cassill")
        .unwrap();
    assert_eq!(cassill["season_year"], 2024);
    assert_eq!(cassill["race_date"], "2024-11-10");
    assert_eq!(cassill["car_number"], "00");
}

#[tokio::test]
async fn test_dataset_features_and_groups() {
    let snapshot = Snapshot::new();
    let report = DataUpdater::new(snapshot.config())
        .update(today())
        .await
        .unwrap();

    let data = read_json(&snapshot.output("data.json"));
    let rows = data.as_array().unwrap();

    // Guest Driver has no standings row and drops out of the inner join
    assert_eq!(rows.len(), 7);
    assert_eq!(report.dataset_rows, 7);
    assert_eq!(report.drivers, 4);
    assert_eq!(report.grouped_drivers, 3);
    assert!(rows.iter().all(|r| r["driver_name"] != "Guest Driver"));
    assert!(rows.iter().all(|r| r.get("race_name").is_none()));

    let drivers: Vec<_> = rows.iter().map(|r| r["driver_name"].as_str().unwrap()).collect();
    assert_eq!(
        drivers,
        vec![
            "Denny Hamlin",
            "Denny Hamlin",
            "Kyle Larson",
            "Kyle Larson",
            "Landon Cassill",
            "Ty Gibbs",
            "Ty Gibbs",
        ]
    );

    let hamlin_race_2 = &rows[1];
    assert_eq!(hamlin_race_2["race_date"], "2025-02-23");
    assert_eq!(hamlin_race_2["status"], "dq");
    assert_eq!(hamlin_race_2["stage_1_pos"], 9);
    assert_eq!(hamlin_race_2["stage_1_pts"], 2);
    assert_eq!(hamlin_race_2["stage_2_pts"], 1);
    assert_eq!(hamlin_race_2["stage_3_pts"], 0);
    assert_eq!(hamlin_race_2["track_type"], "Superspeedway");
    assert_eq!(hamlin_race_2["season_stage"], "season");
    assert_eq!(hamlin_race_2["open_group"], "I-II");
    assert_eq!(hamlin_race_2["star_group"], "I");

    let gibbs_race_1 = &rows[5];
    assert_eq!(gibbs_race_1["status"], "crash");
    assert_eq!(gibbs_race_1["stage_2_pts"], 0);
    assert!(gibbs_race_1["stage_2_pos"].is_null());
    assert_eq!(gibbs_race_1["car_number"], "54");

    let cassill = &rows[4];
    assert_eq!(cassill["car_number"], "00");
    assert_eq!(cassill["race_date"], "2024-11-10");
    assert_eq!(cassill["season_stage"], "playoffs");
    assert!(cassill["open_group"].is_null());
    assert!(cassill["star_group"].is_null());
}

#[tokio::test]
async fn test_roster_and_seasons_filter_the_dataset() {
    let snapshot = Snapshot::new();
    let config = snapshot
        .config()
        .with_roster(["Kyle Larson", "Ty Gibbs"])
        .with_seasons(vec![2025]);

    let report = DataUpdater::new(config).update(today()).await.unwrap();
    assert_eq!(report.dataset_rows, 4);
    assert_eq!(report.drivers, 2);
    // History covers configured seasons only, for every driver in them
    assert_eq!(report.standings_records, 6);
    assert_eq!(report.grouped_drivers, 3);
}

#[tokio::test]
async fn test_track_override_applies_to_dataset() {
    let snapshot = Snapshot::new();
    snapshot.write(
        "track_data.csv",
        "track_name,track_type\n\
         Daytona International Speedway,Superspeedway\n\
         Atlanta Motor Speedway,Intermediate\n\
         Circuit of The Americas,Road Course\n",
    );

    let report = DataUpdater::new(snapshot.config())
        .update(today())
        .await
        .unwrap();
    let data = read_json(&snapshot.output("data.json"));
    let atlanta: Vec<_> = data
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| r["track_name"] == "Atlanta Motor Speedway")
        .collect();
    assert!(atlanta.iter().all(|r| r["track_type"] == "Intermediate"));

    // Phoenix is missing from the track table; the left join keeps the row
    let cassill: Vec<_> = data
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| r["driver_name"] == "Landon Cassill")
        .collect();
    assert_eq!(cassill.len(), 1);
    assert!(cassill[0]["track_type"].is_null());
    assert_eq!(report.dataset_rows, 7);
}
