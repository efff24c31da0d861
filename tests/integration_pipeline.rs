//! Integration tests for the full update pipeline
//!
//! Builds a one-race season with a full field of 32 drivers so that every
//! fantasy group boundary is crossed, then checks the artifacts through the
//! public API.

use chrono::NaiveDate;
use race_stats::features::FeatureProcessor;
use race_stats::models::RaceSlot;
use race_stats::updater::writer::read_race_pointer;
use race_stats::{DataUpdater, PipelineConfig, RaceStatsError, compose_season_standings};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const FIELD_SIZE: usize = 32;

fn driver(position: usize) -> String {
    format!("Driver {:02}", position)
}

/// Race 1 of 2025 at Bristol, finishing order matches the driver number
fn write_snapshot(data_dir: &Path) {
    fs::create_dir_all(data_dir).unwrap();

    let mut results = String::from(
        "season_year,race_number,driver_name,car_number,race_pos,status,stage_1_pos,stage_2_pos,stage_3_pos\n",
    );
    let mut standings = String::from(
        "season_year,race_number,driver_name,wins,stage_wins,race_stage_points,race_finish_points,race_season_points,race_playoff_points\n",
    );
    for position in 1..=FIELD_SIZE {
        let stage_pos = if position <= 10 { position } else { 0 };
        results.push_str(&format!(
            "2025,1,{},{},{},running,{},{},0\n",
            driver(position),
            position + 100,
            position,
            stage_pos,
            stage_pos
        ));
        let season_points = 100 - position as i64;
        standings.push_str(&format!(
            "2025,1,{},{},0,0,{},{},0\n",
            driver(position),
            if position == 1 { 1 } else { 0 },
            season_points,
            season_points
        ));
    }

    fs::write(data_dir.join("race_results.csv"), results).unwrap();
    fs::write(data_dir.join("standings.csv"), standings).unwrap();
    fs::write(
        data_dir.join("race_data.csv"),
        "season_year,race_number,race_name,race_date,track_name\n\
         2025,1,Food City 500,2025-04-13,Bristol Motor Speedway Dirt Track\n",
    )
    .unwrap();
    fs::write(
        data_dir.join("track_data.csv"),
        "track_name,track_type\n\
         Bristol Motor Speedway Dirt Track,Dirt\n\
         Kansas Speedway,Intermediate\n",
    )
    .unwrap();
    fs::write(
        data_dir.join("calendar.csv"),
        "track_name,race_date,season_year,race_number,season_stage\n\
         Bristol Motor Speedway Dirt Track,2025-04-13,2025,1,season\n\
         Kansas Speedway,2025-05-11,2025,2,season\n",
    )
    .unwrap();
}

fn config(temp_dir: &TempDir) -> PipelineConfig {
    let data_dir = temp_dir.path().join("data");
    write_snapshot(&data_dir);
    PipelineConfig::default()
        .with_data_dir(data_dir)
        .with_output_dir(temp_dir.path().join("out"))
        .without_filters()
        .without_progress()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 20).unwrap()
}

fn read_rows(path: &Path) -> Vec<serde_json::Value> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_fantasy_groups_across_full_field() {
    let temp_dir = TempDir::new().unwrap();
    let config = config(&temp_dir);
    let data_path = config.output_path("data.json");

    let report = DataUpdater::new(config).update(today()).await.unwrap();
    assert_eq!(report.dataset_rows, FIELD_SIZE);
    assert_eq!(report.grouped_drivers, FIELD_SIZE);

    let rows = read_rows(&data_path);
    let groups_of = |position: usize| {
        let row = rows
            .iter()
            .find(|r| r["driver_name"] == driver(position).as_str())
            .unwrap();
        (
            row["open_group"].as_str().unwrap().to_string(),
            row["star_group"].as_str().unwrap().to_string(),
        )
    };

    assert_eq!(groups_of(1), ("I-II".to_string(), "I".to_string()));
    assert_eq!(groups_of(10).1, "I");
    assert_eq!(groups_of(11).1, "II");
    assert_eq!(groups_of(16).0, "I-II");
    assert_eq!(groups_of(17).0, "III");
    assert_eq!(groups_of(20).1, "II");
    assert_eq!(groups_of(21).1, "III");
    assert_eq!(groups_of(28).0, "III");
    assert_eq!(groups_of(29).0, "IV");
    assert_eq!(groups_of(30).1, "III");
    assert_eq!(groups_of(31).1, "IV");
    assert_eq!(groups_of(32), ("IV".to_string(), "IV".to_string()));
}

#[tokio::test]
async fn test_overridden_track_and_pointers() {
    let temp_dir = TempDir::new().unwrap();
    let config = config(&temp_dir);
    let out = config.output_dir.clone();
    let data_dir = config.data_dir.clone();

    DataUpdater::new(config).update(today()).await.unwrap();

    let rows = read_rows(&out.join("data.json"));
    assert!(rows.iter().all(|r| r["track_type"] == "Short Track"));
    let winner = rows.iter().find(|r| r["driver_name"] == "Driver 01").unwrap();
    assert_eq!(winner["stage_1_pts"], 10);
    assert_eq!(winner["status"], "finished");

    let last = read_race_pointer(&out.join("last_race_data.json"), RaceSlot::Last)
        .await
        .unwrap();
    assert_eq!(last.track_type.as_deref(), Some("Short Track"));

    let next = read_race_pointer(&data_dir.join("next_race_data.json"), RaceSlot::Next)
        .await
        .unwrap();
    assert_eq!(next.track, "Kansas Speedway");
    assert_eq!(next.track_type.as_deref(), Some("Intermediate"));
}

#[test]
fn test_feature_processor_and_composer_agree() {
    let temp_dir = TempDir::new().unwrap();
    let processor = FeatureProcessor::new(config(&temp_dir));

    let dataset = processor.prepare_dataset(today()).unwrap();
    assert_eq!(dataset.last_race.number, 1);
    assert_eq!(dataset.next_race.number, 2);

    let standings = compose_season_standings(&dataset.standings, 1, 2025);
    assert_eq!(standings.len(), FIELD_SIZE);
    assert_eq!(standings[0].driver_name, "Driver 01");
    assert_eq!(standings[0].wins, 1);
    assert_eq!(standings[FIELD_SIZE - 1].position as usize, FIELD_SIZE);
}

#[tokio::test]
async fn test_season_over_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = DataUpdater::new(config(&temp_dir))
        .update(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, RaceStatsError::NoUpcomingRace { .. }));
}

#[test]
fn test_layered_config_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        "data_dir = \"snapshots\"\nseasons = [2025]\nmirror_pointers_to_data_dir = false\n",
    )
    .unwrap();

    let config = PipelineConfig::load_layered(Some(&path)).unwrap();
    assert_eq!(config.seasons, vec![2025]);
    assert!(!config.mirror_pointers_to_data_dir);
    assert!(config.validate().is_ok());
}
