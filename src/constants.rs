//! Application constants for the race statistics pipeline
//!
//! File names, column names, lookup tables and default configuration
//! values used throughout the pipeline.

// =============================================================================
// Input and Output Files
// =============================================================================

pub const RACE_RESULTS_FILE: &str = "race_results.csv";
pub const RACE_DATA_FILE: &str = "race_data.csv";
pub const TRACK_DATA_FILE: &str = "track_data.csv";
pub const STANDINGS_FILE: &str = "standings.csv";
pub const CALENDAR_FILE: &str = "calendar.csv";

pub const NEXT_RACE_FILE: &str = "next_race_data.json";
pub const LAST_RACE_FILE: &str = "last_race_data.json";
pub const STANDINGS_OUTPUT_FILE: &str = "standings.json";
pub const DATASET_OUTPUT_FILE: &str = "data.json";

/// Default directory holding the raw CSV snapshots
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default directory the front end reads artifacts from
pub const DEFAULT_OUTPUT_DIR: &str = "../data";

/// Rows sampled by polars when inferring CSV column types
pub const CSV_INFER_SCHEMA_ROWS: usize = 10_000;

// =============================================================================
// Column Names
// =============================================================================

pub mod columns {
    pub const SEASON_YEAR: &str = "season_year";
    pub const RACE_NUMBER: &str = "race_number";
    pub const DRIVER_NAME: &str = "driver_name";
    pub const CAR_NUMBER: &str = "car_number";
    pub const STATUS: &str = "status";
    pub const RACE_NAME: &str = "race_name";
    pub const RACE_DATE: &str = "race_date";
    pub const TRACK_NAME: &str = "track_name";
    pub const TRACK_TYPE: &str = "track_type";
    pub const SEASON_STAGE: &str = "season_stage";

    pub const WINS: &str = "wins";
    pub const STAGE_WINS: &str = "stage_wins";
    pub const RACE_STAGE_POINTS: &str = "race_stage_points";
    pub const RACE_FINISH_POINTS: &str = "race_finish_points";
    pub const RACE_SEASON_POINTS: &str = "race_season_points";
    pub const RACE_PLAYOFF_POINTS: &str = "race_playoff_points";

    pub const OPEN_GROUP: &str = "open_group";
    pub const STAR_GROUP: &str = "star_group";

    /// Stage finishing position columns and the points column derived from each
    pub const STAGE_COLUMNS: [(&str, &str); 3] = [
        ("stage_1_pos", "stage_1_pts"),
        ("stage_2_pos", "stage_2_pts"),
        ("stage_3_pos", "stage_3_pts"),
    ];
}

// =============================================================================
// Feature Lookup Tables
// =============================================================================

/// Tracks whose type is fixed regardless of the track metadata table
pub const TRACK_TYPE_OVERRIDES: [(&str, &str); 4] = [
    ("Daytona Intl. Speedway Road Course", "Road Course"),
    ("Bristol Motor Speedway Dirt Track", "Short Track"),
    ("Dover International Speedway", "Intermediate"),
    ("Indianapolis Grand Prix Circuit", "Road Course"),
];

/// Points awarded for stage positions 1 through 10
pub const STAGE_POINTS: [i64; 10] = [10, 9, 8, 7, 6, 5, 4, 3, 2, 1];

// =============================================================================
// Fantasy Group Thresholds
// =============================================================================

/// Inclusive upper positions of the open league groups `I-II` and `III`
pub const OPEN_GROUP_LIMITS: (u32, u32) = (16, 28);

/// Inclusive upper positions of the star league groups `I`, `II` and `III`
pub const STAR_GROUP_LIMITS: (u32, u32, u32) = (10, 20, 30);

// =============================================================================
// Default Configuration
// =============================================================================

pub const DEFAULT_SEASONS: &[i64] = &[2022, 2023, 2024, 2025];

/// 2025 full-time entry list
pub const DEFAULT_ROSTER: &[&str] = &[
    "Kyle Larson",
    "William Byron",
    "Chase Elliott",
    "Alex Bowman",
    "Denny Hamlin",
    "Christopher Bell",
    "Ty Gibbs",
    "Chase Briscoe",
    "Joey Logano",
    "Ryan Blaney",
    "Austin Cindric",
    "Tyler Reddick",
    "Bubba Wallace",
    "Riley Herbst",
    "Kyle Busch",
    "Austin Dillon",
    "Ross Chastain",
    "Daniel Suarez",
    "Shane van Gisbergen",
    "Chris Buescher",
    "Brad Keselowski",
    "Ryan Preece",
    "Josh Berry",
    "Noah Gragson",
    "Todd Gilliland",
    "Zane Smith",
    "Cole Custer",
    "Ricky Stenhouse Jr.",
    "Michael McDowell",
    "Carson Hocevar",
    "Erik Jones",
    "John Hunter Nemechek",
    "Ty Dillon",
    "AJ Allmendinger",
    "Justin Haley",
    "Cody Ware",
];

/// Environment variables read by the layered configuration loader
pub mod env {
    pub const DATA_DIR: &str = "RACE_STATS_DATA_DIR";
    pub const OUTPUT_DIR: &str = "RACE_STATS_OUTPUT_DIR";
    pub const SEASONS: &str = "RACE_STATS_SEASONS";
}

/// Directory under the user config dir holding `config.toml`
pub const CONFIG_DIR_NAME: &str = "race-stats";
pub const CONFIG_FILE_NAME: &str = "config.toml";
