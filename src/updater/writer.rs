//! JSON artifact writing
//!
//! Serialization happens in memory; the bytes are then written with
//! `tokio::fs`. Parent directories are created on demand.

use crate::error::{RaceStatsError, Result};
use crate::models::{LastRaceRecord, NextRaceRecord, RacePointer, RaceSlot, StandingsRecord};

use polars::prelude::*;
use std::path::Path;
use tokio::fs;
use tracing::debug;

async fn write_bytes(path: &Path, bytes: Vec<u8>) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    let len = bytes.len();
    fs::write(path, bytes).await?;
    debug!("Wrote {} bytes to {}", len, path.display());
    Ok(())
}

/// Write a next or last race pointer as a single JSON object
pub async fn write_race_pointer(path: &Path, slot: RaceSlot, pointer: &RacePointer) -> Result<()> {
    let bytes = match slot {
        RaceSlot::Next => serde_json::to_vec_pretty(&NextRaceRecord::from(pointer))?,
        RaceSlot::Last => serde_json::to_vec_pretty(&LastRaceRecord::from(pointer))?,
    };
    write_bytes(path, bytes).await
}

/// Read back a pointer file written by [`write_race_pointer`]
pub async fn read_race_pointer(path: &Path, slot: RaceSlot) -> Result<RacePointer> {
    if !fs::try_exists(path).await? {
        return Err(RaceStatsError::DataFileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read(path).await?;
    let parsed = match slot {
        RaceSlot::Next => serde_json::from_slice::<NextRaceRecord>(&content).map(RacePointer::from),
        RaceSlot::Last => serde_json::from_slice::<LastRaceRecord>(&content).map(RacePointer::from),
    };
    parsed.map_err(|e| RaceStatsError::InvalidPointerRecord {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Write the standings history as a JSON array of records
pub async fn write_standings(path: &Path, records: &[StandingsRecord]) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(records)?;
    write_bytes(path, bytes).await
}

/// Write a table as a JSON array with one object per row
pub async fn write_dataset(path: &Path, df: &DataFrame) -> Result<()> {
    let mut df = df.clone();
    let mut buffer = Vec::new();
    JsonWriter::new(&mut buffer)
        .with_json_format(JsonFormat::Json)
        .finish(&mut df)?;
    write_bytes(path, buffer).await
}
