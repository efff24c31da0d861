//! Artifact update orchestration.
//!
//! Runs the feature processor, writes the race pointers, composes the
//! standings history, assigns fantasy groups from the standings as of the
//! last race and writes the grouped feature table.

pub mod writer;

#[cfg(test)]
pub mod tests;

use crate::config::PipelineConfig;
use crate::constants::columns;
use crate::error::Result;
use crate::features::{FeatureProcessor, PreparedDataset};
use crate::models::{RacePointer, RaceSlot, UpdateReport};
use crate::standings::{self, build_history, compose_season_standings, make_fantasy_groups};

use chrono::NaiveDate;
use polars::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// Produces every JSON artifact from the raw CSV snapshots
#[derive(Debug, Clone)]
pub struct DataUpdater {
    config: PipelineConfig,
    processor: FeatureProcessor,
}

impl DataUpdater {
    pub fn new(config: PipelineConfig) -> Self {
        let processor = FeatureProcessor::new(config.clone());
        Self { config, processor }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Regenerate every artifact as of `today`
    pub async fn update(&self, today: NaiveDate) -> Result<UpdateReport> {
        let start_time = Instant::now();
        self.config.validate()?;
        info!("Updating artifacts as of {}", today);

        let dataset = self.processor.prepare_dataset(today)?;
        let mut written = Vec::new();

        written.extend(self.write_pointers(&dataset.next_race, &dataset.last_race).await?);

        let seasons = self.history_seasons(&dataset);
        let history = build_history(
            &dataset.standings,
            &seasons,
            &dataset.calendar,
            &dataset.car_numbers,
            self.config.show_progress,
        );
        let standings_path = self.config.output_path(&self.config.outputs.standings);
        writer::write_standings(&standings_path, &history).await?;
        info!("Wrote {} standings records", history.len());
        written.push(standings_path);

        let last = &dataset.last_race;
        let current = compose_season_standings(&dataset.standings, last.number, last.season);
        if current.is_empty() {
            warn!(
                "No standings for {} race {}; fantasy groups will be empty",
                last.season, last.number
            );
        }
        let groups = make_fantasy_groups(&current);
        let table = standings::attach_groups(&dataset.table, &groups)?;

        let dataset_path = self.config.output_path(&self.config.outputs.dataset);
        writer::write_dataset(&dataset_path, &table).await?;
        info!("Wrote {} feature rows", table.height());
        written.push(dataset_path);

        Ok(UpdateReport {
            dataset_rows: table.height(),
            drivers: count_drivers(&table)?,
            standings_records: history.len(),
            grouped_drivers: groups.len(),
            next_race: dataset.next_race,
            last_race: dataset.last_race,
            written,
            processing_time: start_time.elapsed(),
        })
    }

    async fn write_pointers(&self, next: &RacePointer, last: &RacePointer) -> Result<Vec<PathBuf>> {
        let outputs = &self.config.outputs;
        let mut targets = vec![
            (self.config.output_path(&outputs.next_race), RaceSlot::Next, next),
            (self.config.output_path(&outputs.last_race), RaceSlot::Last, last),
        ];
        if self.config.mirror_pointers_to_data_dir && self.config.data_dir != self.config.output_dir {
            targets.push((self.config.input_path(&outputs.next_race), RaceSlot::Next, next));
            targets.push((self.config.input_path(&outputs.last_race), RaceSlot::Last, last));
        }

        let mut written = Vec::with_capacity(targets.len());
        for (path, slot, pointer) in targets {
            writer::write_race_pointer(&path, slot, pointer).await?;
            written.push(path);
        }
        Ok(written)
    }

    /// Configured seasons, or every season in the standings when unset
    fn history_seasons(&self, dataset: &PreparedDataset) -> Vec<i64> {
        if self.config.seasons.is_empty() {
            standings::seasons_present(&dataset.standings)
        } else {
            self.config.seasons.clone()
        }
    }
}

fn count_drivers(df: &DataFrame) -> Result<usize> {
    Ok(df
        .column(columns::DRIVER_NAME)?
        .as_materialized_series()
        .n_unique()?)
}
