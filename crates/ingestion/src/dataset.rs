//! Campaign loading.
//!
//! Reads every run's export from a data directory into a [`RawDataset`].

use std::path::Path;

use tracing::info;
use tunnel_core::config::IngestionConfig;
use tunnel_core::{RawDataset, RawRecordSet, Result, RunId};

use crate::reader::RecordSetReader;

/// Load a single run's export from `dir`.
pub fn load_run(dir: &Path, run: RunId, config: &IngestionConfig) -> Result<RawRecordSet> {
    let reader = RecordSetReader::new(config)?;
    let path = dir.join(config.files.for_run(run));
    let records = reader.read_path(&path)?;
    info!(%run, path = %path.display(), samples = records.len(), "Loaded run");
    Ok(records)
}

/// Load all five runs from `dir`.
///
/// Any missing or unreadable file aborts the load.
pub fn load_dataset(dir: &Path, config: &IngestionConfig) -> Result<RawDataset> {
    let mut dataset = RawDataset::new();
    for run in RunId::ALL {
        dataset.insert(run, load_run(dir, run, config)?);
    }
    Ok(dataset)
}
