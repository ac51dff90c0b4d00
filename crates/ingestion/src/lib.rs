//! Balance-export ingestion for the wind-tunnel data reduction system.
//!
//! This crate handles:
//! - Dropping instrument metadata rows ahead of the header
//! - Column lookup by header name
//! - Parsing numeric cells into raw record sets
//! - Loading all five runs of a campaign from a data directory

pub mod dataset;
pub mod reader;

pub use dataset::{load_dataset, load_run};
pub use reader::RecordSetReader;
