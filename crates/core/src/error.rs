//! Error types for the wind-tunnel data reduction system.

use thiserror::Error;

use crate::types::RunId;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the data reduction system.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data error (invalid cell, malformed row).
    #[error("Data error: {0}")]
    Data(String),

    /// Two columns that must be index-aligned have different lengths.
    #[error("Length mismatch in {context}: expected {expected} samples, found {actual}")]
    LengthMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// A column required by the run policy is absent.
    #[error("Missing column in {context}: {column}")]
    MissingColumn { context: String, column: String },

    /// A run required for the dataset was not supplied.
    #[error("Missing run: {0}")]
    MissingRun(RunId),

    /// Unrecognized run identity.
    #[error("Unknown run: {0}")]
    UnknownRun(String),

    /// No geometry is registered for the article.
    #[error("Unknown article: {0}")]
    UnknownArticle(String),

    /// A velocity-sweep sample violates the small-angle assumption.
    #[error(
        "Angle of attack out of tolerance in {run} at sample {index}: \
         {alpha_deg} deg exceeds {tolerance_deg} deg"
    )]
    AngleOutOfTolerance {
        run: RunId,
        index: usize,
        alpha_deg: f64,
        tolerance_deg: f64,
    },

    /// Tabular ingestion error.
    #[error("Ingestion error: {0}")]
    Ingest(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a data error.
    pub fn data(msg: impl Into<String>) -> Self {
        Error::Data(msg.into())
    }

    /// Create a length mismatch error.
    pub fn length_mismatch(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        Error::LengthMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Create a missing column error.
    pub fn missing_column(context: impl Into<String>, column: impl Into<String>) -> Self {
        Error::MissingColumn {
            context: context.into(),
            column: column.into(),
        }
    }

    /// Create an ingestion error.
    pub fn ingest(msg: impl Into<String>) -> Self {
        Error::Ingest(msg.into())
    }
}

/// Fail with [`Error::LengthMismatch`] unless `actual == expected`.
pub fn ensure_len(context: impl Into<String>, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::length_mismatch(context, expected, actual))
    }
}
