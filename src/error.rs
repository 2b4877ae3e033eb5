use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a source file into an [`EarthquakeDataset`](crate::data::model::EarthquakeDataset).
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing delimited file: {0}")]
    Csv(#[from] csv::Error),

    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reading parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("reading arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}, column '{column}': '{value}' is not a number")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

/// The dataset cannot be split into non-empty training and evaluation sets.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{rows} rows cannot be split with test fraction {test_fraction} (n_train={n_train}, n_test={n_test})")]
pub struct InsufficientDataError {
    pub rows: usize,
    pub test_fraction: f64,
    pub n_train: usize,
    pub n_test: usize,
}

/// Anything that can stop a regressor from reaching the ready state.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    DataLoad(#[from] DataLoadError),

    #[error(transparent)]
    InsufficientData(#[from] InsufficientDataError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
