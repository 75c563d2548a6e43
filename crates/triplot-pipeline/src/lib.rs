//! Ingestion and derivation pipeline for triplot datasets.
//!
//! Row batches from the CSV-parsing collaborator are transposed into columns
//! and appended into the RAW table incrementally, so a large file never
//! materializes as a full cell grid. Statistics and standardization derive
//! the STATS and STANDARDIZED tables from RAW, column by column.

#![forbid(unsafe_code)]

mod csv_reader;
mod ingest;
mod statistics;

use thiserror::Error;
use triplot_columnar::RepositoryError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("batch has {found} columns, expected {expected}")]
    SchemaMismatch { expected: usize, found: usize },
    #[error("header row contains an empty (null) cell at position {0}")]
    NullHeader(usize),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

pub use crate::csv_reader::{ingest_csv, CsvReaderOptions};
pub use crate::ingest::{store_batch, transpose};
pub use crate::statistics::{
    calculate_statistics, standardize_column, store_standardized,
};
