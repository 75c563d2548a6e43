//! Columnar storage for triplot datasets.
//!
//! This crate focuses on:
//! - Typed name→values columns, grouped into per-dataset tables
//!   (RAW, STATS, STANDARDIZED, PCA).
//! - A [`Repository`] that enforces per-table name uniqueness and
//!   row-length consistency across columns.
//! - Row-aligned point queries (`points`) that pair three named columns
//!   into 3D tuples for the rendering collaborator.

#![forbid(unsafe_code)]

mod repository;
mod stats;
mod store;
mod types;

pub use crate::repository::{
    DataPoint, DataTable, PointSet, Repository, RepositoryError, Result, TableId,
};
pub use crate::stats::ColumnStats;
pub use crate::store::{Column, ColumnStore};
pub use crate::types::Cell;
