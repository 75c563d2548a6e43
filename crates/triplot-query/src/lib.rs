//! The data-layer facade consumed by the rendering and CSV-parsing
//! collaborators.
//!
//! Wraps one per-dataset [`Repository`] in an async read/write lock: batch
//! mutations (`store_csv`, `calculate_statistics`, `store_standardized_data`,
//! `store_pca`) serialize on the write half, while point and axis queries
//! share the read half. Batch surfaces report success as a boolean; the
//! query surfaces propagate typed errors so structural violations are never
//! silently coerced.

#![forbid(unsafe_code)]

use std::io::BufRead;
use std::sync::Arc;
use tokio::sync::RwLock;
use triplot_columnar::{Cell, Repository, RepositoryError, TableId};
pub use triplot_columnar::{DataPoint, PointSet};
pub use triplot_pipeline::CsvReaderOptions;

/// Async facade over one dataset's repository.
#[derive(Clone, Debug, Default)]
pub struct DataLayer {
    repo: Arc<RwLock<Repository>>,
}

impl DataLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one row batch (first batch's first row = headers).
    pub async fn store_csv(&self, batch: &[Vec<Cell>]) -> bool {
        let mut repo = self.repo.write().await;
        triplot_pipeline::store_batch(&mut repo, batch).is_ok()
    }

    /// Stream a whole CSV source into RAW in bounded row batches.
    pub async fn ingest_csv<R: BufRead>(&self, reader: R, options: CsvReaderOptions) -> bool {
        let mut repo = self.repo.write().await;
        triplot_pipeline::ingest_csv(&mut repo, reader, options).is_ok()
    }

    /// Recompute the STATS table from RAW.
    pub async fn calculate_statistics(&self) -> bool {
        let mut repo = self.repo.write().await;
        triplot_pipeline::calculate_statistics(&mut repo).is_ok()
    }

    /// Standardize every statisticized column into STANDARDIZED.
    pub async fn store_standardized_data(&self) -> bool {
        let mut repo = self.repo.write().await;
        triplot_pipeline::store_standardized(&mut repo)
    }

    /// Run PCA over the named RAW columns and store `PC1..PCk`
    /// (`k = names.len()`).
    pub async fn store_pca(&self, names: &[&str]) -> bool {
        let mut repo = self.repo.write().await;
        triplot_pca::store_pca(&mut repo, names, None)
    }

    /// Pair three named columns (PCA resolved before RAW) into row-aligned
    /// 3D points plus per-axis maximum magnitudes.
    pub async fn create_data_points_from_3_columns(
        &self,
        col_x: &str,
        col_y: &str,
        col_z: &str,
    ) -> Result<PointSet, RepositoryError> {
        let repo = self.repo.read().await;
        repo.points(col_x, col_y, col_z)
    }

    /// Union of STATS and PCA column names, used to populate the
    /// axis-selection UI.
    pub async fn available_fields(&self) -> Vec<String> {
        let repo = self.repo.read().await;
        let mut fields = repo.column_names(TableId::Stats);
        for name in repo.column_names(TableId::Pca) {
            if !fields.contains(&name) {
                fields.push(name);
            }
        }
        fields
    }

    /// Names of every all-numeric column eligible for axis selection.
    pub async fn possible_axes(&self) -> Vec<String> {
        self.repo.read().await.possible_axes()
    }

    /// Dataset teardown: clears all four tables so a replacement dataset can
    /// be ingested.
    pub async fn reset(&self) {
        self.repo.write().await.clear();
    }
}
