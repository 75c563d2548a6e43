use crate::stats::{ColumnStats, StatsStore};
use crate::store::{Column, ColumnStore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four per-dataset tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TableId {
    Raw,
    Stats,
    Standardized,
    Pca,
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TableId::Raw => "RAW",
            TableId::Stats => "STATS",
            TableId::Standardized => "STANDARDIZED",
            TableId::Pca => "PCA",
        };
        f.write_str(name)
    }
}

/// The tables that hold data cells (everything except STATS, whose records
/// are [`ColumnStats`] and go through the typed `stats` accessors).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataTable {
    Raw,
    Standardized,
    Pca,
}

impl From<DataTable> for TableId {
    fn from(table: DataTable) -> Self {
        match table {
            DataTable::Raw => TableId::Raw,
            DataTable::Standardized => TableId::Standardized,
            DataTable::Pca => TableId::Pca,
        }
    }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("column {name:?} already exists in table {table}")]
    DuplicateColumn { table: TableId, name: String },
    #[error("column not found: {0:?}")]
    ColumnNotFound(String),
    #[error("column {0:?} selected for more than one axis")]
    DuplicateColumnSelection(String),
    #[error("column {0:?} contains non-numeric values")]
    NonNumericColumn(String),
    #[error("column {name:?} has {found} rows, expected {expected}")]
    RowLengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// A row-aligned triple drawn from three selected columns.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// The result of a three-column point query: the points themselves plus the
/// maximum absolute value per axis (for scaling on the renderer side).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    pub points: Vec<DataPoint>,
    pub max_per_axis: [f64; 3],
}

/// Owns all four tables for one logical dataset.
///
/// Created on dataset-session start, cleared on dataset replacement or an
/// explicit reset; mutating calls take effect immediately (no batching).
#[derive(Clone, Debug, Default)]
pub struct Repository {
    raw: ColumnStore,
    standardized: ColumnStore,
    pca: ColumnStore,
    stats: StatsStore,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self, table: DataTable) -> &ColumnStore {
        match table {
            DataTable::Raw => &self.raw,
            DataTable::Standardized => &self.standardized,
            DataTable::Pca => &self.pca,
        }
    }

    fn store_mut(&mut self, table: DataTable) -> &mut ColumnStore {
        match table {
            DataTable::Raw => &mut self.raw,
            DataTable::Standardized => &mut self.standardized,
            DataTable::Pca => &mut self.pca,
        }
    }

    /// Add a new column; a duplicate name within the table is an error.
    pub fn add_column(&mut self, table: DataTable, column: Column) -> Result<()> {
        self.store_mut(table).insert(table.into(), column)
    }

    /// Insert-or-overwrite a derived column (STANDARDIZED / PCA lifecycle).
    pub fn replace_column(&mut self, table: DataTable, column: Column) {
        self.store_mut(table).replace(column);
    }

    pub fn get_column(&self, table: DataTable, name: &str) -> Result<&Column> {
        self.store(table)
            .get(name)
            .ok_or_else(|| RepositoryError::ColumnNotFound(name.to_owned()))
    }

    pub fn get_column_mut(&mut self, table: DataTable, name: &str) -> Result<&mut Column> {
        self.store_mut(table)
            .get_mut(name)
            .ok_or_else(|| RepositoryError::ColumnNotFound(name.to_owned()))
    }

    /// The column at a position within a table, for positional appends during
    /// chunked ingestion.
    pub fn column_at_mut(&mut self, table: DataTable, position: usize) -> Option<&mut Column> {
        self.store_mut(table).column_at_mut(position)
    }

    pub fn column_count(&self, table: DataTable) -> usize {
        self.store(table).len()
    }

    pub fn columns(&self, table: DataTable) -> impl Iterator<Item = &Column> {
        self.store(table).columns()
    }

    pub fn is_table_empty(&self, table: TableId) -> bool {
        match table {
            TableId::Stats => self.stats.is_empty(),
            TableId::Raw => self.raw.is_empty(),
            TableId::Standardized => self.standardized.is_empty(),
            TableId::Pca => self.pca.is_empty(),
        }
    }

    /// Column names in insertion order.
    pub fn column_names(&self, table: TableId) -> Vec<String> {
        match table {
            TableId::Stats => self.stats.names().map(str::to_owned).collect(),
            TableId::Raw => self.raw.names().map(str::to_owned).collect(),
            TableId::Standardized => self.standardized.names().map(str::to_owned).collect(),
            TableId::Pca => self.pca.names().map(str::to_owned).collect(),
        }
    }

    pub fn upsert_stats(&mut self, name: &str, stats: ColumnStats) {
        self.stats.upsert(name, stats);
    }

    pub fn get_stats(&self, name: &str) -> Result<&ColumnStats> {
        self.stats
            .get(name)
            .ok_or_else(|| RepositoryError::ColumnNotFound(name.to_owned()))
    }

    /// Drop the PCA table's contents ahead of a recompute.
    pub fn clear_pca(&mut self) {
        self.pca.clear();
    }

    /// Dataset teardown: drops every table's contents.
    pub fn clear(&mut self) {
        self.raw.clear();
        self.standardized.clear();
        self.pca.clear();
        self.stats.clear();
    }

    /// Resolve an axis name against PCA first, then RAW.
    fn resolve_axis(&self, name: &str) -> Result<&Column> {
        self.pca
            .get(name)
            .or_else(|| self.raw.get(name))
            .ok_or_else(|| RepositoryError::ColumnNotFound(name.to_owned()))
    }

    /// Pair three named columns into row-aligned 3D points.
    ///
    /// Names resolve against PCA first and RAW second (mixing is allowed).
    /// Structural violations (duplicate selection, missing or non-numeric
    /// columns, unequal row counts) are errors, never coerced.
    pub fn points(&self, col_x: &str, col_y: &str, col_z: &str) -> Result<PointSet> {
        if col_x == col_y || col_x == col_z {
            return Err(RepositoryError::DuplicateColumnSelection(col_x.to_owned()));
        }
        if col_y == col_z {
            return Err(RepositoryError::DuplicateColumnSelection(col_y.to_owned()));
        }

        let mut resolved: Vec<&Column> = Vec::with_capacity(3);
        for name in [col_x, col_y, col_z] {
            let column = self.resolve_axis(name)?;
            if !column.is_all_numeric() {
                return Err(RepositoryError::NonNumericColumn(name.to_owned()));
            }
            resolved.push(column);
        }
        let (x, y, z) = (resolved[0], resolved[1], resolved[2]);

        let rows = x.row_count();
        for column in [y, z] {
            if column.row_count() != rows {
                return Err(RepositoryError::RowLengthMismatch {
                    name: column.name.clone(),
                    expected: rows,
                    found: column.row_count(),
                });
            }
        }

        let mut points = Vec::with_capacity(rows);
        let mut max_per_axis = [0.0f64; 3];
        for row in 0..rows {
            let point = DataPoint {
                x: x.values[row].to_f64_lossy(),
                y: y.values[row].to_f64_lossy(),
                z: z.values[row].to_f64_lossy(),
            };
            max_per_axis[0] = max_per_axis[0].max(point.x.abs());
            max_per_axis[1] = max_per_axis[1].max(point.y.abs());
            max_per_axis[2] = max_per_axis[2].max(point.z.abs());
            points.push(point);
        }

        Ok(PointSet {
            points,
            max_per_axis,
        })
    }

    /// Names of every all-numeric column across RAW and the derived data
    /// tables; these are the candidates for axis/point selection.
    pub fn possible_axes(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut axes = Vec::new();
        for store in [&self.raw, &self.standardized, &self.pca] {
            for column in store.columns() {
                if column.is_all_numeric() && seen.insert(column.name.clone()) {
                    axes.push(column.name.clone());
                }
            }
        }
        axes
    }
}
