use crate::repository::{RepositoryError, Result, TableId};
use crate::types::Cell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named, typed sequence of cells. Its row count is `values.len()`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn row_count(&self) -> usize {
        self.values.len()
    }

    pub fn is_all_numeric(&self) -> bool {
        self.values.iter().all(Cell::is_numeric)
    }
}

/// One table's worth of columns, keyed by name.
///
/// Columns live in a dense vector so `names()` iterates in insertion order;
/// the side index gives O(1) name lookup and duplicate detection.
#[derive(Clone, Debug, Default)]
pub struct ColumnStore {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
}

impl ColumnStore {
    /// Add a new column; a name already present in this store is an error.
    pub fn insert(&mut self, table: TableId, column: Column) -> Result<()> {
        if self.index.contains_key(&column.name) {
            return Err(RepositoryError::DuplicateColumn {
                table,
                name: column.name,
            });
        }
        self.index.insert(column.name.clone(), self.columns.len());
        self.columns.push(column);
        Ok(())
    }

    /// Insert-or-overwrite, used by the derived-table writers which recompute
    /// their columns wholesale.
    pub fn replace(&mut self, column: Column) {
        match self.index.get(&column.name) {
            Some(&idx) => self.columns[idx] = column,
            None => {
                self.index.insert(column.name.clone(), self.columns.len());
                self.columns.push(column);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&idx| &self.columns[idx])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.index.get(name).map(|&idx| &mut self.columns[idx])
    }

    pub fn column_at_mut(&mut self, position: usize) -> Option<&mut Column> {
        self.columns.get_mut(position)
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn clear(&mut self) {
        self.columns.clear();
        self.index.clear();
    }
}
