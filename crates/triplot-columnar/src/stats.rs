use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The fixed statistics record held by the STATS table, one per RAW column.
///
/// `std_dev` is the population standard deviation and is `0.0` whenever
/// fewer than two rows were observed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub count: u64,
    pub sum: f64,
    pub sum_of_squares: f64,
    pub mean: f64,
    pub std_dev: f64,
}

/// Insertion-ordered name→stats map backing the STATS table.
///
/// Same layout as [`crate::ColumnStore`]: a dense vector for ordered
/// iteration plus a name index for O(1) lookup.
#[derive(Clone, Debug, Default)]
pub(crate) struct StatsStore {
    entries: Vec<(String, ColumnStats)>,
    index: HashMap<String, usize>,
}

impl StatsStore {
    pub fn upsert(&mut self, name: &str, stats: ColumnStats) {
        match self.index.get(name) {
            Some(&idx) => self.entries[idx].1 = stats,
            None => {
                self.index.insert(name.to_owned(), self.entries.len());
                self.entries.push((name.to_owned(), stats));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ColumnStats> {
        self.index.get(name).map(|&idx| &self.entries[idx].1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}
