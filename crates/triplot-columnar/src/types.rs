use serde::{Deserialize, Serialize};

/// A single cell in a data column.
///
/// Raw, standardized and PCA-input columns hold these directly; the STATS
/// table holds [`crate::ColumnStats`] records instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Null,
}

impl Cell {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Cell::Number(_))
    }

    /// Coerce the cell to `f64` for statistics and matrix assembly.
    ///
    /// Non-numeric and null cells become `0.0`. This is a deliberate lossy
    /// policy (mirroring the ingestion contract), not an error path; callers
    /// that must reject non-numeric data check [`Cell::is_numeric`] first.
    pub fn to_f64_lossy(&self) -> f64 {
        match self {
            Cell::Number(v) => *v,
            Cell::Text(_) | Cell::Null => 0.0,
        }
    }

    /// Render the cell as a column header name, if it can name a column.
    ///
    /// Numbers are formatted with Rust's shortest-roundtrip `f64` display;
    /// null cells cannot act as headers.
    pub fn as_header(&self) -> Option<String> {
        match self {
            Cell::Number(v) => Some(v.to_string()),
            Cell::Text(s) => Some(s.clone()),
            Cell::Null => None,
        }
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_owned())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}
