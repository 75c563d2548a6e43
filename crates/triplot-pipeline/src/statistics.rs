use crate::Result;
use triplot_columnar::{Cell, Column, ColumnStats, DataTable, Repository, TableId};

/// Compute the STATS record for every RAW column.
///
/// Cells coerce lossily to numbers (non-numeric and null become 0), then
/// `count`, `sum`, `sum_of_squares`, `mean = sum/count` (0 for an empty
/// column) and the population `std_dev = sqrt(sum_of_squares/count - mean²)`
/// (0 when fewer than two rows). Existing STATS entries are overwritten.
pub fn calculate_statistics(repo: &mut Repository) -> Result<()> {
    for name in repo.column_names(TableId::Raw) {
        let column = repo.get_column(DataTable::Raw, &name)?;

        let count = column.row_count() as u64;
        let mut sum = 0.0f64;
        let mut sum_of_squares = 0.0f64;
        for cell in &column.values {
            let v = cell.to_f64_lossy();
            sum += v;
            sum_of_squares += v * v;
        }

        let mean = if count == 0 { 0.0 } else { sum / count as f64 };
        let std_dev = if count >= 2 {
            // Clamp against rounding: the raw-moment variance can dip a hair
            // below zero for constant columns.
            (sum_of_squares / count as f64 - mean * mean).max(0.0).sqrt()
        } else {
            0.0
        };

        repo.upsert_stats(
            &name,
            ColumnStats {
                count,
                sum,
                sum_of_squares,
                mean,
                std_dev,
            },
        );
    }
    Ok(())
}

/// Standardize one RAW column against its STATS record, without persisting.
///
/// A zero standard deviation (constant or too-short column) passes the cells
/// through unchanged rather than dividing by zero.
pub fn standardize_column(repo: &Repository, name: &str) -> Result<Column> {
    let column = repo.get_column(DataTable::Raw, name)?;
    let stats = repo.get_stats(name)?;

    if stats.std_dev == 0.0 {
        return Ok(column.clone());
    }

    let values = column
        .values
        .iter()
        .map(|cell| Cell::Number((cell.to_f64_lossy() - stats.mean) / stats.std_dev))
        .collect();
    Ok(Column::new(name, values))
}

/// Standardize every column that has a STATS record into STANDARDIZED.
///
/// Best-effort batch contract: a column that fails to standardize is skipped
/// and the call returns `false`, but the remaining columns are still written.
pub fn store_standardized(repo: &mut Repository) -> bool {
    let mut ok = true;
    for name in repo.column_names(TableId::Stats) {
        match standardize_column(repo, &name) {
            Ok(column) => repo.replace_column(DataTable::Standardized, column),
            Err(_) => ok = false,
        }
    }
    ok
}
