use crate::{PipelineError, Result};
use std::collections::HashSet;
use triplot_columnar::{Cell, Column, DataTable, Repository, RepositoryError, TableId};

/// Transpose an R×C row-major batch into a C×R column-major one.
///
/// O(R·C) time with no allocation beyond the output. An empty batch yields
/// an empty output; ragged rows are a [`PipelineError::SchemaMismatch`].
pub fn transpose(rows: &[Vec<Cell>]) -> Result<Vec<Vec<Cell>>> {
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };
    let width = first.len();

    let mut columns: Vec<Vec<Cell>> = (0..width)
        .map(|_| Vec::with_capacity(rows.len()))
        .collect();
    for row in rows {
        if row.len() != width {
            return Err(PipelineError::SchemaMismatch {
                expected: width,
                found: row.len(),
            });
        }
        for (column, cell) in columns.iter_mut().zip(row) {
            column.push(cell.clone());
        }
    }
    Ok(columns)
}

/// Ingest one row batch into the RAW table.
///
/// On the first call for a dataset (RAW empty) the batch's first row is the
/// header row; every later row (in this call and all subsequent ones) is
/// appended to the RAW columns in positional order, which supports chunked
/// CSV parsing without re-reading headers. Zero-length rows (e.g. a trailing
/// newline) are skipped.
///
/// The batch is validated up front, so a failed call leaves RAW untouched.
pub fn store_batch(repo: &mut Repository, batch: &[Vec<Cell>]) -> Result<()> {
    let mut rows: Vec<&[Cell]> = batch
        .iter()
        .filter(|row| !row.is_empty())
        .map(Vec::as_slice)
        .collect();

    let width = if repo.is_table_empty(TableId::Raw) {
        let Some((header, data_rows)) = rows.split_first() else {
            return Ok(());
        };

        let mut names = Vec::with_capacity(header.len());
        let mut seen = HashSet::new();
        for (position, cell) in header.iter().enumerate() {
            let name = cell
                .as_header()
                .ok_or(PipelineError::NullHeader(position))?;
            if !seen.insert(name.clone()) {
                return Err(RepositoryError::DuplicateColumn {
                    table: TableId::Raw,
                    name,
                }
                .into());
            }
            names.push(name);
        }

        let width = names.len();
        check_widths(data_rows, width)?;
        for name in names {
            repo.add_column(DataTable::Raw, Column::new(name, Vec::new()))?;
        }
        rows.remove(0);
        width
    } else {
        let width = repo.column_count(DataTable::Raw);
        check_widths(&rows, width)?;
        width
    };

    for row in rows {
        for (position, cell) in row.iter().enumerate() {
            repo.column_at_mut(DataTable::Raw, position)
                .expect("position bounded by width check")
                .values
                .push(cell.clone());
        }
    }
    debug_assert_eq!(repo.column_count(DataTable::Raw), width);
    Ok(())
}

fn check_widths(rows: &[&[Cell]], expected: usize) -> Result<()> {
    for row in rows {
        if row.len() != expected {
            return Err(PipelineError::SchemaMismatch {
                expected,
                found: row.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn cells(values: &[f64]) -> Vec<Cell> {
        values.iter().map(|&v| Cell::Number(v)).collect()
    }

    fn headers(names: &[&str]) -> Vec<Cell> {
        names.iter().map(|&n| Cell::from(n)).collect()
    }

    fn raw_numbers(repo: &Repository, name: &str) -> Vec<f64> {
        repo.get_column(DataTable::Raw, name)
            .unwrap()
            .values
            .iter()
            .map(Cell::to_f64_lossy)
            .collect()
    }

    #[test]
    fn transpose_of_empty_batch_is_empty() {
        assert_eq!(transpose(&[]).unwrap(), Vec::<Vec<Cell>>::new());
    }

    #[test]
    fn transpose_rejects_ragged_rows() {
        let batch = vec![cells(&[1.0, 2.0]), cells(&[3.0])];
        assert!(matches!(
            transpose(&batch),
            Err(PipelineError::SchemaMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn first_batch_takes_headers_then_appends() {
        let mut repo = Repository::new();
        store_batch(
            &mut repo,
            &[headers(&["a", "b"]), cells(&[1.0, 2.0]), cells(&[3.0, 4.0])],
        )
        .unwrap();
        store_batch(&mut repo, &[cells(&[5.0, 6.0])]).unwrap();

        assert_eq!(repo.column_names(TableId::Raw), vec!["a", "b"]);
        assert_eq!(raw_numbers(&repo, "a"), vec![1.0, 3.0, 5.0]);
        assert_eq!(raw_numbers(&repo, "b"), vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn chunked_ingest_matches_single_shot() {
        let mut rows = vec![headers(&["x", "y"])];
        for i in 0..2000 {
            rows.push(cells(&[i as f64, (i * 2) as f64]));
        }

        let mut whole = Repository::new();
        store_batch(&mut whole, &rows).unwrap();

        let mut chunked = Repository::new();
        store_batch(&mut chunked, &rows[..1000]).unwrap();
        store_batch(&mut chunked, &rows[1000..]).unwrap();

        for name in ["x", "y"] {
            assert_eq!(raw_numbers(&whole, name), raw_numbers(&chunked, name));
        }
    }

    #[test]
    fn header_only_batch_leaves_empty_columns() {
        let mut repo = Repository::new();
        store_batch(&mut repo, &[headers(&["c1"])]).unwrap();
        assert_eq!(
            repo.get_column(DataTable::Raw, "c1").unwrap().row_count(),
            0
        );
    }

    #[test]
    fn empty_rows_are_skipped() {
        let mut repo = Repository::new();
        store_batch(
            &mut repo,
            &[headers(&["c1"]), Vec::new(), cells(&[7.0]), Vec::new()],
        )
        .unwrap();
        assert_eq!(raw_numbers(&repo, "c1"), vec![7.0]);
    }

    #[test]
    fn numeric_headers_are_rendered_and_null_headers_rejected() {
        let mut repo = Repository::new();
        store_batch(&mut repo, &[vec![Cell::Number(7.0), Cell::from("b")]]).unwrap();
        assert_eq!(repo.column_names(TableId::Raw), vec!["7", "b"]);

        let mut repo = Repository::new();
        assert!(matches!(
            store_batch(&mut repo, &[vec![Cell::from("a"), Cell::Null]]),
            Err(PipelineError::NullHeader(1))
        ));
        assert!(repo.is_table_empty(TableId::Raw));
    }

    #[test]
    fn duplicate_headers_are_rejected_without_partial_state() {
        let mut repo = Repository::new();
        let err = store_batch(&mut repo, &[headers(&["a", "a"])]).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Repository(RepositoryError::DuplicateColumn { .. })
        ));
        assert!(repo.is_table_empty(TableId::Raw));
    }

    #[test]
    fn mismatched_batch_width_fails_and_leaves_raw_untouched() {
        let mut repo = Repository::new();
        store_batch(&mut repo, &[headers(&["a", "b"]), cells(&[1.0, 2.0])]).unwrap();

        let err = store_batch(&mut repo, &[cells(&[1.0, 2.0]), cells(&[3.0])]).unwrap_err();
        assert!(matches!(err, PipelineError::SchemaMismatch { .. }));
        assert_eq!(raw_numbers(&repo, "a"), vec![1.0]);
    }

    proptest! {
        #[test]
        fn transpose_is_an_involution_on_rectangular_batches(
            batch in prop::collection::vec(
                prop::collection::vec(-1e6f64..1e6, 4),
                0..32,
            )
        ) {
            let rows: Vec<Vec<Cell>> = batch
                .iter()
                .map(|row| row.iter().map(|&v| Cell::Number(v)).collect())
                .collect();
            let twice = transpose(&transpose(&rows).unwrap()).unwrap();
            prop_assert_eq!(twice, rows);
        }
    }
}
