use crate::eigen::symmetric_eigen;
use crate::matrix::Matrix;
use thiserror::Error;
use triplot_columnar::{Cell, Column, DataTable, Repository, RepositoryError};

#[derive(Debug, Error)]
pub enum PcaError {
    #[error("need at least 2 rows for a covariance matrix, got {0}")]
    InsufficientRows(usize),
    #[error("invalid component count {requested}: must be in 1..={available}")]
    InvalidComponentCount { requested: usize, available: usize },
    #[error("column {0:?} contains non-finite values")]
    NonFiniteColumn(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type Result<T> = std::result::Result<T, PcaError>;

/// Which table the input columns are read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PcaSource {
    Raw,
    Standardized,
}

impl From<PcaSource> for DataTable {
    fn from(source: PcaSource) -> Self {
        match source {
            PcaSource::Raw => DataTable::Raw,
            PcaSource::Standardized => DataTable::Standardized,
        }
    }
}

/// Assemble named columns into a dense numeric matrix (rows = samples,
/// columns in requested order). Cells coerce lossily, matching the
/// statistics contract; an empty name list yields the 0×0 matrix.
///
/// NaN or infinite number cells are rejected here, at the boundary: the
/// eigensolver's convergence and ordering are only defined for finite input.
pub fn columns_for_pca(repo: &Repository, names: &[&str], source: PcaSource) -> Result<Matrix> {
    let table: DataTable = source.into();
    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(names.len());
    let mut rows: Option<usize> = None;

    for &name in names {
        let column = repo.get_column(table, name)?;
        match rows {
            None => rows = Some(column.row_count()),
            Some(expected) if expected != column.row_count() => {
                return Err(RepositoryError::RowLengthMismatch {
                    name: name.to_owned(),
                    expected,
                    found: column.row_count(),
                }
                .into());
            }
            Some(_) => {}
        }
        let values: Vec<f64> = column.values.iter().map(Cell::to_f64_lossy).collect();
        if values.iter().any(|v| !v.is_finite()) {
            return Err(PcaError::NonFiniteColumn(name.to_owned()));
        }
        columns.push(values);
    }

    Ok(Matrix::from_columns(&columns))
}

/// `(Xᵗ·X) / (rows − 1)`. Symmetric by construction.
pub fn covariance_matrix(x: &Matrix) -> Result<Matrix> {
    if x.rows() <= 1 {
        return Err(PcaError::InsufficientRows(x.rows()));
    }
    let mut cov = x.transpose().matmul(x);
    let scale = 1.0 / (x.rows() - 1) as f64;
    for i in 0..cov.rows() {
        for j in 0..cov.cols() {
            cov.set(i, j, cov.get(i, j) * scale);
        }
    }
    Ok(cov)
}

/// Center and scale each column by its sample (n−1) standard deviation,
/// consistent with the n−1 covariance normalization. Constant columns are
/// centered but not scaled.
fn standardize(x: &Matrix) -> Matrix {
    let rows = x.rows();
    let mut out = x.clone();
    if rows == 0 {
        return out;
    }

    for j in 0..x.cols() {
        let mean = (0..rows).map(|i| x.get(i, j)).sum::<f64>() / rows as f64;
        let std_dev = if rows >= 2 {
            let var = (0..rows)
                .map(|i| {
                    let d = x.get(i, j) - mean;
                    d * d
                })
                .sum::<f64>()
                / (rows - 1) as f64;
            var.sqrt()
        } else {
            0.0
        };

        for i in 0..rows {
            let centered = x.get(i, j) - mean;
            out.set(i, j, if std_dev == 0.0 { centered } else { centered / std_dev });
        }
    }
    out
}

/// Standardize-then-project PCA over the named RAW columns.
///
/// Builds the standardized matrix, computes its covariance and eigenvectors,
/// and returns `Z·V` truncated to the first `k` columns (`k` defaults to
/// `names.len()`). The sign of any component column is ambiguous; comparisons
/// against other implementations must tolerate per-column flips.
pub fn calculate_pca(repo: &Repository, names: &[&str], components: Option<usize>) -> Result<Matrix> {
    let k = components.unwrap_or(names.len());
    if k == 0 || k > names.len() {
        return Err(PcaError::InvalidComponentCount {
            requested: k,
            available: names.len(),
        });
    }

    let raw = columns_for_pca(repo, names, PcaSource::Raw)?;
    let standardized = standardize(&raw);
    let covariance = covariance_matrix(&standardized)?;
    let eigen = symmetric_eigen(&covariance);
    Ok(standardized.matmul(&eigen.vectors).truncate_columns(k))
}

/// Run [`calculate_pca`] and write the result into the PCA table as
/// `PC1..PCk`, replacing any previous contents. Returns `false` instead of
/// propagating errors (batch surface for the UI collaborator).
pub fn store_pca(repo: &mut Repository, names: &[&str], components: Option<usize>) -> bool {
    let projected = match calculate_pca(repo, names, components) {
        Ok(projected) => projected,
        Err(_) => return false,
    };

    repo.clear_pca();
    for j in 0..projected.cols() {
        let values = projected.column(j).into_iter().map(Cell::Number).collect();
        repo.replace_column(DataTable::Pca, Column::new(format!("PC{}", j + 1), values));
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use triplot_columnar::TableId;
    use triplot_pipeline::{calculate_statistics, store_batch, store_standardized};

    const EPS: f64 = 1e-9;

    /// The four-column example dataset used across the pipeline tests.
    fn example_repo() -> Repository {
        let mut repo = Repository::new();
        let rows: Vec<Vec<Cell>> = vec![
            ["col1", "col2", "col3", "col4"]
                .iter()
                .map(|&n| Cell::from(n))
                .collect(),
            vec![1.0, 2.0, 3.0, 4.0].into_iter().map(Cell::Number).collect(),
            vec![5.0, 5.0, 6.0, 7.0].into_iter().map(Cell::Number).collect(),
            vec![1.0, 4.0, 2.0, 3.0].into_iter().map(Cell::Number).collect(),
            vec![5.0, 3.0, 2.0, 1.0].into_iter().map(Cell::Number).collect(),
            vec![8.0, 1.0, 2.0, 2.0].into_iter().map(Cell::Number).collect(),
        ];
        store_batch(&mut repo, &rows).unwrap();
        repo
    }

    #[test]
    fn columns_assemble_in_requested_order() {
        let repo = example_repo();
        let m = columns_for_pca(&repo, &["col3", "col1"], PcaSource::Raw).unwrap();
        assert_eq!((m.rows(), m.cols()), (5, 2));
        assert_eq!(m.column(0), vec![3.0, 6.0, 2.0, 2.0, 2.0]);
        assert_eq!(m.column(1), vec![1.0, 5.0, 1.0, 5.0, 8.0]);

        assert!(columns_for_pca(&repo, &[], PcaSource::Raw)
            .unwrap()
            .is_empty());
        assert!(matches!(
            columns_for_pca(&repo, &["nope"], PcaSource::Raw),
            Err(PcaError::Repository(RepositoryError::ColumnNotFound(_)))
        ));
    }

    #[test]
    fn columns_from_standardized_table() {
        let mut repo = example_repo();
        calculate_statistics(&mut repo).unwrap();
        assert!(store_standardized(&mut repo));

        let m = columns_for_pca(&repo, &["col1"], PcaSource::Standardized).unwrap();
        // mean 4, population std √7.2.
        assert!((m.get(0, 0) - (1.0 - 4.0) / 7.2f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn covariance_requires_at_least_two_rows() {
        for rows in [0usize, 1] {
            let m = Matrix::from_columns(&vec![vec![0.0; rows]; 2]);
            assert!(matches!(
                covariance_matrix(&m),
                Err(PcaError::InsufficientRows(r)) if r == rows
            ));
        }
    }

    #[test]
    fn pca_preserves_row_count_and_component_count() {
        let repo = example_repo();
        let names = ["col1", "col2", "col3", "col4"];

        let full = calculate_pca(&repo, &names, None).unwrap();
        assert_eq!((full.rows(), full.cols()), (5, 4));

        let two = calculate_pca(&repo, &names, Some(2)).unwrap();
        assert_eq!((two.rows(), two.cols()), (5, 2));
    }

    #[test]
    fn invalid_component_counts_are_rejected() {
        let repo = example_repo();
        let names = ["col1", "col2"];

        assert!(matches!(
            calculate_pca(&repo, &names, Some(0)),
            Err(PcaError::InvalidComponentCount { requested: 0, available: 2 })
        ));
        assert!(matches!(
            calculate_pca(&repo, &names, Some(3)),
            Err(PcaError::InvalidComponentCount { requested: 3, available: 2 })
        ));
        // Empty name list defaults to k = 0.
        assert!(matches!(
            calculate_pca(&repo, &[], None),
            Err(PcaError::InvalidComponentCount { .. })
        ));
    }

    #[test]
    fn worked_example_matches_reference_up_to_sign() {
        let repo = example_repo();
        let projected =
            calculate_pca(&repo, &["col1", "col2", "col3", "col4"], None).unwrap();

        // Row 0 of an SVD-based reference implementation; each component's
        // sign is ambiguous.
        let expected = [-0.0140, 0.7560, 0.9412, -0.1019];
        for (j, &reference) in expected.iter().enumerate() {
            let got = projected.get(0, j);
            assert!(
                (got - reference).abs() < 1e-3 || (got + reference).abs() < 1e-3,
                "component {j}: got {got}, want ±{reference}"
            );
        }
    }

    #[test]
    fn store_pca_writes_pc_columns_and_overwrites() {
        let mut repo = example_repo();
        assert!(store_pca(&mut repo, &["col1", "col2", "col3", "col4"], None));
        assert_eq!(
            repo.column_names(TableId::Pca),
            vec!["PC1", "PC2", "PC3", "PC4"]
        );
        assert_eq!(
            repo.get_column(DataTable::Pca, "PC1").unwrap().row_count(),
            5
        );

        // Recomputing with fewer components drops the stale columns.
        assert!(store_pca(&mut repo, &["col1", "col2"], None));
        assert_eq!(repo.column_names(TableId::Pca), vec!["PC1", "PC2"]);

        // Failure reports false and is not a panic.
        assert!(!store_pca(&mut repo, &["missing"], None));
    }

    #[test]
    fn non_finite_cells_are_rejected_not_panicked_on() {
        let mut repo = Repository::new();
        store_batch(
            &mut repo,
            &[
                vec![Cell::from("a"), Cell::from("b")],
                vec![Cell::Number(f64::NAN), Cell::Number(1.0)],
                vec![Cell::Number(2.0), Cell::Number(3.0)],
                vec![Cell::Number(4.0), Cell::Number(5.0)],
            ],
        )
        .unwrap();

        assert!(matches!(
            calculate_pca(&repo, &["a", "b"], None),
            Err(PcaError::NonFiniteColumn(ref name)) if name == "a"
        ));
        // The boolean batch surface reports failure instead of aborting.
        assert!(!store_pca(&mut repo, &["a", "b"], None));
    }

    proptest! {
        #[test]
        fn covariance_is_symmetric(
            columns in prop::collection::vec(
                prop::collection::vec(-100.0f64..100.0, 2..16),
                1..5,
            )
        ) {
            let rows = columns[0].len();
            let rectangular: Vec<Vec<f64>> = columns
                .into_iter()
                .map(|mut c| { c.resize(rows, 0.0); c })
                .collect();
            let m = Matrix::from_columns(&rectangular);
            let cov = covariance_matrix(&m).unwrap();
            prop_assert!(cov.is_symmetric(1e-9));
        }
    }
}
