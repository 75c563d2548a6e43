/// Dense row-major `f64` matrix.
///
/// The single typed input of every PCA routine: conversion from columns
/// happens once, at the repository boundary, instead of routines accepting
/// loosely-shaped data.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.set(i, i, 1.0);
        }
        m
    }

    /// Build from equal-length column vectors (columns become matrix columns
    /// in the given order). An empty slice yields the 0×0 matrix.
    pub fn from_columns(columns: &[Vec<f64>]) -> Self {
        let cols = columns.len();
        let rows = columns.first().map_or(0, Vec::len);
        debug_assert!(columns.iter().all(|c| c.len() == rows));

        let mut m = Self::zeros(rows, cols);
        for (j, column) in columns.iter().enumerate() {
            for (i, &v) in column.iter().enumerate() {
                m.set(i, j, v);
            }
        }
        m
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn column(&self, col: usize) -> Vec<f64> {
        (0..self.rows).map(|i| self.get(i, col)).collect()
    }

    pub fn transpose(&self) -> Matrix {
        let mut out = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.set(j, i, self.get(i, j));
            }
        }
        out
    }

    pub fn matmul(&self, rhs: &Matrix) -> Matrix {
        assert_eq!(
            self.cols, rhs.rows,
            "matrix dimensions incompatible for multiplication"
        );
        let mut out = Matrix::zeros(self.rows, rhs.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let lhs = self.get(i, k);
                if lhs == 0.0 {
                    continue;
                }
                for j in 0..rhs.cols {
                    out.set(i, j, out.get(i, j) + lhs * rhs.get(k, j));
                }
            }
        }
        out
    }

    /// Keep only the first `k` columns.
    pub fn truncate_columns(&self, k: usize) -> Matrix {
        assert!(k <= self.cols, "cannot keep more columns than exist");
        let mut out = Matrix::zeros(self.rows, k);
        for i in 0..self.rows {
            for j in 0..k {
                out.set(i, j, self.get(i, j));
            }
        }
        out
    }

    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        if self.rows != self.cols {
            return false;
        }
        for i in 0..self.rows {
            for j in (i + 1)..self.cols {
                if (self.get(i, j) - self.get(j, i)).abs() > tolerance {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn from_columns_and_accessors() {
        let m = Matrix::from_columns(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        assert_eq!((m.rows(), m.cols()), (2, 3));
        assert_eq!(m.get(0, 2), 5.0);
        assert_eq!(m.column(1), vec![3.0, 4.0]);

        let empty = Matrix::from_columns(&[]);
        assert!(empty.is_empty());
        assert_eq!((empty.rows(), empty.cols()), (0, 0));
    }

    #[test]
    fn transpose_and_matmul() {
        let m = Matrix::from_columns(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        let t = m.transpose();
        assert_eq!(t.get(0, 1), 2.0);

        // (MᵗM) of a 2×2.
        let p = t.matmul(&m);
        assert_eq!(p.get(0, 0), 5.0);
        assert_eq!(p.get(0, 1), 11.0);
        assert_eq!(p.get(1, 1), 25.0);
        assert!(p.is_symmetric(0.0));
    }

    #[test]
    fn truncate_keeps_leading_columns() {
        let m = Matrix::from_columns(&[vec![1.0], vec![2.0], vec![3.0]]);
        let kept = m.truncate_columns(2);
        assert_eq!((kept.rows(), kept.cols()), (1, 2));
        assert_eq!(kept.get(0, 1), 2.0);
    }
}
