//! PCA engine for triplot.
//!
//! Consumes named columns from the repository, assembles them into a dense
//! numeric [`Matrix`], computes the covariance matrix and its eigenvectors
//! (cyclic Jacobi; the covariance matrix is symmetric by construction),
//! projects the standardized data and writes the result back as `PC1..PCk`.

#![forbid(unsafe_code)]

mod eigen;
mod matrix;
mod pca;

pub use crate::eigen::{symmetric_eigen, Eigen};
pub use crate::matrix::Matrix;
pub use crate::pca::{
    calculate_pca, columns_for_pca, covariance_matrix, store_pca, PcaError, PcaSource, Result,
};
