use crate::matrix::Matrix;

/// Eigendecomposition of a symmetric matrix: `values[i]` corresponds to the
/// `i`-th column of `vectors`, sorted by descending eigenvalue magnitude
/// (direction of maximum variance first).
#[derive(Clone, Debug)]
pub struct Eigen {
    pub values: Vec<f64>,
    pub vectors: Matrix,
}

const MAX_SWEEPS: usize = 64;

/// Cyclic Jacobi eigendecomposition.
///
/// Only defined for symmetric input; the covariance construction guarantees
/// symmetry, so an asymmetric matrix here is an internal invariant violation
/// and panics rather than returning an error.
pub fn symmetric_eigen(matrix: &Matrix) -> Eigen {
    assert!(
        matrix.is_symmetric(1e-9),
        "eigendecomposition requires a symmetric matrix"
    );

    let n = matrix.rows();
    let mut a = matrix.clone();
    let mut vectors = Matrix::identity(n);

    for _ in 0..MAX_SWEEPS {
        if off_diagonal_norm(&a) < 1e-12 {
            break;
        }
        for p in 0..n.saturating_sub(1) {
            for q in (p + 1)..n {
                rotate(&mut a, &mut vectors, p, q);
            }
        }
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| {
        a.get(j, j)
            .abs()
            .partial_cmp(&a.get(i, i).abs())
            .expect("eigenvalues are finite")
    });

    let values: Vec<f64> = order.iter().map(|&i| a.get(i, i)).collect();
    let mut sorted_vectors = Matrix::zeros(n, n);
    for (dst, &src) in order.iter().enumerate() {
        for row in 0..n {
            sorted_vectors.set(row, dst, vectors.get(row, src));
        }
    }

    Eigen {
        values,
        vectors: sorted_vectors,
    }
}

fn off_diagonal_norm(a: &Matrix) -> f64 {
    let n = a.rows();
    let mut sum = 0.0;
    for i in 0..n {
        for j in 0..n {
            if i != j {
                sum += a.get(i, j) * a.get(i, j);
            }
        }
    }
    sum.sqrt()
}

/// One Jacobi rotation zeroing `a[p][q]` (and `a[q][p]`).
fn rotate(a: &mut Matrix, vectors: &mut Matrix, p: usize, q: usize) {
    let apq = a.get(p, q);
    if apq.abs() < 1e-15 {
        return;
    }

    let theta = (a.get(q, q) - a.get(p, p)) / (2.0 * apq);
    let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
    let c = 1.0 / (t * t + 1.0).sqrt();
    let s = t * c;

    let n = a.rows();
    for k in 0..n {
        let akp = a.get(k, p);
        let akq = a.get(k, q);
        a.set(k, p, c * akp - s * akq);
        a.set(k, q, s * akp + c * akq);
    }
    for k in 0..n {
        let apk = a.get(p, k);
        let aqk = a.get(q, k);
        a.set(p, k, c * apk - s * aqk);
        a.set(q, k, s * apk + c * aqk);
    }
    for k in 0..n {
        let vkp = vectors.get(k, p);
        let vkq = vectors.get(k, q);
        vectors.set(k, p, c * vkp - s * vkq);
        vectors.set(k, q, s * vkp + c * vkq);
    }
}
