//! Linear algebra operations for covariance-based distances.

use ndarray::{Array1, Array2, Axis};

use crate::MathError;

/// Pivots smaller than this fraction of the largest entry are treated as zero.
const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Sample covariance matrix of the columns of `data`.
///
/// Each row is one observation, each column one variable. Uses the `n - 1`
/// denominator.
///
/// # Arguments
/// * `data` - Observation matrix (n x p)
///
/// # Returns
/// Covariance matrix (p x p).
///
/// # Errors
/// Returns `MathError::InsufficientData` with fewer than two observations, or
/// `MathError::NumericalInstability` if any value is not finite.
pub fn covariance(data: &Array2<f64>) -> Result<Array2<f64>, MathError> {
    let n = data.nrows();
    if data.ncols() == 0 {
        return Err(MathError::EmptyData);
    }
    if n < 2 {
        return Err(MathError::InsufficientData { required: 2, actual: n });
    }
    if data.iter().any(|v| !v.is_finite()) {
        return Err(MathError::NumericalInstability("non-finite observation".to_string()));
    }

    let means = data.mean_axis(Axis(0)).ok_or(MathError::EmptyData)?;
    let centered = data - &means;

    Ok(centered.t().dot(&centered) / (n - 1) as f64)
}

/// Invert a square matrix using Gauss-Jordan elimination with partial pivoting.
///
/// # Errors
/// Returns `MathError::Singular` if a pivot falls below the scale-relative
/// tolerance, or `MathError::LinearAlgebra` if the matrix is not square.
pub fn invert(matrix: &Array2<f64>) -> Result<Array2<f64>, MathError> {
    let n = matrix.nrows();
    if n == 0 {
        return Err(MathError::EmptyData);
    }
    if matrix.ncols() != n {
        return Err(MathError::LinearAlgebra("matrix must be square".to_string()));
    }
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(MathError::NumericalInstability("non-finite matrix entry".to_string()));
    }

    let scale = matrix.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 {
        return Err(MathError::Singular);
    }
    let tolerance = scale * SINGULAR_TOLERANCE;

    // Augmented matrix [A | I]
    let mut aug = Array2::zeros((n, 2 * n));
    for i in 0..n {
        for j in 0..n {
            aug[[i, j]] = matrix[[i, j]];
        }
        aug[[i, n + i]] = 1.0;
    }

    for col in 0..n {
        // Find pivot
        let mut max_row = col;
        let mut max_val = aug[[col, col]].abs();
        for row in (col + 1)..n {
            if aug[[row, col]].abs() > max_val {
                max_val = aug[[row, col]].abs();
                max_row = row;
            }
        }

        if max_val < tolerance {
            return Err(MathError::Singular);
        }

        if max_row != col {
            for j in 0..(2 * n) {
                aug.swap([col, j], [max_row, j]);
            }
        }

        let pivot = aug[[col, col]];
        for j in 0..(2 * n) {
            aug[[col, j]] /= pivot;
        }

        // Eliminate the column everywhere else
        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = aug[[row, col]];
            if factor == 0.0 {
                continue;
            }
            for j in 0..(2 * n) {
                aug[[row, j]] -= factor * aug[[col, j]];
            }
        }
    }

    let mut inverse = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            inverse[[i, j]] = aug[[i, n + j]];
        }
    }

    Ok(inverse)
}

/// Compute `x' M x`.
///
/// # Errors
/// Returns `MathError::DimensionMismatch` if `x` does not match `m`.
pub fn quadratic_form(x: &Array1<f64>, m: &Array2<f64>) -> Result<f64, MathError> {
    if m.nrows() != x.len() || m.ncols() != x.len() {
        return Err(MathError::DimensionMismatch { expected: m.nrows(), actual: x.len() });
    }
    Ok(x.dot(&m.dot(x)))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;

    use super::*;

    #[test]
    fn covariance_of_perfectly_correlated_columns() {
        let data = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]];
        let cov = covariance(&data).unwrap();

        assert_relative_eq!(cov[[0, 0]], 1.0, epsilon = 1e-12);
        assert_relative_eq!(cov[[1, 1]], 4.0, epsilon = 1e-12);
        assert_relative_eq!(cov[[0, 1]], 2.0, epsilon = 1e-12);
        assert_relative_eq!(cov[[1, 0]], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn covariance_needs_two_rows() {
        let data = array![[1.0, 2.0]];
        assert!(matches!(
            covariance(&data),
            Err(MathError::InsufficientData { required: 2, actual: 1 })
        ));
    }

    #[test]
    fn covariance_rejects_nan() {
        let data = array![[1.0, f64::NAN], [2.0, 3.0]];
        assert!(matches!(covariance(&data), Err(MathError::NumericalInstability(_))));
    }

    #[test]
    fn invert_two_by_two() {
        let m = array![[4.0, 7.0], [2.0, 6.0]];
        let inv = invert(&m).unwrap();

        assert_relative_eq!(inv[[0, 0]], 0.6, epsilon = 1e-12);
        assert_relative_eq!(inv[[0, 1]], -0.7, epsilon = 1e-12);
        assert_relative_eq!(inv[[1, 0]], -0.2, epsilon = 1e-12);
        assert_relative_eq!(inv[[1, 1]], 0.4, epsilon = 1e-12);
    }

    #[test]
    fn invert_needs_pivoting() {
        let m = array![[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 2.0]];
        let inv = invert(&m).unwrap();
        let identity = m.dot(&inv);

        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(identity[[i, j]], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn invert_singular_matrix() {
        let m = array![[1.0, 2.0], [2.0, 4.0]];
        assert!(matches!(invert(&m), Err(MathError::Singular)));

        let zeros = Array2::<f64>::zeros((3, 3));
        assert!(matches!(invert(&zeros), Err(MathError::Singular)));
    }

    #[test]
    fn invert_non_square() {
        let m = Array2::<f64>::zeros((2, 3));
        assert!(matches!(invert(&m), Err(MathError::LinearAlgebra(_))));
    }

    #[test]
    fn quadratic_form_identity() {
        let x = array![3.0, 4.0];
        let m = array![[1.0, 0.0], [0.0, 1.0]];
        assert_relative_eq!(quadratic_form(&x, &m).unwrap(), 25.0);

        let bad = array![1.0, 2.0, 3.0];
        assert!(quadratic_form(&bad, &m).is_err());
    }
}
