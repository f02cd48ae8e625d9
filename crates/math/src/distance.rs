//! Similarity distances between metric vectors.

use ndarray::{Array1, Array2};

use crate::{MathError, covariance, invert, quadratic_form};

/// Column variances at or below this fraction of the squared column scale
/// count as zero. Rounding in the mean of a constant column leaves a variance
/// near `1e-32` times the squared scale.
const VARIANCE_TOLERANCE: f64 = 1e-24;

/// Absolute difference of `value` from `target`, as a percentage of `|target|`.
///
/// Returns `None` when `target` is zero, where the ratio is undefined.
#[must_use]
pub fn percentage_difference(value: f64, target: f64) -> Option<f64> {
    if target == 0.0 {
        return None;
    }
    Some((value - target).abs() / target.abs() * 100.0)
}

/// Mahalanobis distance fitted to a set of observations.
///
/// Holds the inverse of the sample covariance of the observations it was
/// fitted on. Fitting is done per pool; nothing is cached across fits.
#[derive(Debug, Clone)]
pub struct Mahalanobis {
    inv_cov: Array2<f64>,
}

impl Mahalanobis {
    /// Fit to observations (n x p).
    ///
    /// The covariance is inverted through its correlation matrix so the
    /// singularity test does not depend on the units of each column.
    ///
    /// # Errors
    /// Returns `MathError::InsufficientData` if `n < p + 1`, and
    /// `MathError::Singular` if the covariance has no inverse or a column is
    /// constant up to rounding.
    pub fn fit(observations: &Array2<f64>) -> Result<Self, MathError> {
        let n = observations.nrows();
        let p = observations.ncols();

        if p == 0 {
            return Err(MathError::EmptyData);
        }
        if n < p + 1 {
            return Err(MathError::InsufficientData { required: p + 1, actual: n });
        }

        let cov = covariance(observations)?;

        for (j, column) in observations.columns().into_iter().enumerate() {
            let scale = column.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
            if cov[[j, j]] <= scale * scale * VARIANCE_TOLERANCE {
                return Err(MathError::Singular);
            }
        }

        let std_dev: Array1<f64> = cov.diag().mapv(f64::sqrt);
        if std_dev.iter().any(|s| !s.is_finite()) {
            return Err(MathError::Singular);
        }

        let mut corr = cov;
        for i in 0..p {
            for j in 0..p {
                corr[[i, j]] /= std_dev[i] * std_dev[j];
            }
        }

        let mut inv_cov = invert(&corr)?;
        for i in 0..p {
            for j in 0..p {
                inv_cov[[i, j]] /= std_dev[i] * std_dev[j];
            }
        }

        Ok(Self { inv_cov })
    }

    /// Distance between two points.
    ///
    /// Rounding can push the quadratic form slightly below zero for
    /// near-identical points; it is clamped to zero before the square root.
    ///
    /// # Errors
    /// Returns `MathError::DimensionMismatch` if either point has the wrong length.
    pub fn distance(&self, x: &Array1<f64>, y: &Array1<f64>) -> Result<f64, MathError> {
        if x.len() != y.len() {
            return Err(MathError::DimensionMismatch { expected: x.len(), actual: y.len() });
        }
        let diff = x - y;
        let q = quadratic_form(&diff, &self.inv_cov)?;
        Ok(q.max(0.0).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(110.0, 100.0, 10.0)]
    #[case(90.0, 100.0, 10.0)]
    #[case(-5.0, -10.0, 50.0)]
    #[case(12.0, 11.0, 100.0 / 11.0)]
    fn percentage_difference_values(#[case] value: f64, #[case] target: f64, #[case] expected: f64) {
        assert_relative_eq!(percentage_difference(value, target).unwrap(), expected, epsilon = 1e-10);
    }

    #[test]
    fn percentage_difference_zero_target() {
        assert_eq!(percentage_difference(1.0, 0.0), None);
        assert_eq!(percentage_difference(0.0, 0.0), None);
    }

    #[test]
    fn mahalanobis_diagonal_covariance() {
        let obs = array![[1.0, 0.0], [-1.0, 0.0], [0.0, 1.0], [0.0, -1.0]];
        let m = Mahalanobis::fit(&obs).unwrap();

        // Each variance is 2/3, so a unit step has distance sqrt(1.5).
        let d = m.distance(&array![1.0, 0.0], &array![0.0, 0.0]).unwrap();
        assert_relative_eq!(d, 1.5_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn mahalanobis_is_scale_invariant() {
        let obs = array![
            [1.0, 10.0, 3.0],
            [2.0, 12.0, 1.0],
            [4.0, 9.0, 2.0],
            [3.0, 15.0, 5.0],
            [5.0, 11.0, 4.0]
        ];
        let mut scaled = obs.clone();
        scaled.column_mut(1).mapv_inplace(|v| v * 1e9);

        let a = Mahalanobis::fit(&obs).unwrap();
        let b = Mahalanobis::fit(&scaled).unwrap();

        let x = array![2.5, 11.0, 2.0];
        let y = array![3.0, 13.0, 4.0];
        let xs = array![2.5, 11.0e9, 2.0];
        let ys = array![3.0, 13.0e9, 4.0];

        assert_relative_eq!(
            a.distance(&x, &y).unwrap(),
            b.distance(&xs, &ys).unwrap(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn mahalanobis_identical_points() {
        let obs = array![[1.0, 0.0], [-1.0, 0.0], [0.0, 1.0], [0.0, -1.0]];
        let m = Mahalanobis::fit(&obs).unwrap();
        let x = array![0.3, 0.7];
        assert_eq!(m.distance(&x, &x).unwrap(), 0.0);
    }

    #[test]
    fn mahalanobis_too_few_observations() {
        let obs = array![[1.0, 2.0, 3.0, 4.0], [2.0, 3.0, 4.0, 6.0]];
        assert!(matches!(
            Mahalanobis::fit(&obs),
            Err(MathError::InsufficientData { required: 5, actual: 2 })
        ));
    }

    #[test]
    fn mahalanobis_collinear_observations() {
        let obs = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0], [4.0, 8.0]];
        assert!(matches!(Mahalanobis::fit(&obs), Err(MathError::Singular)));
    }

    #[test]
    fn mahalanobis_constant_column() {
        let obs = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0]];
        assert!(matches!(Mahalanobis::fit(&obs), Err(MathError::Singular)));
    }

    #[test]
    fn mahalanobis_constant_column_with_inexact_mean() {
        let obs = array![[1.0, 0.1], [2.0, 0.1], [4.0, 0.1], [3.0, 0.1], [7.0, 0.1], [5.0, 0.1]];
        assert!(matches!(Mahalanobis::fit(&obs), Err(MathError::Singular)));
    }

    #[test]
    fn mahalanobis_scaled_column_with_inexact_values() {
        let first = [1.1, 2.3, 3.7, 4.9, 6.2];
        let mut obs = Array2::zeros((first.len(), 2));
        for (i, v) in first.iter().enumerate() {
            obs[[i, 0]] = *v;
            obs[[i, 1]] = v * 0.1;
        }
        assert!(matches!(Mahalanobis::fit(&obs), Err(MathError::Singular)));
    }

    #[test]
    fn mahalanobis_small_but_real_spread() {
        let obs = array![[1.0, 0.1], [2.0, 0.1001], [4.0, 0.0999], [3.0, 0.1002], [7.0, 0.1]];
        assert!(Mahalanobis::fit(&obs).is_ok());
    }

    #[test]
    fn mahalanobis_dimension_mismatch() {
        let obs = array![[1.0, 0.0], [-1.0, 0.0], [0.0, 1.0], [0.0, -1.0]];
        let m = Mahalanobis::fit(&obs).unwrap();
        assert!(matches!(
            m.distance(&array![1.0, 2.0], &array![1.0]),
            Err(MathError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }
}
