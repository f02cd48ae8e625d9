//! Historical Value-at-Risk and violation-ratio backtesting.

use ndarray::{Array1, s};

use crate::MathError;

/// Quantile of the finite values in `data`, with linear interpolation between
/// order statistics.
///
/// # Errors
/// Returns `MathError::EmptyData` if there are no finite values, or
/// `MathError::InvalidConfidence` if `q` is outside `[0, 1]`.
pub fn quantile(data: &Array1<f64>, q: f64) -> Result<f64, MathError> {
    if !(0.0..=1.0).contains(&q) {
        return Err(MathError::InvalidConfidence(q));
    }

    let mut sorted: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
    if sorted.is_empty() {
        return Err(MathError::EmptyData);
    }
    sorted.sort_by(f64::total_cmp);

    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;

    Ok(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

/// Historical Value-at-Risk at the given confidence level.
///
/// The result is expressed as a return threshold: the `1 - confidence`
/// quantile of `returns`. For typical data it is negative, and a return below
/// it counts as a VaR breach.
///
/// # Errors
/// Returns `MathError::InvalidConfidence` if `confidence` is outside `(0, 1)`
/// and `MathError::EmptyData` if `returns` has no finite values.
pub fn historical_var(returns: &Array1<f64>, confidence: f64) -> Result<f64, MathError> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(MathError::InvalidConfidence(confidence));
    }
    quantile(returns, 1.0 - confidence)
}

/// Outcome of a rolling historical VaR backtest.
#[derive(Debug, Clone)]
pub struct VarBacktest {
    /// Confidence level used.
    pub confidence: f64,
    /// Estimation window length.
    pub window: usize,
    /// Number of out-of-sample days tested.
    pub test_days: usize,
    /// Days on which the return fell below that day's VaR.
    pub violations: usize,
    /// Violations expected at this confidence level.
    pub expected_violations: f64,
    /// `violations / expected_violations`; 1.0 means the model is calibrated.
    pub ratio: f64,
    /// VaR estimate for each tested day.
    pub var_series: Array1<f64>,
}

/// Rolling-window backtest of historical VaR.
///
/// For each day `t >= window`, VaR is estimated from the preceding `window`
/// returns and a violation is recorded when `r_t` falls below it. Non-finite
/// returns are dropped before the backtest starts.
///
/// # Errors
/// Returns `MathError::InvalidWindow` for a zero window,
/// `MathError::InvalidConfidence` for a confidence outside `(0, 1)`, and
/// `MathError::InsufficientData` if there are not more than `window` returns.
pub fn violation_ratio(
    returns: &Array1<f64>,
    confidence: f64,
    window: usize,
) -> Result<VarBacktest, MathError> {
    if window == 0 {
        return Err(MathError::InvalidWindow(window));
    }
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(MathError::InvalidConfidence(confidence));
    }

    let clean: Array1<f64> = returns.iter().copied().filter(|x| x.is_finite()).collect();
    let n = clean.len();
    if n <= window {
        return Err(MathError::InsufficientData { required: window + 1, actual: n });
    }

    let test_days = n - window;
    let mut var_series = Array1::zeros(test_days);
    let mut violations = 0;

    for t in window..n {
        let var = historical_var(&clean.slice(s![(t - window)..t]).to_owned(), confidence)?;
        var_series[t - window] = var;
        if clean[t] < var {
            violations += 1;
        }
    }

    let expected_violations = (1.0 - confidence) * test_days as f64;

    Ok(VarBacktest {
        confidence,
        window,
        test_days,
        violations,
        expected_violations,
        ratio: violations as f64 / expected_violations,
        var_series,
    })
}
