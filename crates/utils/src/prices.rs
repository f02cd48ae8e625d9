//! Price series transforms.

use chrono::Datelike;
use peerscan_primitives::PriceHistory;
use polars::prelude::*;

use crate::UtilsError;

/// Days from 0001-01-01 to 1970-01-01.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Configuration for the moving-average band.
#[derive(Debug, Clone)]
pub struct BandConfig {
    /// Rolling window length in observations.
    pub window: usize,
    /// Band half-width in rolling standard deviations.
    pub width: f64,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self { window: 20, width: 2.0 }
    }
}

/// Convert a price history into a `date`/`close` DataFrame.
///
/// # Errors
/// Returns an error if the date column cannot be built.
pub fn price_frame(history: &PriceHistory) -> Result<DataFrame, UtilsError> {
    let days: Vec<i32> =
        history.dates.iter().map(|d| d.num_days_from_ce() - EPOCH_DAYS_FROM_CE).collect();
    let date = Series::new("date".into(), days).cast(&DataType::Date)?;
    let close = Series::new("close".into(), history.closes.as_slice());

    Ok(DataFrame::new(vec![date.into(), close.into()])?)
}

/// Add a `returns` column of simple period returns, `p_t / p_{t-1} - 1`.
///
/// The first row has a null return.
pub fn simple_returns(df: LazyFrame, price_col: &str) -> LazyFrame {
    df.with_column((col(price_col) / col(price_col).shift(lit(1)) - lit(1.0)).alias("returns"))
}

/// Add `ma`, `upper` and `lower` band columns around a price column.
///
/// `ma` is the rolling mean over `config.window` observations and the band
/// sits `config.width` rolling sample standard deviations either side. Rows
/// before the first full window are null.
///
/// # Errors
/// Returns `UtilsError::InvalidParameter` if the window is shorter than 2 or
/// the width is negative or not finite.
pub fn moving_average_band(
    df: LazyFrame,
    price_col: &str,
    config: &BandConfig,
) -> Result<LazyFrame, UtilsError> {
    if config.window < 2 {
        return Err(UtilsError::InvalidParameter(format!(
            "band window must be at least 2, got {}",
            config.window
        )));
    }
    if !(config.width.is_finite() && config.width >= 0.0) {
        return Err(UtilsError::InvalidParameter(format!(
            "band width must be a non-negative number, got {}",
            config.width
        )));
    }

    let options = RollingOptionsFixedWindow {
        window_size: config.window,
        min_periods: config.window,
        ..Default::default()
    };

    let ma = col(price_col).rolling_mean(options.clone());
    let std = col(price_col).rolling_std(options);

    Ok(df.with_columns([
        ma.clone().alias("ma"),
        (ma.clone() + lit(config.width) * std.clone()).alias("upper"),
        (ma - lit(config.width) * std).alias("lower"),
    ]))
}

/// Non-null values of a numeric column, in row order.
///
/// # Errors
/// Returns `UtilsError::MissingColumn` if the column is absent.
pub fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, UtilsError> {
    if df.get_column_index(name).is_none() {
        return Err(UtilsError::MissingColumn(name.to_string()));
    }
    let cast = df.column(name)?.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().flatten().collect())
}
