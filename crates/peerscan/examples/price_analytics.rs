//! Example: Price band and VaR backtest
//!
//! This example demonstrates how to:
//! 1. Turn a price history into a DataFrame
//! 2. Compute simple returns and a moving-average band
//! 3. Estimate historical VaR and backtest it with a violation ratio

use chrono::{Days, NaiveDate};
use ndarray::Array1;
use peerscan::{
    math::{historical_var, violation_ratio},
    primitives::PriceHistory,
    utils::{BandConfig, column_values, moving_average_band, price_frame, simple_returns},
};
use polars::prelude::*;
use rand_distr::{Distribution, Normal};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Price Analytics ===\n");

    // Geometric random walk, one year of sessions
    let mut rng = rand::thread_rng();
    let shocks = Normal::new(0.0005, 0.02)?;
    let start = NaiveDate::from_ymd_opt(2024, 1, 2).ok_or("invalid start date")?;

    let mut price = 1_000.0;
    let mut dates = Vec::new();
    let mut closes = Vec::new();
    for day in 0..252u64 {
        price *= 1.0 + shocks.sample(&mut rng);
        dates.push(start + Days::new(day));
        closes.push(price);
    }
    let history = PriceHistory::new("CBDK.JK".into(), dates, closes);

    let frame = price_frame(&history)?.lazy();
    let config = BandConfig::default();
    let band = moving_average_band(simple_returns(frame, "close"), "close", &config)?.collect()?;

    println!("{}", band.tail(Some(5)));

    let returns = Array1::from(column_values(&band, "returns")?);
    let var = historical_var(&returns, 0.95)?;
    println!("\nHistorical VaR (95%): {:+.2}%", var * 100.0);

    let backtest = violation_ratio(&returns, 0.95, 100)?;
    println!(
        "Backtest: {} violations in {} days ({:.1} expected), ratio {:.2}",
        backtest.violations, backtest.test_days, backtest.expected_violations, backtest.ratio
    );

    Ok(())
}
