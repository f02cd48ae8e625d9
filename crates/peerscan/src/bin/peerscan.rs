//! Peer comparison CLI tool.
//!
//! Finds the stocks most financially similar to a target, within its sector
//! and across the whole reference table, then optionally summarizes the best
//! match's recent prices.
//!
//! Usage: `cargo run --features cli --bin peerscan -- --data final_df.csv [OPTIONS]`
//! Example: `cargo run --features cli --bin peerscan -- --code CBDK.JK --prices`

use std::{error::Error, path::PathBuf};

use chrono::DateTime;
use clap::{Parser, ValueEnum};
use ndarray::Array1;
use peerscan::{
    math::{historical_var, violation_ratio},
    model::{
        MahalanobisConfig, MahalanobisRanker, ModelError, PercentageConfig, PercentageRanker,
        compare_peers, print_ranking,
    },
    primitives::{
        FundamentalVector, MetricScheme, MetricVector, PriceHistory, RankOutcome, RatioVector,
        Sector, StockCode, TargetQuery,
    },
    traits::SimilarityRanker,
    utils::{
        BandConfig, TableSchema, column_values, moving_average_band, price_frame,
        read_reference_csv, simple_returns,
    },
};
use polars::prelude::*;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use yahoo_finance_api as yahoo;

/// Calendar days per year of price history.
const DAYS_PER_YEAR: i64 = 365;

/// Market cap of the default percentage-mode target.
const DEFAULT_MARKET_CAP: f64 = 624_462_420_000.0;

/// Similarity measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Sum of percentage differences on RoA, Market Cap and RoE.
    Percentage,
    /// Mahalanobis distance on Total Assets, Market Cap, Total Equities and Net Profit.
    Mahalanobis,
}

/// Find financially similar stocks.
#[derive(Parser, Debug)]
#[command(name = "peerscan")]
#[command(about = "Find the stocks most financially similar to a target", long_about = None)]
struct Args {
    /// Reference table (comma-delimited, with a header row)
    #[arg(long, default_value = "final_df.csv")]
    data: PathBuf,

    /// Target stock code
    #[arg(long, default_value = "CBDK.JK")]
    code: String,

    /// Target sector, matched literally against the table
    #[arg(long, default_value = "Property & Real Estate")]
    sector: String,

    /// Similarity measure
    #[arg(long, value_enum, default_value_t = Mode::Percentage)]
    mode: Mode,

    /// Return on assets
    #[arg(long, default_value_t = 14.69)]
    roa: f64,

    /// Market capitalization (percentage mode defaults to 624462420000)
    #[arg(long)]
    market_cap: Option<f64>,

    /// Return on equity
    #[arg(long, default_value_t = 35.61)]
    roe: f64,

    /// Total assets (mahalanobis mode)
    #[arg(long)]
    total_assets: Option<f64>,

    /// Total equities (mahalanobis mode)
    #[arg(long)]
    total_equities: Option<f64>,

    /// Net profit (mahalanobis mode)
    #[arg(long)]
    net_profit: Option<f64>,

    /// Number of matches to show
    #[arg(long, default_value_t = 3)]
    top_n: usize,

    /// Stock code column
    #[arg(long, default_value = "Kode")]
    code_column: String,

    /// Sector column
    #[arg(long, default_value = "Sub Sektor")]
    sector_column: String,

    /// Fetch prices for the best match and run band and VaR summaries
    #[arg(long)]
    prices: bool,

    /// Years of price history
    #[arg(long, default_value_t = 1)]
    years: i64,

    /// Moving-average window
    #[arg(long, default_value_t = 20)]
    window: usize,

    /// Band width in standard deviations
    #[arg(long, default_value_t = 2.0)]
    band_width: f64,

    /// VaR confidence level
    #[arg(long, default_value_t = 0.95)]
    confidence: f64,

    /// VaR backtest estimation window
    #[arg(long, default_value_t = 100)]
    var_window: usize,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let best = match args.mode {
        Mode::Percentage => {
            let ranker = PercentageRanker::with_config(PercentageConfig { top_n: args.top_n });
            let market_cap = args.market_cap.unwrap_or(DEFAULT_MARKET_CAP);
            let metrics = RatioVector::from_ratios(args.roa, market_cap, args.roe);
            run_comparison(&args, &ranker, metrics)?
        }
        Mode::Mahalanobis => {
            let ranker = MahalanobisRanker::with_config(MahalanobisConfig { top_n: args.top_n });
            run_comparison(&args, &ranker, fundamentals(&args)?)?
        }
    };

    if args.prices {
        match best {
            Some(code) => analyze_prices(&code, &args).await?,
            None => println!("\nNo best match; skipping price analysis."),
        }
    }

    Ok(())
}

fn fundamentals(args: &Args) -> Result<FundamentalVector, Box<dyn Error>> {
    match (args.total_assets, args.market_cap, args.total_equities, args.net_profit) {
        (Some(ta), Some(mc), Some(te), Some(np)) => {
            Ok(FundamentalVector::from_fundamentals(ta, mc, te, np))
        }
        _ => Err("mahalanobis mode needs --total-assets, --market-cap, --total-equities and \
                  --net-profit"
            .into()),
    }
}

/// Load the table, rank within the sector and across the market, and print
/// both tables. Returns the code of the best match.
fn run_comparison<R: SimilarityRanker>(
    args: &Args,
    ranker: &R,
    metrics: MetricVector<R::Scheme>,
) -> Result<Option<StockCode>, Box<dyn Error>> {
    let schema = TableSchema {
        code_column: args.code_column.clone(),
        sector_column: args.sector_column.clone(),
    };
    let table = read_reference_csv::<R::Scheme>(&args.data, &schema)?;
    info!(path = %args.data.display(), rows = table.len(), "loaded reference table");

    let sector = Sector::new(args.sector.as_str());
    if !sector.is_known() {
        warn!(sector = %sector, "sector is not one of the known labels");
    }
    let query = TargetQuery::new(StockCode::new(args.code.as_str()), sector, metrics);

    println!("\nTarget: {} ({})", query.code, query.sector);
    for (metric, value) in query.metrics.iter() {
        println!("  {:<16} {value:>20.2}", metric.to_string());
    }
    println!("Ranking by {}", ranker.name());

    let peers = compare_peers(&table, &query, ranker);
    let best = peers
        .best()
        .or_else(|| peers.whole_market.as_ref().ok().and_then(RankOutcome::best))
        .map(|c| c.code.clone());

    print_section(&format!("WITHIN SECTOR: {}", query.sector), &peers.within_sector);
    print_section("WHOLE MARKET", &peers.whole_market);

    peers.within_sector?;
    peers.whole_market?;
    Ok(best)
}

fn print_section<M: MetricScheme>(title: &str, result: &Result<RankOutcome<M>, ModelError>) {
    match result {
        Ok(outcome) => print_ranking(title, outcome),
        Err(e) => {
            println!("\n{title}");
            eprintln!("Error: {e}");
            if e.is_singular_covariance() {
                eprintln!("Pool is too small or has collinear metrics; try the percentage mode.");
            }
        }
    }
}

/// Fetch daily adjusted closes from Yahoo Finance.
async fn fetch_history(code: &StockCode, years: i64) -> Result<PriceHistory, Box<dyn Error>> {
    let provider = yahoo::YahooConnector::new()?;

    let end = OffsetDateTime::now_utc();
    let start = end - Duration::days(years * DAYS_PER_YEAR);
    info!(code = %code, start = %start.date(), end = %end.date(), "fetching price history");

    let response = provider.get_quote_history(code.as_str(), start, end).await?;
    let quotes = response.quotes()?;

    let mut dates = Vec::with_capacity(quotes.len());
    let mut closes = Vec::with_capacity(quotes.len());
    for quote in &quotes {
        let Some(timestamp) = DateTime::from_timestamp(quote.timestamp, 0) else {
            continue;
        };
        dates.push(timestamp.date_naive());
        closes.push(quote.adjclose);
    }

    Ok(PriceHistory::new(code.clone(), dates, closes))
}

async fn analyze_prices(code: &StockCode, args: &Args) -> Result<(), Box<dyn Error>> {
    let history = fetch_history(code, args.years).await?;
    let Some((first, last)) = history.date_range() else {
        warn!(code = %code, "no price history returned");
        return Ok(());
    };

    let config = BandConfig { window: args.window, width: args.band_width };
    let frame = price_frame(&history)?.lazy();
    let band = moving_average_band(simple_returns(frame, "close"), "close", &config)?.collect()?;

    let outside = band
        .clone()
        .lazy()
        .filter(col("close").gt(col("upper")).or(col("close").lt(col("lower"))))
        .collect()?
        .height();
    let latest = band.tail(Some(1));

    println!("\n================================================================================");
    println!("PRICE SUMMARY: {code}");
    println!("================================================================================");
    println!("Period: {first} to {last} ({} sessions)", history.len());
    if let Some(close) = history.last_close() {
        println!("Last close:        {close:>14.2}");
    }
    if let (Some(ma), Some(upper), Some(lower)) = (
        column_values(&latest, "ma")?.first().copied(),
        column_values(&latest, "upper")?.first().copied(),
        column_values(&latest, "lower")?.first().copied(),
    ) {
        println!("MA({}):            {ma:>14.2}", config.window);
        println!("Band:              {lower:>14.2} .. {upper:.2}");
    }
    println!("Closes outside band: {outside}");

    let returns = Array1::from(column_values(&band, "returns")?);
    let var = historical_var(&returns, args.confidence)?;
    println!("--------------------------------------------------------------------------------");
    println!("Historical VaR ({:.0}%): {:>+8.2}%", args.confidence * 100.0, var * 100.0);

    match violation_ratio(&returns, args.confidence, args.var_window) {
        Ok(backtest) => {
            println!(
                "Backtest: {} violations in {} days, {:.1} expected, ratio {:.2}",
                backtest.violations,
                backtest.test_days,
                backtest.expected_violations,
                backtest.ratio
            );
        }
        Err(e) => warn!(error = %e, "skipping VaR backtest"),
    }

    Ok(())
}
