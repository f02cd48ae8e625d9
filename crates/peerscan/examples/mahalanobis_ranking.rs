//! Example: Mahalanobis ranking
//!
//! This example demonstrates how to:
//! 1. Generate a synthetic balance-sheet universe
//! 2. Rank the whole universe by Mahalanobis distance
//! 3. Handle a sector too small to estimate a covariance from

use peerscan::{
    model::{MahalanobisRanker, compare, print_ranking},
    primitives::{FundamentalVector, KNOWN_SECTORS, ReferenceTable, StockRecord, TargetQuery},
};
use rand::Rng;
use rand_distr::{Distribution, LogNormal};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Mahalanobis Ranking ===\n");

    let mut rng = rand::thread_rng();
    let assets = LogNormal::new(28.0, 1.2)?;

    // Equity, market cap and profit scale with assets plus noise
    let table: ReferenceTable<_> = (0..200)
        .map(|i| {
            let ta = assets.sample(&mut rng);
            let te = ta * rng.gen_range(0.2..0.7);
            let mc = te * rng.gen_range(0.5..3.0);
            let np = te * rng.gen_range(-0.05..0.25);
            let sector = KNOWN_SECTORS[i % 10];
            StockRecord::new(
                format!("S{i:03}.JK").into(),
                sector.into(),
                FundamentalVector::from_fundamentals(ta, mc, te, np),
            )
        })
        .collect();

    println!("Generated {} stocks across 10 sectors", table.len());

    let target = FundamentalVector::from_fundamentals(1.5e12, 6.2e11, 7.0e11, 9.0e10);
    let query = TargetQuery::new("CBDK.JK".into(), KNOWN_SECTORS[0].into(), target);
    let ranker = MahalanobisRanker::new();

    print_ranking("WHOLE MARKET", &compare(&table, &query, &ranker, false)?);
    print_ranking("WITHIN SECTOR", &compare(&table, &query, &ranker, true)?);

    // Two candidates cannot support a 4x4 covariance
    let small: ReferenceTable<_> = table.iter().take(2).cloned().collect();
    match compare(&small, &query, &ranker, false) {
        Ok(outcome) => print_ranking("SMALL TABLE", &outcome),
        Err(e) => println!("\nSmall table: {e}"),
    }

    Ok(())
}
