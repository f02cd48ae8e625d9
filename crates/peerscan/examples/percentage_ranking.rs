//! Example: Percentage-difference ranking
//!
//! This example demonstrates how to:
//! 1. Build a reference table in memory
//! 2. Rank peers within the target's sector and across the whole table
//! 3. See what happens when a target metric is zero

use peerscan::{
    model::{PercentageRanker, compare, compare_peers, print_ranking},
    primitives::{RatioVector, ReferenceTable, StockRecord, TargetQuery},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Percentage-Difference Ranking ===\n");

    let table: ReferenceTable<_> = [
        ("BSDE.JK", "Property & Real Estate", 4.1, 2.1e13, 7.8),
        ("CTRA.JK", "Property & Real Estate", 5.3, 1.8e13, 9.9),
        ("PWON.JK", "Property & Real Estate", 6.9, 2.0e13, 11.2),
        ("DMAS.JK", "Property & Real Estate", 16.2, 8.1e12, 19.4),
        ("BBCA.JK", "Banks", 3.6, 1.2e15, 21.7),
        ("TLKM.JK", "Telecommunication", 8.1, 3.0e14, 17.9),
        ("UNVR.JK", "Nondurable Household Products", 30.1, 1.1e14, 130.0),
    ]
    .into_iter()
    .map(|(code, sector, roa, mc, roe)| {
        StockRecord::new(code.into(), sector.into(), RatioVector::from_ratios(roa, mc, roe))
    })
    .collect();

    println!("Reference table: {} stocks", table.len());

    // Same target the dashboard starts with
    let query = TargetQuery::new(
        "CBDK.JK".into(),
        "Property & Real Estate".into(),
        RatioVector::from_ratios(14.69, 624_462_420_000.0, 35.61),
    );

    let ranker = PercentageRanker::new();
    let peers = compare_peers(&table, &query, &ranker);

    print_ranking("WITHIN SECTOR", &peers.within_sector?);
    print_ranking("WHOLE MARKET", &peers.whole_market?);

    // A zero RoA makes every RoA percentage undefined
    let zero_roa = TargetQuery::new(
        "XXXX.JK".into(),
        "Banks".into(),
        RatioVector::from_ratios(0.0, 1.0e15, 18.0),
    );
    print_ranking("ZERO ROA TARGET", &compare(&table, &zero_roa, &ranker, false)?);

    Ok(())
}
