//! Target-versus-table comparison.

use peerscan_primitives::{RankOutcome, RankedCandidate, ReferenceTable, TargetQuery};
use peerscan_traits::SimilarityRanker;
use tracing::{debug, info};

use crate::{ModelError, select_pool};

/// Compare a target against a reference table.
///
/// Selects the candidate pool, then ranks it with `ranker`. The table is
/// only borrowed and is never modified.
///
/// # Arguments
/// * `table` - Reference table for the ranker's metric scheme
/// * `query` - Target code, sector and metric values
/// * `ranker` - Similarity ranker
/// * `restrict_to_sector` - Whether to limit candidates to the target's sector
///
/// # Returns
/// `RankOutcome::NoCandidates` when no stock other than the target exists,
/// otherwise the ranked top candidates.
///
/// # Errors
/// Returns `ModelError::NonFiniteTarget` if a target metric is NaN or
/// infinite, and propagates ranker failures such as a singular covariance.
pub fn compare<R: SimilarityRanker>(
    table: &ReferenceTable<R::Scheme>,
    query: &TargetQuery<R::Scheme>,
    ranker: &R,
    restrict_to_sector: bool,
) -> Result<RankOutcome<R::Scheme>, ModelError> {
    if let Some((metric, value)) = query.metrics.iter().find(|(_, v)| !v.is_finite()) {
        return Err(ModelError::NonFiniteTarget { metric: metric.to_string(), value });
    }

    let pool = select_pool(table, &query.code, &query.sector, restrict_to_sector);
    if pool.is_empty() {
        info!(code = %query.code, "no candidates to compare against");
        return Ok(RankOutcome::NoCandidates);
    }

    debug!(
        ranker = ranker.name(),
        code = %query.code,
        scope = %pool.scope(),
        pool_size = pool.len(),
        "ranking candidate pool"
    );

    match ranker.rank(&pool, &query.metrics) {
        Ok(result) => Ok(RankOutcome::Ranked(result)),
        Err(e) if e.is_recoverable() => Ok(RankOutcome::NoCandidates),
        Err(e) => Err(e.into()),
    }
}

/// Results of comparing a target within its sector and across the whole table.
#[derive(Debug)]
pub struct PeerComparison<R: SimilarityRanker> {
    /// Ranking restricted to the target's sector, with fallback.
    pub within_sector: Result<RankOutcome<R::Scheme>, ModelError>,
    /// Ranking against every stock in the table.
    pub whole_market: Result<RankOutcome<R::Scheme>, ModelError>,
}

impl<R: SimilarityRanker> PeerComparison<R> {
    /// Best match within the sector, if that ranking succeeded.
    #[must_use]
    pub fn best(&self) -> Option<&RankedCandidate<R::Scheme>> {
        self.within_sector.as_ref().ok().and_then(RankOutcome::best)
    }
}

/// Run both the sector-restricted and the unrestricted comparison.
///
/// Each ranking fails independently: a singular covariance in a small sector
/// does not hide the whole-market result.
pub fn compare_peers<R: SimilarityRanker>(
    table: &ReferenceTable<R::Scheme>,
    query: &TargetQuery<R::Scheme>,
    ranker: &R,
) -> PeerComparison<R> {
    PeerComparison {
        within_sector: compare(table, query, ranker, true),
        whole_market: compare(table, query, ranker, false),
    }
}

#[cfg(test)]
mod tests {
    use peerscan_primitives::{
        FundamentalVector, MahalanobisMetric, PercentageMetric, PoolScope, RatioVector,
        StockRecord,
    };
    use rstest::rstest;

    use super::*;
    use crate::{MahalanobisRanker, PercentageRanker};

    fn ratio_table() -> ReferenceTable<PercentageMetric> {
        [
            ("AAAA", "Banks", 1.5, 2.0e12, 12.0),
            ("BBBB", "Banks", 2.0, 3.0e12, 15.0),
            ("CCCC", "Telecommunication", 4.0, 8.0e12, 20.0),
            ("DDDD", "Property & Real Estate", 6.0, 1.0e12, 9.0),
            ("EEEE", "Property & Real Estate", 14.0, 6.0e11, 33.0),
        ]
        .into_iter()
        .map(|(code, sector, roa, mc, roe)| {
            StockRecord::new(code.into(), sector.into(), RatioVector::from_ratios(roa, mc, roe))
        })
        .collect()
    }

    fn query(
        code: &str,
        sector: &str,
        roa: f64,
        mc: f64,
        roe: f64,
    ) -> TargetQuery<PercentageMetric> {
        TargetQuery::new(code.into(), sector.into(), RatioVector::from_ratios(roa, mc, roe))
    }

    #[test]
    fn sector_comparison_stays_in_sector() {
        let table = ratio_table();
        let q = query("CBDK", "Property & Real Estate", 14.69, 6.2446242e11, 35.61);

        let outcome = compare(&table, &q, &PercentageRanker::new(), true).unwrap();
        let result = outcome.ranked().unwrap();

        assert_eq!(result.scope(), PoolScope::Sector);
        assert_eq!(result.codes(), vec!["EEEE", "DDDD"]);
    }

    #[test]
    fn fallback_matches_unrestricted_ranking() {
        let table = ratio_table();
        let q = query("XXXX", "Consumer Services", 3.0, 4.0e12, 18.0);
        let ranker = PercentageRanker::new();

        let fallback = compare(&table, &q, &ranker, true).unwrap();
        let full = compare(&table, &q, &ranker, false).unwrap();

        let fallback = fallback.ranked().unwrap();
        let full = full.ranked().unwrap();
        assert_eq!(fallback.scope(), PoolScope::SectorFallback);
        assert_eq!(full.scope(), PoolScope::Full);
        assert_eq!(fallback.candidates(), full.candidates());
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn target_never_in_results(#[case] restrict: bool) {
        let table = ratio_table();
        let q = TargetQuery::from_record(table.get("BBBB").unwrap());

        let outcome = compare(&table, &q, &PercentageRanker::new(), restrict).unwrap();

        assert!(!outcome.ranked().unwrap().codes().contains(&"BBBB"));
    }

    #[test]
    fn only_target_gives_no_candidates() {
        let table: ReferenceTable<PercentageMetric> =
            ratio_table().iter().take(1).cloned().collect();
        let q = TargetQuery::from_record(table.get("AAAA").unwrap());

        let outcome = compare(&table, &q, &PercentageRanker::new(), true).unwrap();
        assert!(outcome.is_no_candidates());

        let empty: ReferenceTable<PercentageMetric> = ReferenceTable::new(Vec::new());
        assert!(compare(&empty, &q, &PercentageRanker::new(), false).unwrap().is_no_candidates());
    }

    #[test]
    fn non_finite_target_is_rejected() {
        let table = ratio_table();
        let q = query("XXXX", "Banks", f64::NAN, 1.0, 1.0);

        let err = compare(&table, &q, &PercentageRanker::new(), true).unwrap_err();
        assert!(matches!(err, ModelError::NonFiniteTarget { ref metric, .. } if metric == "RoA"));
    }

    #[test]
    fn table_is_unchanged() {
        let table = ratio_table();
        let before = table.clone();
        let q = query("XXXX", "Banks", 1.8, 2.5e12, 13.0);

        let _ = compare_peers(&table, &q, &PercentageRanker::new());
        assert_eq!(table, before);
    }

    #[test]
    fn small_sector_is_singular_but_market_ranks() {
        let mut records: Vec<StockRecord<MahalanobisMetric>> = vec![
            StockRecord::new(
                "AAAA".into(),
                "Banks".into(),
                FundamentalVector::from_fundamentals(1.0e12, 5.0e11, 4.0e11, 5.0e10),
            ),
            StockRecord::new(
                "BBBB".into(),
                "Banks".into(),
                FundamentalVector::from_fundamentals(2.0e12, 9.0e11, 7.0e11, 1.2e11),
            ),
        ];
        let others = [
            [1.5e12, 4.0e11, 6.0e11, 8.0e10],
            [3.0e12, 1.5e12, 9.0e11, 2.0e11],
            [0.8e12, 2.0e11, 3.5e11, 3.0e10],
            [2.5e12, 1.1e12, 1.0e12, 1.1e11],
            [1.2e12, 7.0e11, 3.0e11, 9.0e10],
        ];
        for (i, v) in others.iter().enumerate() {
            records.push(StockRecord::new(
                format!("S{i}").into(),
                "Energy".into(),
                FundamentalVector::from_fundamentals(v[0], v[1], v[2], v[3]),
            ));
        }
        let table = ReferenceTable::new(records);
        let q = TargetQuery::new(
            "XXXX".into(),
            "Banks".into(),
            FundamentalVector::from_fundamentals(1.4e12, 6.0e11, 5.0e11, 7.0e10),
        );

        let peers = compare_peers(&table, &q, &MahalanobisRanker::new());

        assert!(peers.within_sector.as_ref().unwrap_err().is_singular_covariance());
        assert!(peers.best().is_none());
        let market = peers.whole_market.unwrap();
        assert_eq!(market.ranked().unwrap().len(), 3);
        assert_eq!(market.ranked().unwrap().pool_size(), 7);
    }

    #[test]
    fn compare_peers_best_is_sector_best() {
        let table = ratio_table();
        let q = query("XXXX", "Banks", 1.6, 2.2e12, 12.5);

        let peers = compare_peers(&table, &q, &PercentageRanker::new());

        assert_eq!(peers.best().map(|c| c.code.as_str()), Some("AAAA"));
        assert_eq!(peers.whole_market.unwrap().ranked().unwrap().len(), 3);
    }
}
