//! Percentage-difference ranking.

use peerscan_math::percentage_difference;
use peerscan_primitives::{
    CandidatePool, MetricScheme, MetricVector, PercentageMetric, RankedCandidate, RankedResult,
    Score,
};
use peerscan_traits::{RankError, SimilarityRanker};

/// Number of candidates returned by default.
pub const DEFAULT_TOP_N: usize = 3;

/// Configuration for percentage-difference ranking.
#[derive(Debug, Clone)]
pub struct PercentageConfig {
    /// Number of candidates to return.
    pub top_n: usize,
}

impl Default for PercentageConfig {
    fn default() -> Self {
        Self { top_n: DEFAULT_TOP_N }
    }
}

/// Ranks candidates by the sum of their absolute percentage differences from
/// the target on RoA, Market Cap and RoE.
///
/// A metric whose target value is zero cannot be expressed as a percentage;
/// every candidate's contribution on it, and therefore every total, is
/// [`Score::Undefined`], and the metric is listed in
/// [`RankedResult::degenerate_metrics`].
#[derive(Debug, Clone)]
pub struct PercentageRanker {
    config: PercentageConfig,
}

impl PercentageRanker {
    /// Create a new ranker with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PercentageConfig::default())
    }

    /// Create a new ranker with custom configuration.
    #[must_use]
    pub const fn with_config(config: PercentageConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &PercentageConfig {
        &self.config
    }
}

impl Default for PercentageRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityRanker for PercentageRanker {
    type Scheme = PercentageMetric;
    type Config = PercentageConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn name(&self) -> &str {
        "percentage difference"
    }

    fn rank(
        &self,
        pool: &CandidatePool<'_, PercentageMetric>,
        target: &MetricVector<PercentageMetric>,
    ) -> Result<RankedResult<PercentageMetric>, RankError> {
        rank_percentage_top_n(pool, target, self.config.top_n)
    }
}

/// Rank a pool by total percentage difference, returning the closest three.
///
/// # Errors
/// Returns `RankError::EmptyPool` if the pool is empty.
pub fn rank_by_percentage<M: MetricScheme>(
    pool: &CandidatePool<'_, M>,
    target: &MetricVector<M>,
) -> Result<RankedResult<M>, RankError> {
    rank_percentage_top_n(pool, target, DEFAULT_TOP_N)
}

fn rank_percentage_top_n<M: MetricScheme>(
    pool: &CandidatePool<'_, M>,
    target: &MetricVector<M>,
    top_n: usize,
) -> Result<RankedResult<M>, RankError> {
    if top_n == 0 {
        return Err(RankError::InvalidConfig("top_n must be at least 1".to_string()));
    }
    if pool.is_empty() {
        return Err(RankError::EmptyPool);
    }

    let degenerate: Vec<M> = target.iter().filter(|(_, t)| *t == 0.0).map(|(m, _)| m).collect();

    let mut scored: Vec<RankedCandidate<M>> = pool
        .records()
        .iter()
        .map(|record| {
            let contributions: Vec<(M, Score)> = target
                .iter()
                .map(|(metric, t)| {
                    let diff = percentage_difference(record.metrics.get(metric), t)
                        .map_or(Score::Undefined, Score::Value);
                    (metric, diff)
                })
                .collect();

            RankedCandidate {
                code: record.code.clone(),
                sector: record.sector.clone(),
                score: contributions.iter().map(|(_, s)| *s).sum(),
                contributions,
            }
        })
        .collect();

    // Stable: equal totals keep table order.
    scored.sort_by(|a, b| a.score.total_cmp(&b.score));

    let pool_size = scored.len();
    scored.truncate(top_n);

    Ok(RankedResult::new(scored, pool.scope(), pool_size, degenerate))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use peerscan_primitives::{PoolScope, RatioVector, StockRecord};

    use super::*;

    fn record(code: &str, roa: f64, mc: f64, roe: f64) -> StockRecord<PercentageMetric> {
        StockRecord::new(code.into(), "Sector1".into(), RatioVector::from_ratios(roa, mc, roe))
    }

    #[test]
    fn scores_are_summed_percentages() {
        let a = record("A", 10.0, 100.0, 5.0);
        let pool = CandidatePool::new(vec![&a], PoolScope::Sector);
        let target = RatioVector::from_ratios(11.0, 105.0, 5.5);

        let result = rank_by_percentage(&pool, &target).unwrap();
        let best = result.best().unwrap();

        let roa = best.contribution(PercentageMetric::RoA).and_then(|s| s.value()).unwrap();
        let mc = best.contribution(PercentageMetric::MarketCap).and_then(|s| s.value()).unwrap();
        let roe = best.contribution(PercentageMetric::RoE).and_then(|s| s.value()).unwrap();

        assert_relative_eq!(roa, 100.0 / 11.0, epsilon = 1e-10);
        assert_relative_eq!(mc, 500.0 / 105.0, epsilon = 1e-10);
        assert_relative_eq!(roe, 100.0 / 11.0, epsilon = 1e-10);
        assert_relative_eq!(best.score.value().unwrap(), roa + mc + roe, epsilon = 1e-10);
    }

    #[test]
    fn closer_candidate_ranks_first() {
        let a = record("A", 10.0, 100.0, 5.0);
        let b = record("B", 12.0, 110.0, 6.0);
        let pool = CandidatePool::new(vec![&a, &b], PoolScope::Sector);
        let target = RatioVector::from_ratios(11.5, 108.0, 5.8);

        let result = rank_by_percentage(&pool, &target).unwrap();
        assert_eq!(result.codes(), vec!["B", "A"]);
    }

    #[test]
    fn ties_keep_table_order() {
        // A and B sit exactly as far below and above the target on every metric.
        let a = record("A", 10.0, 100.0, 5.0);
        let b = record("B", 12.0, 110.0, 6.0);
        let target = RatioVector::from_ratios(11.0, 105.0, 5.5);

        let forward = CandidatePool::new(vec![&a, &b], PoolScope::Sector);
        assert_eq!(rank_by_percentage(&forward, &target).unwrap().codes(), vec!["A", "B"]);

        let reverse = CandidatePool::new(vec![&b, &a], PoolScope::Sector);
        assert_eq!(rank_by_percentage(&reverse, &target).unwrap().codes(), vec!["B", "A"]);
    }

    #[test]
    fn returns_at_most_top_n_in_order() {
        let records: Vec<_> =
            (0..10).map(|i| record(&format!("S{i}"), 10.0 + i as f64, 100.0, 5.0)).collect();
        let pool = CandidatePool::new(records.iter().collect(), PoolScope::Full);
        let target = RatioVector::from_ratios(14.2, 100.0, 5.0);

        let result = rank_by_percentage(&pool, &target).unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result.pool_size(), 10);
        assert_eq!(result.codes(), vec!["S4", "S5", "S3"]);
        assert!(
            result.candidates().windows(2).all(|w| w[0].score.total_cmp(&w[1].score).is_le())
        );
    }

    #[test]
    fn configured_top_n() {
        let records: Vec<_> =
            (0..5).map(|i| record(&format!("S{i}"), 1.0 + i as f64, 1.0, 1.0)).collect();
        let pool = CandidatePool::new(records.iter().collect(), PoolScope::Full);
        let target = RatioVector::from_ratios(1.0, 1.0, 1.0);

        let ranker = PercentageRanker::with_config(PercentageConfig { top_n: 5 });
        assert_eq!(ranker.rank(&pool, &target).unwrap().len(), 5);

        let ranker = PercentageRanker::with_config(PercentageConfig { top_n: 0 });
        assert!(matches!(ranker.rank(&pool, &target), Err(RankError::InvalidConfig(_))));
    }

    #[test]
    fn zero_target_metric_is_undefined() {
        let a = record("A", 10.0, 100.0, 5.0);
        let b = record("B", 0.0, 110.0, 6.0);
        let pool = CandidatePool::new(vec![&a, &b], PoolScope::Sector);
        let target = RatioVector::from_ratios(0.0, 105.0, 5.5);

        let result = rank_by_percentage(&pool, &target).unwrap();

        assert_eq!(result.degenerate_metrics(), &[PercentageMetric::RoA]);
        for candidate in result.candidates() {
            assert_eq!(candidate.contribution(PercentageMetric::RoA), Some(Score::Undefined));
            assert!(candidate.contribution(PercentageMetric::MarketCap).unwrap().value().is_some());
            assert!(candidate.score.is_undefined());
        }
        // All totals undefined: table order is kept.
        assert_eq!(result.codes(), vec!["A", "B"]);
    }

    #[test]
    fn empty_pool_is_an_error() {
        let pool: CandidatePool<'_, PercentageMetric> =
            CandidatePool::new(Vec::new(), PoolScope::Full);
        let target = RatioVector::from_ratios(1.0, 1.0, 1.0);
        assert!(matches!(rank_by_percentage(&pool, &target), Err(RankError::EmptyPool)));
    }

    #[test]
    fn ranking_is_idempotent() {
        let a = record("A", 10.0, 100.0, 5.0);
        let b = record("B", 12.0, 110.0, 6.0);
        let c = record("C", 9.0, 90.0, 4.0);
        let pool = CandidatePool::new(vec![&a, &b, &c], PoolScope::Full);
        let target = RatioVector::from_ratios(11.0, 104.0, 5.2);

        let ranker = PercentageRanker::new();
        assert_eq!(ranker.rank(&pool, &target).unwrap(), ranker.rank(&pool, &target).unwrap());
    }
}
