//! Mahalanobis-distance ranking.

use ndarray::Array2;
use peerscan_math::{Mahalanobis, MathError};
use peerscan_primitives::{
    CandidatePool, MahalanobisMetric, MetricScheme, MetricVector, RankedCandidate, RankedResult,
    Score,
};
use peerscan_traits::{RankError, SimilarityRanker};
use tracing::debug;

use crate::DEFAULT_TOP_N;

/// Configuration for Mahalanobis ranking.
#[derive(Debug, Clone)]
pub struct MahalanobisConfig {
    /// Number of candidates to return.
    pub top_n: usize,
}

impl Default for MahalanobisConfig {
    fn default() -> Self {
        Self { top_n: DEFAULT_TOP_N }
    }
}

/// Ranks candidates by Mahalanobis distance from the target on Total Assets,
/// Market Cap, Total Equities and Net Profit.
///
/// The covariance is estimated from the candidate pool on every call. A pool
/// with fewer than five candidates, or with collinear metrics, has no inverse
/// covariance and yields [`RankError::SingularCovariance`].
#[derive(Debug, Clone)]
pub struct MahalanobisRanker {
    config: MahalanobisConfig,
}

impl MahalanobisRanker {
    /// Create a new ranker with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MahalanobisConfig::default())
    }

    /// Create a new ranker with custom configuration.
    #[must_use]
    pub const fn with_config(config: MahalanobisConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &MahalanobisConfig {
        &self.config
    }
}

impl Default for MahalanobisRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityRanker for MahalanobisRanker {
    type Scheme = MahalanobisMetric;
    type Config = MahalanobisConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn name(&self) -> &str {
        "mahalanobis"
    }

    fn rank(
        &self,
        pool: &CandidatePool<'_, MahalanobisMetric>,
        target: &MetricVector<MahalanobisMetric>,
    ) -> Result<RankedResult<MahalanobisMetric>, RankError> {
        rank_mahalanobis_top_n(pool, target, self.config.top_n)
    }
}

/// Rank a pool by Mahalanobis distance, returning the closest three.
///
/// # Errors
/// Returns `RankError::EmptyPool` for an empty pool and
/// `RankError::SingularCovariance` if the pool covariance cannot be inverted.
pub fn rank_by_mahalanobis<M: MetricScheme>(
    pool: &CandidatePool<'_, M>,
    target: &MetricVector<M>,
) -> Result<RankedResult<M>, RankError> {
    rank_mahalanobis_top_n(pool, target, DEFAULT_TOP_N)
}

fn rank_mahalanobis_top_n<M: MetricScheme>(
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

    let n = pool.len();
    let p = M::len();

    let mut features = Array2::zeros((n, p));
    for (i, record) in pool.records().iter().enumerate() {
        for (j, &value) in record.metrics.values().iter().enumerate() {
            features[[i, j]] = value;
        }
    }

    let metric = Mahalanobis::fit(&features).map_err(|e| match e {
        MathError::InsufficientData { .. } | MathError::Singular => {
            RankError::SingularCovariance { pool_size: n, features: p }
        }
        other => RankError::Math(other),
    })?;
    debug!(pool_size = n, features = p, "fitted pool covariance");

    let target_values = target.to_array();
    let mut scored = Vec::with_capacity(n);
    for (i, record) in pool.records().iter().enumerate() {
        let distance = metric.distance(&features.row(i).to_owned(), &target_values)?;
        scored.push(RankedCandidate {
            code: record.code.clone(),
            sector: record.sector.clone(),
            score: Score::Value(distance),
            contributions: Vec::new(),
        });
    }

    scored.sort_by(|a, b| a.score.total_cmp(&b.score));
    scored.truncate(top_n);

    Ok(RankedResult::new(scored, pool.scope(), n, Vec::new()))
}
