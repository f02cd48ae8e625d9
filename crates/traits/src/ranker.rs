//! Similarity ranker trait definitions.

use peerscan_math::MathError;
use peerscan_primitives::{CandidatePool, MetricScheme, MetricVector, RankedResult};

/// Errors that can occur while ranking a candidate pool.
#[derive(Debug, thiserror::Error)]
pub enum RankError {
    /// The pool handed to the ranker had no candidates.
    #[error("candidate pool is empty")]
    EmptyPool,

    /// The pool's covariance matrix cannot be inverted.
    #[error(
        "cannot compute distance metric for this pool: covariance of {pool_size} candidates \
         over {features} features is singular"
    )]
    SingularCovariance {
        /// Number of candidates in the pool.
        pool_size: usize,
        /// Number of features per candidate.
        features: usize,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Underlying numerical error.
    #[error("math error: {0}")]
    Math(#[from] MathError),
}

impl RankError {
    /// Returns whether this error is recoverable.
    ///
    /// An empty pool means "nothing to compare"; callers present it rather
    /// than fail.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::EmptyPool)
    }
}

/// Ranks a candidate pool by similarity to a target metric vector.
///
/// Each ranker works on exactly one metric scheme. Implementations are pure:
/// the same pool and target always give the same result, and nothing is
/// cached between calls.
pub trait SimilarityRanker: Send + Sync {
    /// Metric scheme this ranker compares on.
    type Scheme: MetricScheme;

    /// Configuration type for this ranker.
    type Config: Default + Clone + Send + Sync;

    /// Create a new ranker with the given configuration.
    fn with_config(config: Self::Config) -> Self;

    /// Short name used in reports.
    fn name(&self) -> &str;

    /// Rank `pool` against `target`, best match first.
    ///
    /// # Arguments
    /// * `pool` - Candidates to score; never mutated
    /// * `target` - Target metric values
    ///
    /// # Returns
    /// At most the configured number of candidates, ordered by non-decreasing score.
    ///
    /// # Errors
    /// Returns `RankError::EmptyPool` for an empty pool, or a ranker-specific
    /// error if scores cannot be computed.
    fn rank(
        &self,
        pool: &CandidatePool<'_, Self::Scheme>,
        target: &MetricVector<Self::Scheme>,
    ) -> Result<RankedResult<Self::Scheme>, RankError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_error_is_recoverable() {
        assert!(RankError::EmptyPool.is_recoverable());

        let err = RankError::SingularCovariance { pool_size: 2, features: 4 };
        assert!(!err.is_recoverable());
    }

    #[test]
    fn rank_error_display() {
        let err = RankError::SingularCovariance { pool_size: 2, features: 4 };
        assert!(err.to_string().starts_with("cannot compute distance metric for this pool"));

        let err = RankError::InvalidConfig("top_n must be at least 1".to_string());
        assert_eq!(err.to_string(), "invalid configuration: top_n must be at least 1");
    }

    #[test]
    fn math_error_converts() {
        let err: RankError = MathError::Singular.into();
        assert!(matches!(err, RankError::Math(MathError::Singular)));
    }
}
