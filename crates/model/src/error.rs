//! Error types for peer comparison.

use peerscan_traits::RankError;

/// Errors that can occur while comparing a target against its peers.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Ranker error.
    #[error("ranker error: {0}")]
    Rank(#[from] RankError),

    /// Target metrics are not all finite.
    #[error("target metric {metric} is not finite: {value}")]
    NonFiniteTarget {
        /// Metric name.
        metric: String,
        /// Offending value.
        value: f64,
    },
}

impl ModelError {
    /// Whether the candidate pool's covariance could not be inverted.
    #[must_use]
    pub const fn is_singular_covariance(&self) -> bool {
        matches!(self, Self::Rank(RankError::SingularCovariance { .. }))
    }
}
