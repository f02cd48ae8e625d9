//! Similarity score and ranked result definitions.

use std::{cmp::Ordering, fmt, iter::Sum, ops::Add};

use serde::{Deserialize, Serialize};

use crate::{MetricScheme, PoolScope, Sector, StockCode};

/// Distance-like score; lower is more similar.
///
/// `Undefined` marks a score that could not be computed, e.g. a percentage
/// difference against a zero target value. It sorts after every finite score
/// and absorbs addition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Score {
    /// A computed score.
    Value(f64),
    /// Degenerate input; no meaningful score.
    Undefined,
}

impl Score {
    /// The numeric value, if defined.
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Undefined => None,
        }
    }

    /// Whether this is the undefined sentinel.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Total ordering: finite values ascending, `Undefined` last.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a.total_cmp(b),
            (Self::Value(_), Self::Undefined) => Ordering::Less,
            (Self::Undefined, Self::Value(_)) => Ordering::Greater,
            (Self::Undefined, Self::Undefined) => Ordering::Equal,
        }
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::Value(0.0)
    }
}

impl From<f64> for Score {
    fn from(v: f64) -> Self {
        Self::Value(v)
    }
}

impl Add for Score {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Value(a), Self::Value(b)) => Self::Value(a + b),
            _ => Self::Undefined,
        }
    }
}

impl Sum for Score {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Precision applies to the number only; width applies to either form.
        let text = match (self, f.precision()) {
            (Self::Value(v), Some(p)) => format!("{v:.p$}"),
            (Self::Value(v), None) => v.to_string(),
            (Self::Undefined, _) => "undefined".to_string(),
        };
        match (f.width(), f.align()) {
            (Some(w), Some(fmt::Alignment::Left)) => write!(f, "{text:<w$}"),
            (Some(w), _) => write!(f, "{text:>w$}"),
            (None, _) => f.write_str(&text),
        }
    }
}

/// One ranked candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct RankedCandidate<M: MetricScheme> {
    /// Candidate stock code.
    pub code: StockCode,
    /// Candidate sector.
    pub sector: Sector,
    /// Aggregate score.
    pub score: Score,
    /// Per-metric contributions to the score. Empty when the score is not
    /// a per-metric sum.
    pub contributions: Vec<(M, Score)>,
}

impl<M: MetricScheme> RankedCandidate<M> {
    /// Contribution of a single metric, if recorded.
    #[must_use]
    pub fn contribution(&self, metric: M) -> Option<Score> {
        self.contributions.iter().find(|(m, _)| *m == metric).map(|(_, s)| *s)
    }
}

/// Top-N candidates ordered by ascending score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct RankedResult<M: MetricScheme> {
    candidates: Vec<RankedCandidate<M>>,
    scope: PoolScope,
    pool_size: usize,
    degenerate_metrics: Vec<M>,
}

impl<M: MetricScheme> RankedResult<M> {
    /// Create a result. `candidates` must already be sorted and truncated.
    #[must_use]
    pub fn new(
        candidates: Vec<RankedCandidate<M>>,
        scope: PoolScope,
        pool_size: usize,
        degenerate_metrics: Vec<M>,
    ) -> Self {
        debug_assert!(candidates.windows(2).all(|w| w[0].score.total_cmp(&w[1].score).is_le()));
        Self { candidates, scope, pool_size, degenerate_metrics }
    }

    /// Ranked candidates, best first.
    #[must_use]
    pub fn candidates(&self) -> &[RankedCandidate<M>] {
        &self.candidates
    }

    /// Best match, if any.
    #[must_use]
    pub fn best(&self) -> Option<&RankedCandidate<M>> {
        self.candidates.first()
    }

    /// Candidate codes, best first.
    #[must_use]
    pub fn codes(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.code.as_str()).collect()
    }

    /// Number of ranked candidates.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Filter that produced the candidate pool.
    #[must_use]
    pub const fn scope(&self) -> PoolScope {
        self.scope
    }

    /// Number of candidates scored before truncation.
    #[must_use]
    pub const fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Metrics whose target value made the score undefined.
    #[must_use]
    pub fn degenerate_metrics(&self) -> &[M] {
        &self.degenerate_metrics
    }
}

/// Outcome of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum RankOutcome<M: MetricScheme> {
    /// Candidates were found and ranked.
    Ranked(RankedResult<M>),
    /// No stock other than the target was available to compare against.
    NoCandidates,
}

impl<M: MetricScheme> RankOutcome<M> {
    /// The ranked result, if any.
    #[must_use]
    pub const fn ranked(&self) -> Option<&RankedResult<M>> {
        match self {
            Self::Ranked(r) => Some(r),
            Self::NoCandidates => None,
        }
    }

    /// Best match, if any.
    #[must_use]
    pub fn best(&self) -> Option<&RankedCandidate<M>> {
        self.ranked().and_then(RankedResult::best)
    }

    /// Whether there was nothing to compare against.
    #[must_use]
    pub const fn is_no_candidates(&self) -> bool {
        matches!(self, Self::NoCandidates)
    }
}
