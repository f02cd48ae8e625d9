//! Metric scheme definitions.

use std::{fmt, hash::Hash, marker::PhantomData};

use derive_more::Display;
use ndarray::Array1;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// A closed, ordered set of metrics that rankers compare stocks on.
///
/// Each ranker operates on exactly one scheme; the scheme fixes the feature
/// order used for vectors and matrices.
pub trait MetricScheme:
    Copy
    + Eq
    + Hash
    + fmt::Debug
    + fmt::Display
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// All metrics of the scheme, in feature order.
    const ALL: &'static [Self];

    /// Position of this metric in feature order.
    fn index(self) -> usize;

    /// Column name of this metric in the reference data.
    fn column(self) -> &'static str;

    /// Short label for table headers.
    fn short_label(self) -> &'static str;

    /// Number of metrics in the scheme.
    #[must_use]
    fn len() -> usize {
        Self::ALL.len()
    }
}

/// Profitability and size metrics used by percentage-difference ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum PercentageMetric {
    /// Return on assets, in percent.
    #[display("RoA")]
    RoA,
    /// Market capitalization.
    #[display("Market Cap")]
    MarketCap,
    /// Return on equity, in percent.
    #[display("RoE")]
    RoE,
}

impl MetricScheme for PercentageMetric {
    const ALL: &'static [Self] = &[Self::RoA, Self::MarketCap, Self::RoE];

    fn index(self) -> usize {
        self as usize
    }

    fn column(self) -> &'static str {
        match self {
            Self::RoA => "RoA",
            Self::MarketCap => "Market Cap",
            Self::RoE => "RoE",
        }
    }

    fn short_label(self) -> &'static str {
        match self {
            Self::RoA => "RoA",
            Self::MarketCap => "MC",
            Self::RoE => "RoE",
        }
    }
}

/// Balance sheet metrics used by Mahalanobis ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum MahalanobisMetric {
    /// Total assets.
    #[display("Total Assets")]
    TotalAssets,
    /// Market capitalization.
    #[display("Market Cap")]
    MarketCap,
    /// Total equities.
    #[display("Total Equities")]
    TotalEquities,
    /// Net profit.
    #[display("Net Profit")]
    NetProfit,
}

impl MetricScheme for MahalanobisMetric {
    const ALL: &'static [Self] =
        &[Self::TotalAssets, Self::MarketCap, Self::TotalEquities, Self::NetProfit];

    fn index(self) -> usize {
        self as usize
    }

    fn column(self) -> &'static str {
        match self {
            Self::TotalAssets => "Total Assets",
            Self::MarketCap => "Market Cap",
            Self::TotalEquities => "Total Equities",
            Self::NetProfit => "Net Profit",
        }
    }

    fn short_label(self) -> &'static str {
        match self {
            Self::TotalAssets => "TA",
            Self::MarketCap => "MC",
            Self::TotalEquities => "TE",
            Self::NetProfit => "NP",
        }
    }
}

/// One value per metric of scheme `M`, stored in feature order.
///
/// Serialized as a plain array of values. Deserialization checks the length
/// against the scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "", try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct MetricVector<M: MetricScheme> {
    values: Vec<f64>,
    scheme: PhantomData<M>,
}

/// Wrong number of values for a metric scheme.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected} metric values, got {actual}")]
pub struct MetricCountError {
    /// Metrics in the scheme.
    pub expected: usize,
    /// Values supplied.
    pub actual: usize,
}

impl<M: MetricScheme> TryFrom<Vec<f64>> for MetricVector<M> {
    type Error = MetricCountError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        let actual = values.len();
        Self::try_from_values(values).ok_or(MetricCountError { expected: M::len(), actual })
    }
}

impl<M: MetricScheme> From<MetricVector<M>> for Vec<f64> {
    fn from(vector: MetricVector<M>) -> Self {
        vector.values
    }
}

impl<M: MetricScheme> MetricVector<M> {
    /// Build a vector by evaluating `f` for every metric of the scheme.
    #[must_use]
    pub fn from_fn(mut f: impl FnMut(M) -> f64) -> Self {
        let values = M::ALL.iter().map(|&m| f(m)).collect();
        Self { values, scheme: PhantomData }
    }

    /// Build a vector from values given in feature order.
    ///
    /// Returns `None` if the number of values does not match the scheme.
    #[must_use]
    pub fn try_from_values(values: impl Into<Vec<f64>>) -> Option<Self> {
        let values = values.into();
        (values.len() == M::len()).then_some(Self { values, scheme: PhantomData })
    }

    /// Value of a single metric.
    #[must_use]
    pub fn get(&self, metric: M) -> f64 {
        self.values[metric.index()]
    }

    /// Values in feature order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Values as an ndarray.
    #[must_use]
    pub fn to_array(&self) -> Array1<f64> {
        Array1::from_vec(self.values.clone())
    }

    /// Iterate over `(metric, value)` pairs in feature order.
    pub fn iter(&self) -> impl Iterator<Item = (M, f64)> + '_ {
        M::ALL.iter().copied().zip(self.values.iter().copied())
    }

    /// Whether every value is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

/// Metric vector of the percentage-difference scheme.
pub type RatioVector = MetricVector<PercentageMetric>;

/// Metric vector of the Mahalanobis scheme.
pub type FundamentalVector = MetricVector<MahalanobisMetric>;

impl MetricVector<PercentageMetric> {
    /// Build a percentage-scheme vector.
    #[must_use]
    pub fn from_ratios(roa: f64, market_cap: f64, roe: f64) -> Self {
        Self { values: vec![roa, market_cap, roe], scheme: PhantomData }
    }
}

impl MetricVector<MahalanobisMetric> {
    /// Build a Mahalanobis-scheme vector.
    #[must_use]
    pub fn from_fundamentals(
        total_assets: f64,
        market_cap: f64,
        total_equities: f64,
        net_profit: f64,
    ) -> Self {
        Self {
            values: vec![total_assets, market_cap, total_equities, net_profit],
            scheme: PhantomData,
        }
    }
}
