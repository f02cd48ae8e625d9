//! Stock identity and reference record definitions.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{MetricScheme, MetricVector};

/// Sector labels as they appear in the reference data.
///
/// Near-duplicates and misspellings are distinct labels. Trailing spaces are
/// part of the label.
pub const KNOWN_SECTORS: [&str; 30] = [
    "Oil, Gas, & Coal",
    "Basic Materials",
    "Banks",
    "Healthcare Equipment & Providers",
    "Software & IT Service",
    "Logistics & Deliveries",
    "Food & Beverage",
    "Industrial Goods",
    "Consumer Services",
    "Telecommunication",
    "Industrial Services",
    "Retailing",
    "Automobiles & Components",
    "Alternative Energy",
    "Media & Entertainment",
    "Properties & Real Estate",
    "Heavy Constructions & Civil",
    "Nondurable Household Products ",
    "Leisure Goods",
    "Household Goods",
    "Utilities",
    "Food & Staples Retailing ",
    "Technology Hardware",
    "Financing Service",
    "Property & Real Estate",
    "Phramaceuticals & Healthcare",
    "Utilites",
    "Multi Sector Holdings",
    "Nondurable Household Products",
    "Apparel & Luxury Goods",
];

/// Stock code, e.g. `CBDK.JK`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
pub struct StockCode(pub String);

impl StockCode {
    /// Create a new stock code.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StockCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for StockCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Sector classification label.
///
/// Compared as a literal string: no trimming, no case folding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub struct Sector(pub String);

impl Sector {
    /// Create a new sector label.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this label is one of [`KNOWN_SECTORS`].
    #[must_use]
    pub fn is_known(&self) -> bool {
        KNOWN_SECTORS.contains(&self.0.as_str())
    }
}

impl From<&str> for Sector {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Sector {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One row of the reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StockRecord<M: MetricScheme> {
    /// Stock code.
    pub code: StockCode,
    /// Sector label.
    pub sector: Sector,
    /// Metric values in scheme order.
    pub metrics: MetricVector<M>,
}

impl<M: MetricScheme> StockRecord<M> {
    /// Create a new record.
    #[must_use]
    pub const fn new(code: StockCode, sector: Sector, metrics: MetricVector<M>) -> Self {
        Self { code, sector, metrics }
    }
}
