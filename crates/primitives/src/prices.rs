//! Price history definitions.

use serde::{Deserialize, Serialize};

use crate::{Date, StockCode};

/// Daily closing prices for one stock, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    /// Stock code.
    pub code: StockCode,
    /// Trading dates.
    pub dates: Vec<Date>,
    /// Closing prices.
    pub closes: Vec<f64>,
}

impl PriceHistory {
    /// Create a new price history.
    #[must_use]
    pub fn new(code: StockCode, dates: Vec<Date>, closes: Vec<f64>) -> Self {
        debug_assert_eq!(dates.len(), closes.len());
        Self { code, dates, closes }
    }

    /// Number of observations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.closes.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Most recent close.
    #[must_use]
    pub fn last_close(&self) -> Option<f64> {
        self.closes.last().copied()
    }

    /// First and last date covered.
    #[must_use]
    pub fn date_range(&self) -> Option<(Date, Date)> {
        Some((*self.dates.first()?, *self.dates.last()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_history_accessors() {
        let d1 = Date::from_ymd_opt(2024, 1, 2).unwrap();
        let d2 = Date::from_ymd_opt(2024, 1, 3).unwrap();
        let history = PriceHistory::new("CBDK.JK".into(), vec![d1, d2], vec![100.0, 102.0]);

        assert_eq!(history.len(), 2);
        assert_eq!(history.last_close(), Some(102.0));
        assert_eq!(history.date_range(), Some((d1, d2)));
    }

    #[test]
    fn empty_history() {
        let history = PriceHistory::new("X".into(), Vec::new(), Vec::new());
        assert!(history.is_empty());
        assert_eq!(history.date_range(), None);
    }
}
