//! Reference table, target query and candidate pool definitions.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{MetricScheme, MetricVector, Sector, StockCode, StockRecord};

/// Immutable reference table of stocks for one metric scheme.
///
/// Built once by a loader; ranking only ever borrows from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ReferenceTable<M: MetricScheme> {
    records: Vec<StockRecord<M>>,
}

impl<M: MetricScheme> ReferenceTable<M> {
    /// Create a table from records, preserving their order.
    #[must_use]
    pub const fn new(records: Vec<StockRecord<M>>) -> Self {
        Self { records }
    }

    /// All records, in load order.
    #[must_use]
    pub fn records(&self) -> &[StockRecord<M>] {
        &self.records
    }

    /// Iterate over records.
    pub fn iter(&self) -> impl Iterator<Item = &StockRecord<M>> {
        self.records.iter()
    }

    /// Number of records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&StockRecord<M>> {
        self.records.iter().find(|r| r.code.as_str() == code)
    }

    /// Whether a record with this code exists.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }
}

impl<M: MetricScheme> FromIterator<StockRecord<M>> for ReferenceTable<M> {
    fn from_iter<I: IntoIterator<Item = StockRecord<M>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// The stock a comparison is made against.
///
/// The code need not exist in the reference table; when it does, that row is
/// excluded from its own candidate pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TargetQuery<M: MetricScheme> {
    /// Target stock code.
    pub code: StockCode,
    /// Sector used to restrict the candidate pool.
    pub sector: Sector,
    /// Target metric values.
    pub metrics: MetricVector<M>,
}

impl<M: MetricScheme> TargetQuery<M> {
    /// Create a new query.
    #[must_use]
    pub const fn new(code: StockCode, sector: Sector, metrics: MetricVector<M>) -> Self {
        Self { code, sector, metrics }
    }

    /// Build a query from an existing reference record.
    #[must_use]
    pub fn from_record(record: &StockRecord<M>) -> Self {
        Self::new(record.code.clone(), record.sector.clone(), record.metrics.clone())
    }
}

/// Which filter produced a candidate pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum PoolScope {
    /// Same sector as the target.
    #[display("sector")]
    Sector,
    /// Sector filter was empty; whole table used instead.
    #[display("sector fallback to full table")]
    SectorFallback,
    /// Whole table, no sector restriction requested.
    #[display("full table")]
    Full,
}

/// Borrowed view of the reference records eligible for comparison.
#[derive(Debug, Clone)]
pub struct CandidatePool<'a, M: MetricScheme> {
    records: Vec<&'a StockRecord<M>>,
    scope: PoolScope,
}

impl<'a, M: MetricScheme> CandidatePool<'a, M> {
    /// Create a pool from already-filtered records.
    #[must_use]
    pub const fn new(records: Vec<&'a StockRecord<M>>, scope: PoolScope) -> Self {
        Self { records, scope }
    }

    /// Records in the pool, in table order.
    #[must_use]
    pub fn records(&self) -> &[&'a StockRecord<M>] {
        &self.records
    }

    /// Filter that produced this pool.
    #[must_use]
    pub const fn scope(&self) -> PoolScope {
        self.scope
    }

    /// Number of candidates.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether a code is in the pool.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.records.iter().any(|r| r.code.as_str() == code)
    }
}
