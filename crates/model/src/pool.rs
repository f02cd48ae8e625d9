//! Candidate pool selection.

use peerscan_primitives::{
    CandidatePool, MetricScheme, PoolScope, ReferenceTable, Sector, StockCode, StockRecord,
};
use tracing::debug;

/// Select the candidates a target is compared against.
///
/// With `restrict_to_sector`, the pool is every row in `target_sector` except
/// the target itself. If that is empty, or no restriction was requested, the
/// pool is every row except the target. The target code need not exist in the
/// table.
///
/// # Arguments
/// * `table` - Reference table; only borrowed
/// * `target_code` - Code excluded from the pool
/// * `target_sector` - Sector matched literally
/// * `restrict_to_sector` - Whether to try the sector filter first
///
/// # Returns
/// The pool and the filter that produced it. Empty only when the table holds
/// nothing but the target.
pub fn select_pool<'a, M: MetricScheme>(
    table: &'a ReferenceTable<M>,
    target_code: &StockCode,
    target_sector: &Sector,
    restrict_to_sector: bool,
) -> CandidatePool<'a, M> {
    let not_target = |r: &&StockRecord<M>| r.code != *target_code;

    if restrict_to_sector {
        let in_sector: Vec<_> =
            table.iter().filter(not_target).filter(|r| r.sector == *target_sector).collect();
        if !in_sector.is_empty() {
            return CandidatePool::new(in_sector, PoolScope::Sector);
        }
        debug!(sector = %target_sector, "no other stocks in sector, using full table");
        return CandidatePool::new(
            table.iter().filter(not_target).collect(),
            PoolScope::SectorFallback,
        );
    }

    CandidatePool::new(table.iter().filter(not_target).collect(), PoolScope::Full)
}
