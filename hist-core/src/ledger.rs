//! Pending change ledger for mirrorhist.
//!
//! This module provides an ordered collection of speculative index/length
//! deltas with:
//! - Append-only recording of unconfirmed local changes
//! - Confirmation strictly by id (never by FIFO order)
//! - Delta sums applied on top of the last confirmed position
//!
//! The ledger is used by the local history view to answer `count`/`index`
//! queries without blocking on the authoritative store. A change stays in
//! the ledger until an authoritative confirmation quotes its id back.

use mirrorhist_types::ChangeId;

/// A speculative local delta not yet confirmed by the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingChange {
    /// Token quoted back by the confirming authority.
    pub id: ChangeId,
    /// Change to the current index.
    pub index_delta: i32,
    /// Change to the history length.
    pub length_delta: i32,
}

/// Ordered collection of unconfirmed history changes.
///
/// Changes flow through the ledger in this order:
/// 1. `add()` - record a speculative delta, get its id
/// 2. `confirm()` - remove every entry matching a confirmed id
///
/// Confirmations may arrive out of order; entries recorded earlier but not
/// yet confirmed keep their deltas applied. An id that matches nothing is a
/// silent no-op, and an entry whose confirmation never arrives keeps
/// contributing its delta indefinitely.
#[derive(Debug, Clone, Default)]
pub struct PendingChangeLedger {
    changes: Vec<PendingChange>,
}

impl PendingChangeLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a speculative change and return its fresh id.
    pub fn add(&mut self, index_delta: i32, length_delta: i32) -> ChangeId {
        let id = ChangeId::new();
        self.changes.push(PendingChange {
            id,
            index_delta,
            length_delta,
        });
        id
    }

    /// Remove every entry whose id equals `id`.
    ///
    /// Expected to match exactly one entry; an unmatched id leaves the
    /// ledger untouched.
    pub fn confirm(&mut self, id: ChangeId) {
        self.changes.retain(|change| change.id != id);
    }

    /// Sum of index deltas across all unconfirmed entries.
    pub fn index_delta_sum(&self) -> i32 {
        self.changes
            .iter()
            .fold(0i32, |sum, change| sum.wrapping_add(change.index_delta))
    }

    /// Sum of length deltas across all unconfirmed entries.
    pub fn length_delta_sum(&self) -> i32 {
        self.changes
            .iter()
            .fold(0i32, |sum, change| sum.wrapping_add(change.length_delta))
    }

    /// Number of unconfirmed entries.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Check if there are no unconfirmed entries.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Discard all unconfirmed entries.
    pub fn clear(&mut self) {
        self.changes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_starts_empty() {
        let ledger = PendingChangeLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.index_delta_sum(), 0);
        assert_eq!(ledger.length_delta_sum(), 0);
    }

    #[test]
    fn add_accumulates_deltas() {
        let mut ledger = PendingChangeLedger::new();

        ledger.add(1, 1);
        ledger.add(1, 0);

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.index_delta_sum(), 2);
        assert_eq!(ledger.length_delta_sum(), 1);
    }

    #[test]
    fn confirm_removes_only_matching_entry() {
        let mut ledger = PendingChangeLedger::new();

        let first = ledger.add(1, 1);
        let second = ledger.add(-1, 0);

        ledger.confirm(first);

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.index_delta_sum(), -1);
        assert_eq!(ledger.length_delta_sum(), 0);

        ledger.confirm(second);
        assert!(ledger.is_empty());
    }

    #[test]
    fn out_of_order_confirmation_keeps_earlier_deltas() {
        let mut ledger = PendingChangeLedger::new();

        let _earlier = ledger.add(1, 1);
        let later = ledger.add(1, 1);

        // Confirming the later entry first must not touch the earlier one
        ledger.confirm(later);

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.index_delta_sum(), 1);
        assert_eq!(ledger.length_delta_sum(), 1);
    }

    #[test]
    fn confirm_unknown_id_is_no_op() {
        let mut ledger = PendingChangeLedger::new();
        ledger.add(1, 1);

        ledger.confirm(ChangeId::new());

        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn unconfirmed_entry_leaks_indefinitely() {
        // Confirmation-by-id has no ordering enforcement: an entry whose
        // confirmation never arrives keeps contributing its delta.
        let mut ledger = PendingChangeLedger::new();

        let _orphan = ledger.add(1, 1);
        let confirmed = ledger.add(1, 1);
        ledger.confirm(confirmed);

        assert_eq!(ledger.index_delta_sum(), 1);
        assert_eq!(ledger.length_delta_sum(), 1);
    }

    #[test]
    fn negative_deltas_sum() {
        let mut ledger = PendingChangeLedger::new();

        ledger.add(-2, -1);
        ledger.add(1, 0);

        assert_eq!(ledger.index_delta_sum(), -1);
        assert_eq!(ledger.length_delta_sum(), -1);
    }

    #[test]
    fn clear_discards_everything() {
        let mut ledger = PendingChangeLedger::new();

        ledger.add(1, 1);
        ledger.add(1, 1);
        ledger.clear();

        assert!(ledger.is_empty());
        assert_eq!(ledger.index_delta_sum(), 0);
    }
}
