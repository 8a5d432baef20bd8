//! Local history view for mirrorhist.
//!
//! This module provides the confirmed index/length pair plus the pending
//! change ledger layered on top of it. The view is the cheap, non-blocking
//! projection of the authoritative store: reads never leave the caller's
//! context, and speculative changes are reconciled when confirmations
//! arrive.
//!
//! Whether the projection or a direct store query answers `count`/`index`
//! is decided by the client facade; this module only does the accounting.

use crate::ledger::PendingChangeLedger;
use mirrorhist_types::ChangeId;

/// Index value meaning "no entry is current".
const UNSET_INDEX: i32 = -1;

/// Confirmed position plus unconfirmed deltas.
///
/// `confirmed_index`/`confirmed_length` change only through an
/// authoritative confirmation ([`LocalHistoryView::set_index_and_length`])
/// or an explicit accounting toggle - never through speculative calls.
#[derive(Debug, Clone)]
pub struct LocalHistoryView {
    confirmed_index: i32,
    confirmed_length: i32,
    ledger: PendingChangeLedger,
    async_accounting: bool,
}

impl LocalHistoryView {
    /// Create an unseeded view (sentinel position, empty ledger).
    pub fn new() -> Self {
        Self {
            confirmed_index: UNSET_INDEX,
            confirmed_length: 0,
            ledger: PendingChangeLedger::new(),
            async_accounting: false,
        }
    }

    /// Confirmed index plus the ledger's unconfirmed index deltas.
    pub fn effective_index(&self) -> i32 {
        self.confirmed_index
            .wrapping_add(self.ledger.index_delta_sum())
    }

    /// Confirmed length plus the ledger's unconfirmed length deltas.
    pub fn effective_length(&self) -> i32 {
        self.confirmed_length
            .wrapping_add(self.ledger.length_delta_sum())
    }

    /// Record a speculative change and return its id.
    pub fn add_pending_change(&mut self, index_delta: i32, length_delta: i32) -> ChangeId {
        self.ledger.add(index_delta, length_delta)
    }

    /// Apply an authoritative confirmation.
    ///
    /// Overwrites the confirmed position unconditionally, then removes
    /// every ledger entry matching `id`. An unmatched id leaves the ledger
    /// untouched.
    pub fn set_index_and_length(&mut self, index: i32, length: i32, id: ChangeId) {
        self.confirmed_index = index;
        self.confirmed_length = length;
        self.ledger.confirm(id);
    }

    /// Whether ledger accounting was explicitly enabled for a co-located
    /// authority.
    pub fn async_accounting(&self) -> bool {
        self.async_accounting
    }

    /// Enable ledger accounting, seeding the confirmed position from the
    /// authority's current values.
    pub fn enable_async(&mut self, index: i32, length: i32) {
        self.async_accounting = true;
        self.confirmed_index = index;
        self.confirmed_length = length;
        self.ledger.clear();
    }

    /// Disable ledger accounting, resetting to the unseeded sentinel.
    pub fn disable_async(&mut self) {
        self.async_accounting = false;
        self.confirmed_index = UNSET_INDEX;
        self.confirmed_length = 0;
        self.ledger.clear();
    }

    /// Number of unconfirmed changes.
    pub fn pending_change_count(&self) -> usize {
        self.ledger.len()
    }
}

impl Default for LocalHistoryView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseeded_view_uses_sentinel() {
        let view = LocalHistoryView::new();
        assert_eq!(view.effective_index(), -1);
        assert_eq!(view.effective_length(), 0);
        assert!(!view.async_accounting());
    }

    #[test]
    fn pending_change_shifts_effective_values() {
        let mut view = LocalHistoryView::new();
        view.enable_async(2, 5);

        view.add_pending_change(1, 1);

        assert_eq!(view.effective_index(), 3);
        assert_eq!(view.effective_length(), 6);
    }

    #[test]
    fn confirmation_replaces_position_and_drops_entry() {
        let mut view = LocalHistoryView::new();
        view.enable_async(2, 5);

        let id = view.add_pending_change(1, 1);
        view.set_index_and_length(3, 6, id);

        assert_eq!(view.pending_change_count(), 0);
        assert_eq!(view.effective_index(), 3);
        assert_eq!(view.effective_length(), 6);
    }

    #[test]
    fn out_of_order_confirmation_leaves_earlier_delta_applied() {
        let mut view = LocalHistoryView::new();
        view.enable_async(2, 5);

        let _first = view.add_pending_change(1, 1);
        let second = view.add_pending_change(1, 1);

        // The later change is confirmed first; the earlier delta stays
        // applied on top of the new confirmed values.
        view.set_index_and_length(4, 7, second);

        assert_eq!(view.pending_change_count(), 1);
        assert_eq!(view.effective_index(), 5);
        assert_eq!(view.effective_length(), 8);
    }

    #[test]
    fn confirmation_with_unknown_id_still_updates_position() {
        let mut view = LocalHistoryView::new();
        view.enable_async(0, 1);

        view.add_pending_change(1, 1);
        view.set_index_and_length(1, 2, ChangeId::new());

        // Position overwritten, ledger untouched
        assert_eq!(view.pending_change_count(), 1);
        assert_eq!(view.effective_index(), 2);
        assert_eq!(view.effective_length(), 3);
    }

    #[test]
    fn enable_async_seeds_and_clears() {
        let mut view = LocalHistoryView::new();
        view.add_pending_change(1, 1);

        view.enable_async(4, 9);

        assert!(view.async_accounting());
        assert_eq!(view.pending_change_count(), 0);
        assert_eq!(view.effective_index(), 4);
        assert_eq!(view.effective_length(), 9);
    }

    #[test]
    fn disable_async_resets_to_sentinel() {
        let mut view = LocalHistoryView::new();
        view.enable_async(4, 9);
        view.add_pending_change(1, 1);

        view.disable_async();

        assert!(!view.async_accounting());
        assert_eq!(view.pending_change_count(), 0);
        assert_eq!(view.effective_index(), -1);
        assert_eq!(view.effective_length(), 0);
    }

    #[test]
    fn reads_are_pure() {
        let mut view = LocalHistoryView::new();
        view.enable_async(2, 5);
        view.add_pending_change(1, 1);

        assert_eq!(view.effective_index(), view.effective_index());
        assert_eq!(view.effective_length(), view.effective_length());
    }
}
