//! Co-located authority contract.

use mirrorhist_types::{HistoryError, ReloadFlags};

/// Contract implemented by an authoritative history store living in the
/// same execution context as the facade.
///
/// Reads are consulted while the facade's internal state is borrowed, so
/// implementations must answer directly and never call back into
/// [`SessionHistory`](crate::SessionHistory).
pub trait HistoryAuthority: Send + Sync {
    /// Current entry index.
    fn get_index(&self) -> i32;

    /// Number of entries.
    fn get_count(&self) -> i32;

    /// Reload the current entry.
    fn reload(&self, flags: ReloadFlags) -> Result<(), HistoryError>;

    /// Navigate directly to `index`.
    fn goto_index(&self, index: i32) -> Result<(), HistoryError>;

    /// Whether the entry at `index` recorded direct user interaction.
    fn has_user_interaction_at_index(&self, index: i32) -> bool;

    /// Seed the target index a delegated resolution decided on.
    ///
    /// Applied once the remote authority answers an epoch-tagged go
    /// request; the actual load happens when the authority follows up.
    fn set_requested_index(&self, index: i32);
}
