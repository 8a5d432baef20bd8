//! Delegated authority gateway contract.

use async_trait::async_trait;
use mirrorhist_types::{GoRequest, HistoryError, ReloadFlags};

/// Contract for reaching an authoritative store in another execution
/// context.
///
/// Implementations own the transport; mirrorhist hands over the
/// epoch-tagged request and consumes at most one resolution per request.
#[async_trait]
pub trait HistoryGateway: Send + Sync {
    /// Ask the remote authority to resolve an offset navigation.
    ///
    /// Resolves to the index the authority settled on. The remote side
    /// compares the request's epoch against the newest it has issued to
    /// recognize stale requests; this crate only guarantees the epoch is
    /// current at dispatch time.
    async fn request_go(&self, request: GoRequest) -> Result<i32, HistoryError>;

    /// Ask the remote authority to reload the current entry.
    ///
    /// Returns once the request is admitted, not when the reload
    /// completes.
    async fn request_reload(&self, flags: ReloadFlags) -> Result<(), HistoryError>;
}
