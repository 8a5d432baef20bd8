//! Error types for mirrorhist.

use thiserror::Error;

/// Errors that can occur in mirrorhist operations.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// A caller-supplied argument was rejected before any side effect
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation could not be carried out in the current configuration
    #[error("operation failed: {0}")]
    OperationFailed(String),

    /// The admission check refused the navigation request
    #[error("navigation rejected: {0}")]
    AdmissionRejected(String),

    /// Error surfaced by the authoritative history store
    #[error("authority error: {0}")]
    Authority(String),
}
