//! Admission control for queued navigations.
//!
//! Async navigations are admitted or refused before they are queued. The
//! policy (rate limiting, quotas) lives outside this crate; the facade
//! only consumes the pass/fail verdict.

use mirrorhist_types::HistoryError;

/// Who asked for a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    /// Privileged, browser-internal code.
    System,
    /// Content script or other untrusted code.
    Content,
}

/// Pass/fail gate consulted before a navigation request is queued.
pub trait AdmissionControl: Send + Sync {
    /// Decide whether `caller` may queue another navigation.
    ///
    /// An `Err` aborts the request before anything is queued and is
    /// surfaced to the caller unchanged.
    fn check_admission(&self, caller: &Caller) -> Result<(), HistoryError>;
}

/// Admission control that admits every caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnlimitedAdmission;

impl AdmissionControl for UnlimitedAdmission {
    fn check_admission(&self, _caller: &Caller) -> Result<(), HistoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_admits_everyone() {
        let admission = UnlimitedAdmission;
        assert!(admission.check_admission(&Caller::System).is_ok());
        assert!(admission.check_admission(&Caller::Content).is_ok());
    }
}
