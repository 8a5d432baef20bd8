//! Boundary payloads exchanged with a delegated history authority.
//!
//! mirrorhist owns no wire format. These types derive serde so the gateway
//! transport can pick its own encoding; the only contract is the field
//! content.

use serde::{Deserialize, Serialize};
use std::ops::BitOr;

use crate::Epoch;

/// An offset navigation request sent to a delegated authority.
///
/// The authority resolves the offset against its own (authoritative) entry
/// list and answers with the resolved index, at most once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoRequest {
    /// Number of steps to move; negative is back, positive is forward
    pub offset: i32,
    /// Epoch current when the request was dispatched
    pub epoch: Epoch,
}

/// Flags controlling how a reload is performed.
///
/// A plain bitmask; the constants follow the load-flag values browsers
/// conventionally use for reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReloadFlags(u32);

impl ReloadFlags {
    /// Normal reload.
    pub const NONE: ReloadFlags = ReloadFlags(0);
    /// Reload bypassing the local cache.
    pub const BYPASS_CACHE: ReloadFlags = ReloadFlags(0x0100);
    /// Reload bypassing any proxy.
    pub const BYPASS_PROXY: ReloadFlags = ReloadFlags(0x0200);

    /// Create flags from a raw bitmask.
    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Get the raw bitmask.
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Check whether every bit of `other` is set in `self`.
    pub fn contains(&self, other: ReloadFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ReloadFlags {
    type Output = ReloadFlags;

    fn bitor(self, rhs: ReloadFlags) -> ReloadFlags {
        ReloadFlags(self.0 | rhs.0)
    }
}
