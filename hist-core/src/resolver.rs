//! Offset resolution for mirrorhist.
//!
//! This module computes the target index for an N-step navigation:
//! - `can_go` - bounds check with overflow-checked arithmetic
//! - `scan_from` - the interaction-gated scan that may skip entries
//!   recorded without direct user action (automatic redirects and the
//!   like)
//!
//! The scan never runs past either end of the list, and interaction data
//! is only consulted for entries strictly between the boundaries. The
//! caller supplies the interaction query as a closure so this module needs
//! no authority handle.

use std::fmt;

/// Error produced when candidate arithmetic leaves the representable
/// range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// Adding the offset to a candidate index overflowed.
    Overflow,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Overflow => write!(f, "history offset overflow"),
        }
    }
}

impl std::error::Error for ScanError {}

/// Check whether `index + offset` lands on an existing entry.
///
/// Returns `false` when the sum overflows or falls outside `0..count`.
pub fn can_go(index: i32, count: i32, offset: i32) -> bool {
    match index.checked_add(offset) {
        Some(candidate) => candidate >= 0 && candidate < count,
        None => false,
    }
}

/// Continue the offset scan from the first candidate.
///
/// `start` is `index + offset`, already computed (and overflow-checked) by
/// the caller. Each iteration stops at the first candidate satisfying a
/// gate condition, otherwise steps by `offset` again:
/// - interaction gating was not requested, or
/// - the candidate is at or beyond the last entry (`count - 1`), or
/// - the candidate is at or before the first entry, or
/// - `has_interaction` reports recorded user interaction at the candidate.
///
/// The `>=`/`<=` boundary comparisons also cover offsets larger than the
/// list, which land outside it in one step.
pub fn scan_from<F>(
    start: i32,
    offset: i32,
    count: i32,
    require_user_interaction: bool,
    mut has_interaction: F,
) -> Result<i32, ScanError>
where
    F: FnMut(i32) -> bool,
{
    let mut candidate = start;
    loop {
        if !require_user_interaction
            || candidate >= count.saturating_sub(1)
            || candidate <= 0
            || has_interaction(candidate)
        {
            return Ok(candidate);
        }
        candidate = candidate.checked_add(offset).ok_or(ScanError::Overflow)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_go_within_bounds() {
        assert!(can_go(2, 5, 1));
        assert!(can_go(2, 5, 2));
        assert!(can_go(2, 5, -2));
    }

    #[test]
    fn can_go_rejects_out_of_bounds() {
        assert!(!can_go(2, 5, 3));
        assert!(!can_go(2, 5, -3));
        assert!(!can_go(0, 0, 0));
    }

    #[test]
    fn can_go_rejects_overflow() {
        assert!(!can_go(i32::MAX, 5, 1));
        assert!(!can_go(i32::MIN, 5, -1));
    }

    #[test]
    fn ungated_scan_stops_immediately() {
        let candidate = scan_from(7, 5, 10, false, |_| false).unwrap();
        assert_eq!(candidate, 7);
    }

    #[test]
    fn gated_scan_skips_entries_without_interaction() {
        // Entries 1..=3 lack interaction; 1 is skipped, 2 has interaction
        let candidate = scan_from(3, -1, 5, true, |index| index == 2).unwrap();
        assert_eq!(candidate, 2);
    }

    #[test]
    fn gated_scan_stops_at_first_entry_boundary() {
        // No interaction anywhere: scanning back stops at index 0
        let candidate = scan_from(2, -1, 5, true, |_| false).unwrap();
        assert_eq!(candidate, 0);
    }

    #[test]
    fn gated_scan_stops_at_last_entry_boundary() {
        // No interaction anywhere: scanning forward stops at count - 1
        let candidate = scan_from(2, 1, 5, true, |_| false).unwrap();
        assert_eq!(candidate, 4);
    }

    #[test]
    fn gated_scan_past_the_end_stops_in_one_step() {
        // A start beyond the last entry satisfies the >= boundary check
        let candidate = scan_from(9, 1, 5, true, |_| false).unwrap();
        assert_eq!(candidate, 9);
    }

    #[test]
    fn gated_scan_below_zero_stops_in_one_step() {
        let candidate = scan_from(-1, -1, 5, true, |_| false).unwrap();
        assert_eq!(candidate, -1);
    }

    #[test]
    fn scan_overflow_is_reported() {
        // The candidate sits inside the boundaries, so the scan steps
        // again and the huge offset overflows
        let result = scan_from(5, i32::MAX, i32::MAX, true, |_| false);
        assert_eq!(result, Err(ScanError::Overflow));
    }

    #[test]
    fn interaction_query_skipped_at_boundaries() {
        // The closure must not be consulted for boundary candidates
        let mut asked = Vec::new();
        let candidate = scan_from(4, 1, 5, true, |index| {
            asked.push(index);
            false
        })
        .unwrap();
        assert_eq!(candidate, 4);
        assert!(asked.is_empty());
    }

    #[test]
    fn scan_error_display() {
        assert_eq!(ScanError::Overflow.to_string(), "history offset overflow");
    }
}
