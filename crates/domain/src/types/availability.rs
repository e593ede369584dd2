//! Availability types supplied by the per-user store collaborator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An occupied time range for one or more accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub account_ids: Vec<String>,
}

impl BusyInterval {
    /// Half-open overlap test against `[start, end)`
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && start < self.end
    }

    /// True when this interval blocks any of the given accounts
    pub fn covers_any_account(&self, accounts: &[String]) -> bool {
        self.account_ids.iter().any(|id| accounts.contains(id))
    }
}

/// An unoccupied time range, reported alongside busy intervals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Response of the store's `computeAvailability` operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub busy_intervals: Vec<BusyInterval>,
    #[serde(default)]
    pub free_intervals: Vec<FreeInterval>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).single().unwrap()
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        let busy = BusyInterval { start: ts(9, 0), end: ts(10, 0), account_ids: vec![] };
        assert!(!busy.overlaps(ts(10, 0), ts(11, 0)));
        assert!(!busy.overlaps(ts(8, 0), ts(9, 0)));
    }

    #[test]
    fn partial_overlap_is_detected() {
        let busy = BusyInterval { start: ts(9, 0), end: ts(9, 30), account_ids: vec![] };
        assert!(busy.overlaps(ts(9, 0), ts(10, 0)));
        assert!(busy.overlaps(ts(8, 30), ts(9, 1)));
    }
}
