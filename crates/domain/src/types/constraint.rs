//! Solver constraint union
//!
//! Constraints arrive from the store as tagged rows and are dispatched by
//! pattern match in the scorer. `days` uses 0 = Monday .. 6 = Sunday.
//! Timezones are IANA names evaluated at scoring time; an unparseable zone
//! falls back to UTC.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction a buffer applies to, derived from its type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferType {
    Travel,
    Prep,
    Cooldown,
}

impl BufferType {
    /// Travel and prep time guard the run-up to a meeting, cooldown guards
    /// the wind-down after it.
    pub fn applies_before(self) -> bool {
        matches!(self, Self::Travel | Self::Prep)
    }
}

/// A tagged rule affecting slot filtering or scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SolverConstraint {
    /// Preferred working window for a set of weekdays, in a specific zone
    WorkingHours { days: Vec<u8>, start: NaiveTime, end: NaiveTime, timezone: String },
    /// Absolute exclusion window, independent of busy-interval coverage
    Trip { start: DateTime<Utc>, end: DateTime<Utc> },
    /// Required free gap adjacent to meetings
    Buffer { buffer_type: BufferType, minutes: i64 },
    /// No meetings starting at or after this local time
    NoMeetingsAfter { time: NaiveTime, timezone: String },
    /// Manual availability override window
    Override { start: DateTime<Utc>, end: DateTime<Utc>, available: bool },
    /// Per-participant priority rule derived from VIP policy
    VipOverride { participant_hash: String, priority_weight: f64, allow_after_hours: bool },
}

impl SolverConstraint {
    /// Stable tag matching the wire discriminant
    pub fn kind(&self) -> &'static str {
        match self {
            Self::WorkingHours { .. } => "working_hours",
            Self::Trip { .. } => "trip",
            Self::Buffer { .. } => "buffer",
            Self::NoMeetingsAfter { .. } => "no_meetings_after",
            Self::Override { .. } => "override",
            Self::VipOverride { .. } => "vip_override",
        }
    }
}
