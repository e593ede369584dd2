//! VIP policy and fairness history records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Priority weighting for a specific participant
///
/// Supplied read-only by the VIP collaborator. `allow_after_hours` lets the
/// scorer reverse a working-hours penalty for this participant's meetings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VipPolicy {
    pub participant_hash: String,
    pub display_name: String,
    pub priority_weight: f64,
    #[serde(default)]
    pub allow_after_hours: bool,
}

/// Record of whose preference was honored in a past session
///
/// One row per participant; `preferred_hash` names the participant whose
/// preferred slot won the negotiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingHistoryEntry {
    pub session_id: String,
    pub participant_hash: String,
    pub preferred_hash: String,
    pub chosen_start: DateTime<Utc>,
    pub recorded_at: DateTime<Utc>,
}
