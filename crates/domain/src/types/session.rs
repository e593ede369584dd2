//! Scheduling session types and status state machine

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::solver::ScoredCandidate;
use crate::errors::{Result, TminusError};

/// Session lifecycle status
///
/// Transitions only move forward; `committed`, `cancelled` and `expired` are
/// terminal. An `open` session with no candidates can still be cancelled or
/// expired without ever reaching `candidates_ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Open,
    CandidatesReady,
    Committed,
    Cancelled,
    Expired,
}

impl SessionStatus {
    /// Transition table: every pair not listed here is invalid, including
    /// self-transitions.
    fn allowed_targets(self) -> &'static [Self] {
        match self {
            Self::Open => &[Self::CandidatesReady, Self::Cancelled, Self::Expired],
            Self::CandidatesReady => &[Self::Committed, Self::Cancelled, Self::Expired],
            Self::Committed | Self::Cancelled | Self::Expired => &[],
        }
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_targets().is_empty()
    }

    /// Validate a transition, returning the new status or an error naming
    /// both states.
    pub fn transition_to(self, to: Self) -> Result<Self> {
        if self.allowed_targets().contains(&to) {
            Ok(to)
        } else {
            Err(TminusError::InvalidTransition { from: self.to_string(), to: to.to_string() })
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::CandidatesReady => write!(f, "candidates_ready"),
            Self::Committed => write!(f, "committed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

/// Caller-supplied parameters for one scheduling negotiation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionParams {
    pub title: String,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub duration_minutes: i64,
    pub required_account_ids: Vec<String>,
    #[serde(default)]
    pub participant_hashes: Vec<String>,
    /// Zero disables hold creation entirely; `None` uses the configured
    /// default lifetime.
    #[serde(default)]
    pub hold_timeout_ms: Option<i64>,
}

/// One scheduling negotiation, from candidate generation to commit/cancel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingSession {
    pub id: String,
    pub status: SessionStatus,
    pub params: SessionParams,
    pub candidates: Vec<ScoredCandidate>,
    pub committed_candidate_id: Option<String>,
    pub committed_event_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SchedulingSession {
    pub fn candidate(&self, candidate_id: &str) -> Option<&ScoredCandidate> {
        self.candidates.iter().find(|c| c.id == candidate_id)
    }
}
