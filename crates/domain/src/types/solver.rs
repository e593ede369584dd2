//! Solver input/output types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::availability::BusyInterval;
use super::constraint::SolverConstraint;

/// A proposed slot with a score and rationale
///
/// Immutable once stored on a session; re-scoring before persistence replaces
/// `score`/`explanation` wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub score: f64,
    pub explanation: String,
}

impl ScoredCandidate {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, score: f64, explanation: String) -> Self {
        Self { id: Uuid::new_v4().to_string(), start, end, score, explanation }
    }
}

/// Everything the solver needs to enumerate and score slots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverInput {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub duration_minutes: i64,
    pub busy_intervals: Vec<BusyInterval>,
    pub required_account_ids: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<SolverConstraint>,
    #[serde(default)]
    pub participant_hashes: Vec<String>,
}

/// Which strategy produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    Local,
    Remote,
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

/// Result of one solve call, regardless of strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverOutcome {
    pub candidates: Vec<ScoredCandidate>,
    pub solver_used: SolverKind,
    pub solver_time_ms: u64,
}
