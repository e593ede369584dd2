//! Configuration structures for the scheduling engine

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_HOLD_TIMEOUT_HOURS, DEFAULT_MAX_CANDIDATES, REMOTE_SOLVER_TIMEOUT_SECS,
};

/// Configuration for the scheduling engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Endpoint of the remote solver; `None` disables remote solving entirely
    pub remote_solver_url: Option<String>,
    /// Timeout applied to a single remote solver call
    pub remote_solver_timeout: Duration,
    /// Maximum number of candidates returned per session
    pub max_candidates: usize,
    /// Default hold lifetime when the caller does not supply one
    pub default_hold_timeout: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            remote_solver_url: None,
            remote_solver_timeout: Duration::from_secs(REMOTE_SOLVER_TIMEOUT_SECS),
            max_candidates: DEFAULT_MAX_CANDIDATES,
            default_hold_timeout: Duration::from_secs(DEFAULT_HOLD_TIMEOUT_HOURS as u64 * 3600),
        }
    }
}
