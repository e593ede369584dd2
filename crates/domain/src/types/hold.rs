//! Tentative hold types and status state machine

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TminusError};

/// Hold lifecycle status
///
/// `held` is the only non-terminal state. Once a hold leaves it, no further
/// transition is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldStatus {
    Held,
    Committed,
    Released,
    Expired,
}

impl HoldStatus {
    fn allowed_targets(self) -> &'static [Self] {
        match self {
            Self::Held => &[Self::Committed, Self::Released, Self::Expired],
            Self::Committed | Self::Released | Self::Expired => &[],
        }
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_targets().is_empty()
    }

    /// Validate a transition, returning the new status or an error naming
    /// both states. Self-transitions, `held -> held` included, are invalid.
    pub fn transition_to(self, to: Self) -> Result<Self> {
        if self.allowed_targets().contains(&to) {
            Ok(to)
        } else {
            Err(TminusError::InvalidTransition { from: self.to_string(), to: to.to_string() })
        }
    }
}

impl fmt::Display for HoldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Held => write!(f, "held"),
            Self::Committed => write!(f, "committed"),
            Self::Released => write!(f, "released"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

/// A tentative placeholder reservation tied to one candidate on one account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hold {
    pub id: String,
    pub session_id: String,
    pub account_id: String,
    pub candidate_id: String,
    pub title: String,
    /// Candidate window; absent on rows the store returns without a join
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// Remains `None` until the placeholder write succeeds downstream
    pub provider_event_id: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub status: HoldStatus,
    pub created_at: DateTime<Utc>,
}
