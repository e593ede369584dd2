//! Outbound write-queue message shapes
//!
//! Delivery to the provider write path is at-least-once; every message
//! carries a deterministic `idempotency_key` so duplicate delivery is safe
//! downstream.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event payload projected onto a provider calendar
///
/// Placeholder holds are opaque and tentative, with extended properties
/// marking them as managed so sync never re-imports them as real events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectedPayload {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub opaque: bool,
    pub tentative: bool,
    #[serde(default)]
    pub extended_properties: BTreeMap<String, String>,
}

/// A batched message for the write-queue collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum WriteMessage {
    Upsert {
        canonical_event_id: String,
        target_account_id: String,
        target_calendar_id: String,
        projected_payload: ProjectedPayload,
        idempotency_key: String,
    },
    Delete {
        canonical_event_id: String,
        target_account_id: String,
        provider_event_id: String,
        idempotency_key: String,
    },
}

impl WriteMessage {
    pub fn idempotency_key(&self) -> &str {
        match self {
            Self::Upsert { idempotency_key, .. } | Self::Delete { idempotency_key, .. } => {
                idempotency_key
            }
        }
    }
}

/// Canonical event persisted on commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub account_ids: Vec<String>,
    pub tentative: bool,
}
