//! Tentative hold lifecycle
//!
//! A hold is a provider-visible placeholder reservation for one candidate on
//! one account. Holds are created alongside candidates, surface on real
//! calendars as opaque tentative events, and terminate through commit,
//! release, or expiry. The status state machine itself lives on
//! [`HoldStatus`]; this module owns hold construction, the idempotent
//! write/delete message builders, expiry and extension rules, and conflict
//! detection.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use tminus_domain::constants::{
    APPROACHING_EXPIRY_THRESHOLD_MINUTES, DEFAULT_HOLD_TIMEOUT_HOURS, DEFAULT_TARGET_CALENDAR,
    HOLD_ID_PROPERTY_KEY, HOLD_TITLE_PREFIX, MANAGED_PROPERTY_KEY, MAX_HOLD_EXTENSION_HOURS,
    MIN_HOLD_EXTENSION_HOURS, MIN_HOLD_TIMEOUT_MINUTES, SESSION_ID_PROPERTY_KEY,
};
use tminus_domain::{
    Hold, HoldStatus, ProjectedPayload, Result, ScoredCandidate, TminusError, WriteMessage,
};

/// Bounds applied to hold lifetimes and extensions
#[derive(Debug, Clone)]
pub struct HoldPolicy {
    /// Lifetime used when the caller does not supply a timeout
    pub default_timeout: Duration,
    /// Floor for caller-supplied timeouts
    pub min_timeout: Duration,
    /// Extension range, in whole hours
    pub min_extension_hours: i64,
    pub max_extension_hours: i64,
}

impl Default for HoldPolicy {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(DEFAULT_HOLD_TIMEOUT_HOURS as u64 * 3600),
            min_timeout: Duration::from_secs(MIN_HOLD_TIMEOUT_MINUTES as u64 * 60),
            min_extension_hours: MIN_HOLD_EXTENSION_HOURS,
            max_extension_hours: MAX_HOLD_EXTENSION_HOURS,
        }
    }
}

impl HoldPolicy {
    /// Resolve a caller-supplied timeout against the policy bounds.
    fn resolve_timeout(&self, timeout_ms: Option<i64>) -> Result<chrono::Duration> {
        let Some(ms) = timeout_ms else {
            return chrono::Duration::from_std(self.default_timeout)
                .map_err(|e| TminusError::Internal(e.to_string()));
        };
        let min_ms = self.min_timeout.as_millis() as i64;
        let max_ms = self.max_extension_hours * 3_600_000;
        if ms < min_ms {
            return Err(TminusError::InvalidInput(format!(
                "hold timeout {ms}ms is below minimum {min_ms}ms"
            )));
        }
        if ms > max_ms {
            return Err(TminusError::InvalidInput(format!(
                "hold timeout {ms}ms is above maximum {max_ms}ms"
            )));
        }
        Ok(chrono::Duration::milliseconds(ms))
    }
}

/// Deterministic idempotency key for one operation on one hold, so retried
/// queue deliveries are safe downstream.
pub fn hold_idempotency_key(operation: &str, hold_id: &str) -> String {
    format!("{operation}-{hold_id}")
}

/// Create a hold for one candidate on one account. The placeholder has not
/// been written yet, so `provider_event_id` starts out `None`.
pub fn create_hold(
    session_id: &str,
    account_id: &str,
    candidate: &ScoredCandidate,
    title: &str,
    timeout_ms: Option<i64>,
    policy: &HoldPolicy,
    now: DateTime<Utc>,
) -> Result<Hold> {
    let timeout = policy.resolve_timeout(timeout_ms)?;
    Ok(Hold {
        id: Uuid::new_v4().to_string(),
        session_id: session_id.to_string(),
        account_id: account_id.to_string(),
        candidate_id: candidate.id.clone(),
        title: title.to_string(),
        start: Some(candidate.start),
        end: Some(candidate.end),
        provider_event_id: None,
        expires_at: now + timeout,
        status: HoldStatus::Held,
        created_at: now,
    })
}

/// Build the idempotent upsert that makes the hold visible on the provider
/// calendar as an opaque, tentative, managed event.
pub fn build_hold_upsert_message(hold: &Hold) -> Result<WriteMessage> {
    let (Some(start), Some(end)) = (hold.start, hold.end) else {
        return Err(TminusError::InvalidInput(format!(
            "hold {} has no candidate window to project",
            hold.id
        )));
    };

    let mut extended_properties = BTreeMap::new();
    extended_properties.insert(MANAGED_PROPERTY_KEY.to_string(), "true".to_string());
    extended_properties.insert(HOLD_ID_PROPERTY_KEY.to_string(), hold.id.clone());
    extended_properties.insert(SESSION_ID_PROPERTY_KEY.to_string(), hold.session_id.clone());

    Ok(WriteMessage::Upsert {
        canonical_event_id: hold.id.clone(),
        target_account_id: hold.account_id.clone(),
        target_calendar_id: DEFAULT_TARGET_CALENDAR.to_string(),
        projected_payload: ProjectedPayload {
            title: format!("{HOLD_TITLE_PREFIX} {}", hold.title),
            start,
            end,
            opaque: true,
            tentative: true,
            extended_properties,
        },
        idempotency_key: hold_idempotency_key("create", &hold.id),
    })
}

/// Build the idempotent delete for a hold's placeholder. Returns `None` when
/// no placeholder was ever created; deleting nothing is not an error.
pub fn build_hold_delete_message(hold: &Hold) -> Option<WriteMessage> {
    let provider_event_id = hold.provider_event_id.clone()?;
    Some(WriteMessage::Delete {
        canonical_event_id: hold.id.clone(),
        target_account_id: hold.account_id.clone(),
        provider_event_id,
        idempotency_key: hold_idempotency_key("delete", &hold.id),
    })
}

/// A hold is expired once `now` reaches `expires_at`.
pub fn is_expired(hold: &Hold, now: DateTime<Utc>) -> bool {
    now >= hold.expires_at
}

/// Filter to `held` holds past their expiry, for periodic cleanup.
pub fn expired_holds(holds: &[Hold], now: DateTime<Utc>) -> Vec<&Hold> {
    holds.iter().filter(|h| h.status == HoldStatus::Held && is_expired(h, now)).collect()
}

/// True when a `held` hold is within the notification threshold of expiring.
/// Used for notification, never for a state change.
pub fn is_approaching_expiry(hold: &Hold, now: DateTime<Utc>) -> bool {
    hold.status == HoldStatus::Held
        && hold.expires_at - now <= chrono::Duration::minutes(APPROACHING_EXPIRY_THRESHOLD_MINUTES)
}

/// Extend a `held` hold's lifetime to `now + duration_hours`. Terminal holds
/// cannot be extended.
pub fn extend_hold(
    hold: &mut Hold,
    duration_hours: i64,
    policy: &HoldPolicy,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>> {
    if hold.status != HoldStatus::Held {
        return Err(TminusError::InvalidInput(format!(
            "cannot extend hold {} in terminal status {}",
            hold.id, hold.status
        )));
    }
    if duration_hours < policy.min_extension_hours || duration_hours > policy.max_extension_hours {
        return Err(TminusError::InvalidInput(format!(
            "extension of {duration_hours}h is outside the allowed {}-{}h range",
            policy.min_extension_hours, policy.max_extension_hours
        )));
    }
    let new_expiry = now + chrono::Duration::hours(duration_hours);
    hold.expires_at = new_expiry;
    Ok(new_expiry)
}

/// Every `held` hold whose candidate window strictly overlaps the proposed
/// interval. Touching boundaries do not conflict; holds without a known
/// window are ignored.
pub fn find_conflicts<'a>(
    proposed_start: DateTime<Utc>,
    proposed_end: DateTime<Utc>,
    holds: &'a [Hold],
) -> Vec<&'a Hold> {
    holds
        .iter()
        .filter(|h| h.status == HoldStatus::Held)
        .filter(|h| match (h.start, h.end) {
            (Some(start), Some(end)) => start < proposed_end && proposed_start < end,
            _ => false,
        })
        .collect()
}
