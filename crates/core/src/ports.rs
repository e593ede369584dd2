//! Port interfaces for the scheduling engine
//!
//! These traits define the boundaries between core business logic and
//! infrastructure implementations. The production implementations issue RPC
//! to the per-user store actor and to the outbound write queue; tests
//! substitute in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tminus_domain::{
    AvailabilityResponse, CanonicalEvent, Hold, Result, SchedulingHistoryEntry, SchedulingSession,
    SolverConstraint, VipPolicy, WriteMessage,
};

/// Trait for the user-scoped scheduling store collaborator
///
/// All durable state (sessions, holds, canonical events) lives behind the
/// owning per-user actor, which serializes access to that user's data.
#[async_trait]
pub trait SchedulingStore: Send + Sync {
    /// Compute busy/free intervals for the given accounts within a window
    async fn compute_availability(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        account_ids: &[String],
    ) -> Result<AvailabilityResponse>;

    /// List the user's active solver constraints
    async fn list_constraints(&self) -> Result<Vec<SolverConstraint>>;

    /// List VIP policies configured for the user
    async fn list_vip_policies(&self) -> Result<Vec<VipPolicy>>;

    /// Fetch fairness history rows involving the given participants
    async fn get_scheduling_history(
        &self,
        participant_hashes: &[String],
    ) -> Result<Vec<SchedulingHistoryEntry>>;

    /// Append fairness ledger entries recorded at commit time
    async fn record_scheduling_history(&self, entries: &[SchedulingHistoryEntry]) -> Result<()>;

    /// Persist a freshly created session together with its candidates
    async fn store_scheduling_session(&self, session: &SchedulingSession) -> Result<()>;

    /// Read back a session by ID
    async fn get_scheduling_session(&self, session_id: &str) -> Result<SchedulingSession>;

    /// Mark a session committed, recording the chosen candidate and event
    async fn commit_scheduling_session(
        &self,
        session_id: &str,
        candidate_id: &str,
        event_id: &str,
    ) -> Result<()>;

    /// Mark a session cancelled
    async fn cancel_scheduling_session(&self, session_id: &str) -> Result<()>;

    /// Persist a batch of holds
    async fn store_holds(&self, holds: &[Hold]) -> Result<()>;

    /// Fetch all holds belonging to a session
    async fn get_holds_by_session(&self, session_id: &str) -> Result<Vec<Hold>>;

    /// Transition a session's `held` holds to `released` store-side
    async fn release_session_holds(&self, session_id: &str) -> Result<()>;

    /// Fetch holds past their `expires_at` while still `held`
    async fn get_expired_holds(&self) -> Result<Vec<Hold>>;

    /// Upsert the canonical event created on commit
    async fn upsert_canonical_event(&self, event: &CanonicalEvent, source: &str) -> Result<()>;
}

/// Trait for the outbound write-queue collaborator
///
/// Delivery is at-least-once; every message carries an idempotency key so
/// duplicate delivery is safe downstream.
#[async_trait]
pub trait WriteQueue: Send + Sync {
    /// Enqueue a batch of upsert/delete messages in one submission
    async fn enqueue_batch(&self, messages: &[WriteMessage]) -> Result<()>;
}
