//! Shared test helpers for `tminus-core` integration tests.
//!
//! In-memory fakes for the scheduling store, the write queue and the remote
//! solver strategy, so orchestrator tests can focus on behaviour instead of
//! boilerplate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tminus_core::{SchedulingStore, SolverStrategy, WriteQueue};
use tminus_domain::{
    AvailabilityResponse, BusyInterval, CanonicalEvent, Hold, HoldStatus, Result,
    SchedulingHistoryEntry, SchedulingSession, SessionStatus, SolverConstraint, SolverInput,
    SolverKind, SolverOutcome, TminusError, VipPolicy, WriteMessage,
};

/// In-memory mock of the per-user scheduling store actor.
#[derive(Default)]
pub struct MockSchedulingStore {
    pub busy: Mutex<Vec<BusyInterval>>,
    pub constraints: Mutex<Vec<SolverConstraint>>,
    pub vip_policies: Mutex<Vec<VipPolicy>>,
    pub history: Mutex<Vec<SchedulingHistoryEntry>>,
    pub sessions: Mutex<HashMap<String, SchedulingSession>>,
    pub holds: Mutex<Vec<Hold>>,
    pub events: Mutex<Vec<(CanonicalEvent, String)>>,
    pub recorded_history: Mutex<Vec<SchedulingHistoryEntry>>,
    pub fail_availability: Mutex<bool>,
    pub fail_best_effort_reads: Mutex<bool>,
}

impl MockSchedulingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed_busy(&self, intervals: Vec<BusyInterval>) {
        *self.busy.lock().unwrap() = intervals;
    }

    pub fn seed_vip_policies(&self, policies: Vec<VipPolicy>) {
        *self.vip_policies.lock().unwrap() = policies;
    }

    pub fn seed_history(&self, entries: Vec<SchedulingHistoryEntry>) {
        *self.history.lock().unwrap() = entries;
    }

    pub fn set_fail_availability(&self) {
        *self.fail_availability.lock().unwrap() = true;
    }

    pub fn set_fail_best_effort_reads(&self) {
        *self.fail_best_effort_reads.lock().unwrap() = true;
    }

    pub fn session_holds(&self, session_id: &str) -> Vec<Hold> {
        self.holds.lock().unwrap().iter().filter(|h| h.session_id == session_id).cloned().collect()
    }

    /// Simulate the downstream write path confirming a placeholder.
    pub fn attach_provider_event(&self, hold_id: &str, provider_event_id: &str) {
        for hold in self.holds.lock().unwrap().iter_mut() {
            if hold.id == hold_id {
                hold.provider_event_id = Some(provider_event_id.to_string());
            }
        }
    }

    pub fn force_expire_holds(&self, session_id: &str, now: DateTime<Utc>) {
        for hold in self.holds.lock().unwrap().iter_mut() {
            if hold.session_id == session_id {
                hold.expires_at = now - chrono::Duration::minutes(1);
            }
        }
    }
}

#[async_trait]
impl SchedulingStore for MockSchedulingStore {
    async fn compute_availability(
        &self,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
        _account_ids: &[String],
    ) -> Result<AvailabilityResponse> {
        if *self.fail_availability.lock().unwrap() {
            return Err(TminusError::Store("availability unavailable".to_string()));
        }
        Ok(AvailabilityResponse {
            busy_intervals: self.busy.lock().unwrap().clone(),
            free_intervals: Vec::new(),
        })
    }

    async fn list_constraints(&self) -> Result<Vec<SolverConstraint>> {
        if *self.fail_best_effort_reads.lock().unwrap() {
            return Err(TminusError::Store("constraints unavailable".to_string()));
        }
        Ok(self.constraints.lock().unwrap().clone())
    }

    async fn list_vip_policies(&self) -> Result<Vec<VipPolicy>> {
        if *self.fail_best_effort_reads.lock().unwrap() {
            return Err(TminusError::Store("vip unavailable".to_string()));
        }
        Ok(self.vip_policies.lock().unwrap().clone())
    }

    async fn get_scheduling_history(
        &self,
        _participant_hashes: &[String],
    ) -> Result<Vec<SchedulingHistoryEntry>> {
        if *self.fail_best_effort_reads.lock().unwrap() {
            return Err(TminusError::Store("history unavailable".to_string()));
        }
        Ok(self.history.lock().unwrap().clone())
    }

    async fn record_scheduling_history(&self, entries: &[SchedulingHistoryEntry]) -> Result<()> {
        self.recorded_history.lock().unwrap().extend_from_slice(entries);
        Ok(())
    }

    async fn store_scheduling_session(&self, session: &SchedulingSession) -> Result<()> {
        self.sessions.lock().unwrap().insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn get_scheduling_session(&self, session_id: &str) -> Result<SchedulingSession> {
        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .ok_or_else(|| TminusError::NotFound(format!("session {session_id} not found")))
    }

    async fn commit_scheduling_session(
        &self,
        session_id: &str,
        candidate_id: &str,
        event_id: &str,
    ) -> Result<()> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| TminusError::NotFound(format!("session {session_id} not found")))?;
        session.status = SessionStatus::Committed;
        session.committed_candidate_id = Some(candidate_id.to_string());
        session.committed_event_id = Some(event_id.to_string());
        session.updated_at = Utc::now();
        Ok(())
    }

    async fn cancel_scheduling_session(&self, session_id: &str) -> Result<()> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| TminusError::NotFound(format!("session {session_id} not found")))?;
        session.status = SessionStatus::Cancelled;
        session.updated_at = Utc::now();
        Ok(())
    }

    async fn store_holds(&self, holds: &[Hold]) -> Result<()> {
        self.holds.lock().unwrap().extend_from_slice(holds);
        Ok(())
    }

    async fn get_holds_by_session(&self, session_id: &str) -> Result<Vec<Hold>> {
        Ok(self.session_holds(session_id))
    }

    async fn release_session_holds(&self, session_id: &str) -> Result<()> {
        for hold in self.holds.lock().unwrap().iter_mut() {
            if hold.session_id == session_id && hold.status == HoldStatus::Held {
                hold.status = HoldStatus::Released;
            }
        }
        Ok(())
    }

    async fn get_expired_holds(&self) -> Result<Vec<Hold>> {
        let now = Utc::now();
        Ok(self
            .holds
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.status == HoldStatus::Held && h.expires_at <= now)
            .cloned()
            .collect())
    }

    async fn upsert_canonical_event(&self, event: &CanonicalEvent, source: &str) -> Result<()> {
        self.events.lock().unwrap().push((event.clone(), source.to_string()));
        Ok(())
    }
}

/// In-memory write queue capturing each enqueued batch.
#[derive(Default)]
pub struct MockWriteQueue {
    pub batches: Mutex<Vec<Vec<WriteMessage>>>,
}

impl MockWriteQueue {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn batch_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }

    pub fn all_messages(&self) -> Vec<WriteMessage> {
        self.batches.lock().unwrap().iter().flatten().cloned().collect()
    }
}

#[async_trait]
impl WriteQueue for MockWriteQueue {
    async fn enqueue_batch(&self, messages: &[WriteMessage]) -> Result<()> {
        self.batches.lock().unwrap().push(messages.to_vec());
        Ok(())
    }
}

/// Remote strategy that always fails, for fallback tests.
pub struct FailingRemoteSolver;

#[async_trait]
impl SolverStrategy for FailingRemoteSolver {
    async fn solve(&self, _input: &SolverInput, _max: usize) -> Result<SolverOutcome> {
        Err(TminusError::Network("remote solver unavailable".to_string()))
    }

    fn kind(&self) -> SolverKind {
        SolverKind::Remote
    }
}

/// Remote strategy returning a canned outcome, for selection tests.
pub struct CannedRemoteSolver {
    pub outcome: SolverOutcome,
    pub calls: Mutex<usize>,
}

impl CannedRemoteSolver {
    pub fn new(outcome: SolverOutcome) -> Arc<Self> {
        Arc::new(Self { outcome, calls: Mutex::new(0) })
    }
}

#[async_trait]
impl SolverStrategy for CannedRemoteSolver {
    async fn solve(&self, _input: &SolverInput, _max: usize) -> Result<SolverOutcome> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.outcome.clone())
    }

    fn kind(&self) -> SolverKind {
        SolverKind::Remote
    }
}
