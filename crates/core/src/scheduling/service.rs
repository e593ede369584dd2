//! Scheduling orchestrator - session-level business logic
//!
//! Composes the solver, the fairness/VIP engine and the hold lifecycle into
//! the public operation surface: create a session, list its candidates,
//! commit one candidate, cancel the session. Durable state lives behind the
//! user's owning store actor; this service relies on, but does not
//! reimplement, that serialization.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use tminus_domain::constants::{MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};
use tminus_domain::{
    CanonicalEvent, Hold, HoldStatus, Result, SchedulerConfig, SchedulingHistoryEntry,
    SchedulingSession, SessionParams, SessionStatus, SolverConstraint, SolverInput, SolverKind,
    SolverOutcome, TminusError, VipPolicy, WriteMessage,
};

use crate::fairness;
use crate::holds::{self, HoldPolicy};
use crate::ports::{SchedulingStore, WriteQueue};
use crate::solver::strategy::{select_solver, LocalSolver, SolverStrategy};
use crate::solver::sort_candidates;

/// Source tag recorded on canonical events created by this engine
const EVENT_SOURCE: &str = "scheduler";

/// Result of committing a candidate
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    pub event_id: String,
    pub session: SchedulingSession,
}

/// Scheduling orchestrator
pub struct SchedulingService {
    store: Arc<dyn SchedulingStore>,
    write_queue: Arc<dyn WriteQueue>,
    local_solver: Arc<dyn SolverStrategy>,
    remote_solver: Option<Arc<dyn SolverStrategy>>,
    hold_policy: HoldPolicy,
    config: SchedulerConfig,
}

impl SchedulingService {
    /// Create a new orchestrator without a remote solver.
    pub fn new(
        store: Arc<dyn SchedulingStore>,
        write_queue: Arc<dyn WriteQueue>,
        config: SchedulerConfig,
    ) -> Self {
        let hold_policy =
            HoldPolicy { default_timeout: config.default_hold_timeout, ..HoldPolicy::default() };
        Self {
            store,
            write_queue,
            local_solver: Arc::new(LocalSolver),
            remote_solver: None,
            hold_policy,
            config,
        }
    }

    /// Attach a remote solving strategy. Without one, selection always
    /// resolves to the local strategy.
    pub fn with_remote_solver(mut self, remote: Arc<dyn SolverStrategy>) -> Self {
        self.remote_solver = Some(remote);
        self
    }

    /// Override the hold lifetime policy.
    pub fn with_hold_policy(mut self, policy: HoldPolicy) -> Self {
        self.hold_policy = policy;
        self
    }

    /// Create a scheduling session: solve, re-score, persist, place holds.
    #[instrument(skip(self, params), fields(title = %params.title))]
    pub async fn create_session(&self, params: SessionParams) -> Result<SchedulingSession> {
        validate_params(&params)?;

        let (availability, constraints, vip_policies, history) = tokio::join!(
            self.store.compute_availability(
                params.window_start,
                params.window_end,
                &params.required_account_ids,
            ),
            self.store.list_constraints(),
            self.store.list_vip_policies(),
            self.fetch_history(&params.participant_hashes),
        );

        // Availability is load-bearing; the rest degrades to empty data.
        let availability = availability?;
        let mut constraints = constraints.unwrap_or_else(|err| {
            warn!(error = %err, "Constraint fetch failed; scheduling without constraints");
            Vec::new()
        });
        let vip_policies = vip_policies.unwrap_or_else(|err| {
            warn!(error = %err, "VIP policy fetch failed; scheduling without VIP data");
            Vec::new()
        });
        let history = history.unwrap_or_else(|err| {
            warn!(error = %err, "History fetch failed; scheduling without fairness history");
            Vec::new()
        });

        // Matching VIP policies become solver constraints for this session.
        for policy in &vip_policies {
            if params.participant_hashes.contains(&policy.participant_hash) {
                constraints.push(SolverConstraint::VipOverride {
                    participant_hash: policy.participant_hash.clone(),
                    priority_weight: policy.priority_weight,
                    allow_after_hours: policy.allow_after_hours,
                });
            }
        }

        let input = SolverInput {
            window_start: params.window_start,
            window_end: params.window_end,
            duration_minutes: params.duration_minutes,
            busy_intervals: availability.busy_intervals,
            required_account_ids: params.required_account_ids.clone(),
            constraints,
            participant_hashes: params.participant_hashes.clone(),
        };

        let outcome = self.run_solver(&input).await?;
        debug!(
            solver = %outcome.solver_used,
            solver_time_ms = outcome.solver_time_ms,
            candidates = outcome.candidates.len(),
            "Solver finished"
        );

        let mut candidates = outcome.candidates;
        sort_candidates(&mut candidates);
        if !params.participant_hashes.is_empty()
            && (!history.is_empty() || !vip_policies.is_empty())
        {
            rescore_candidates(&mut candidates, &history, &vip_policies, &params.participant_hashes);
        }

        let now = Utc::now();
        let status = if candidates.is_empty() {
            SessionStatus::Open
        } else {
            SessionStatus::CandidatesReady
        };
        let session = SchedulingSession {
            id: Uuid::new_v4().to_string(),
            status,
            params: params.clone(),
            candidates,
            committed_candidate_id: None,
            committed_event_id: None,
            created_at: now,
            updated_at: now,
        };
        self.store.store_scheduling_session(&session).await?;
        info!(session_id = %session.id, status = %session.status, "Session created");

        // Hold placement is non-transactional with session persistence: a
        // failure past this point leaves a candidates_ready session with
        // zero holds, which callers must tolerate.
        if params.hold_timeout_ms != Some(0) && !session.candidates.is_empty() {
            self.place_holds(&session).await?;
        }

        Ok(session)
    }

    /// Read-through to the persisted session.
    pub async fn get_candidates(&self, session_id: &str) -> Result<SchedulingSession> {
        self.store.get_scheduling_session(session_id).await
    }

    /// Commit one candidate: release holds, create the canonical event,
    /// finalize the session, and append the fairness ledger.
    #[instrument(skip(self))]
    pub async fn commit_candidate(
        &self,
        session_id: &str,
        candidate_id: &str,
    ) -> Result<CommitOutcome> {
        let session = self.store.get_scheduling_session(session_id).await?;
        if session.status == SessionStatus::Committed {
            return Err(TminusError::InvalidInput(format!(
                "session {session_id} is already committed"
            )));
        }
        session.status.transition_to(SessionStatus::Committed)?;

        let candidate = session.candidate(candidate_id).ok_or_else(|| {
            TminusError::NotFound(format!(
                "candidate {candidate_id} not found in session {session_id}"
            ))
        })?;

        let released = self.release_session_holds(session_id).await?;
        debug!(session_id, released, "Released holds before commit");

        let event = CanonicalEvent {
            id: Uuid::new_v4().to_string(),
            title: session.params.title.clone(),
            start: candidate.start,
            end: candidate.end,
            account_ids: session.params.required_account_ids.clone(),
            tentative: false,
        };
        self.store.upsert_canonical_event(&event, EVENT_SOURCE).await?;
        self.store.commit_scheduling_session(session_id, candidate_id, &event.id).await?;
        info!(session_id, candidate_id, event_id = %event.id, "Session committed");

        if let Some(organizer) = session.params.participant_hashes.first() {
            let entries = fairness::record_scheduling_outcome(
                session_id,
                &session.params.participant_hashes,
                organizer,
                candidate.start,
                Utc::now(),
            );
            if let Err(err) = self.store.record_scheduling_history(&entries).await {
                warn!(session_id, error = %err, "Failed to append fairness history");
            }
        }

        let session = self.store.get_scheduling_session(session_id).await?;
        Ok(CommitOutcome { event_id: event.id, session })
    }

    /// Cancel a session, releasing every hold it still has.
    #[instrument(skip(self))]
    pub async fn cancel_session(&self, session_id: &str) -> Result<SchedulingSession> {
        let session = self.store.get_scheduling_session(session_id).await?;
        session.status.transition_to(SessionStatus::Cancelled)?;

        let released = self.release_session_holds(session_id).await?;
        self.store.cancel_scheduling_session(session_id).await?;
        info!(session_id, released, "Session cancelled");

        self.store.get_scheduling_session(session_id).await
    }

    /// Release every hold past its expiry, using the same release path as
    /// cancellation. Safe to re-run: releasing an already-terminal hold is a
    /// store-side no-op. Returns the number of expired holds handled.
    pub async fn release_expired_holds(&self) -> Result<usize> {
        let expired = self.store.get_expired_holds().await?;
        if expired.is_empty() {
            return Ok(0);
        }

        let deletes: Vec<WriteMessage> =
            expired.iter().filter_map(holds::build_hold_delete_message).collect();
        if !deletes.is_empty() {
            self.write_queue.enqueue_batch(&deletes).await?;
        }

        let sessions: BTreeSet<&str> = expired.iter().map(|h| h.session_id.as_str()).collect();
        for session_id in sessions {
            self.store.release_session_holds(session_id).await?;
        }

        info!(count = expired.len(), "Released expired holds");
        Ok(expired.len())
    }

    /// Fetch fairness history; skipped entirely when the session has no
    /// participant hashes.
    async fn fetch_history(
        &self,
        participant_hashes: &[String],
    ) -> Result<Vec<SchedulingHistoryEntry>> {
        if participant_hashes.is_empty() {
            return Ok(Vec::new());
        }
        self.store.get_scheduling_history(participant_hashes).await
    }

    /// Run the selected strategy; remote failures fall back to local so
    /// scheduling never fails solely because the remote solver is down.
    async fn run_solver(&self, input: &SolverInput) -> Result<SolverOutcome> {
        if select_solver(input) == SolverKind::Remote {
            if let Some(remote) = &self.remote_solver {
                match remote.solve(input, self.config.max_candidates).await {
                    Ok(outcome) => return Ok(outcome),
                    Err(err) => {
                        warn!(error = %err, "Remote solver failed; falling back to local");
                    }
                }
            }
        }
        self.local_solver.solve(input, self.config.max_candidates).await
    }

    /// Create one hold per candidate x required account and enqueue their
    /// placeholder writes in a single batch.
    async fn place_holds(&self, session: &SchedulingSession) -> Result<()> {
        let now = Utc::now();
        let mut session_holds = Vec::new();
        let mut messages = Vec::new();
        for candidate in &session.candidates {
            for account_id in &session.params.required_account_ids {
                let hold = holds::create_hold(
                    &session.id,
                    account_id,
                    candidate,
                    &session.params.title,
                    session.params.hold_timeout_ms,
                    &self.hold_policy,
                    now,
                )?;
                messages.push(holds::build_hold_upsert_message(&hold)?);
                session_holds.push(hold);
            }
        }

        self.store.store_holds(&session_holds).await?;
        self.write_queue.enqueue_batch(&messages).await?;
        debug!(session_id = %session.id, holds = session_holds.len(), "Placed holds");
        Ok(())
    }

    /// Shared release path: enqueue deletes for held placeholders, then
    /// transition the session's holds store-side.
    async fn release_session_holds(&self, session_id: &str) -> Result<usize> {
        let session_holds = self.store.get_holds_by_session(session_id).await?;
        let held: Vec<&Hold> =
            session_holds.iter().filter(|h| h.status == HoldStatus::Held).collect();

        let deletes: Vec<WriteMessage> =
            held.iter().copied().filter_map(holds::build_hold_delete_message).collect();
        if !deletes.is_empty() {
            self.write_queue.enqueue_batch(&deletes).await?;
        }
        self.store.release_session_holds(session_id).await?;
        Ok(held.len())
    }
}

/// Re-weight solver scores with fairness history and VIP policy, then
/// restore the score-desc/start-asc ordering.
fn rescore_candidates(
    candidates: &mut Vec<tminus_domain::ScoredCandidate>,
    history: &[SchedulingHistoryEntry],
    vip_policies: &[VipPolicy],
    participant_hashes: &[String],
) {
    // The most-deprioritized participant drives the boost for the session.
    let fairness_adjustment = participant_hashes
        .iter()
        .map(|hash| fairness::compute_fairness_score(history, hash))
        .fold(fairness::ScoreAdjustment::neutral(), |best, current| {
            if current.factor > best.factor {
                current
            } else {
                best
            }
        });
    let vip_weight = fairness::apply_vip_weight(vip_policies, participant_hashes);

    for candidate in candidates.iter_mut() {
        candidate.score = fairness::compute_multi_factor_score(&fairness::MultiFactorInputs {
            time_preference_score: candidate.score,
            constraint_score: 0.0,
            fairness_adjustment: fairness_adjustment.factor,
            vip_weight: vip_weight.factor,
        });
        candidate.explanation = fairness::build_explanation(
            &candidate.explanation,
            fairness_adjustment.explanation.as_deref(),
            vip_weight.explanation.as_deref(),
        );
    }

    sort_candidates(candidates);
}

fn validate_params(params: &SessionParams) -> Result<()> {
    if params.title.trim().is_empty() {
        return Err(TminusError::InvalidInput("session title must not be empty".to_string()));
    }
    if params.window_start >= params.window_end {
        return Err(TminusError::InvalidInput(
            "window start must be before window end".to_string(),
        ));
    }
    if params.duration_minutes < MIN_DURATION_MINUTES
        || params.duration_minutes > MAX_DURATION_MINUTES
    {
        return Err(TminusError::InvalidInput(format!(
            "duration must be between {MIN_DURATION_MINUTES} and {MAX_DURATION_MINUTES} minutes"
        )));
    }
    if params.required_account_ids.is_empty() {
        return Err(TminusError::InvalidInput(
            "at least one required account is needed".to_string(),
        ));
    }
    Ok(())
}
