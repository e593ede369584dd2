//! Solver strategy contract and selection policy
//!
//! Two interchangeable strategies share one contract: the in-process local
//! solver (always succeeds, may return zero candidates) and the remote
//! adapter in `tminus-infra` (throws on any failure, never substitutes
//! data). Fallback from remote to local is owned by the orchestrator, not by
//! the strategies.

use std::time::Instant;

use async_trait::async_trait;
use tminus_domain::constants::{REMOTE_CONSTRAINT_THRESHOLD, REMOTE_PARTICIPANT_THRESHOLD};
use tminus_domain::{Result, SolverInput, SolverKind, SolverOutcome};

/// Contract shared by the local and remote solving strategies
#[async_trait]
pub trait SolverStrategy: Send + Sync {
    /// Solve the input, returning scored candidates and timing metadata
    async fn solve(&self, input: &SolverInput, max_candidates: usize) -> Result<SolverOutcome>;

    /// Which strategy this is, for logging and outcome reporting
    fn kind(&self) -> SolverKind;
}

/// In-process strategy running the slot solver directly
pub struct LocalSolver;

#[async_trait]
impl SolverStrategy for LocalSolver {
    async fn solve(&self, input: &SolverInput, max_candidates: usize) -> Result<SolverOutcome> {
        let started = Instant::now();
        let candidates = super::solve(input, max_candidates);
        Ok(SolverOutcome {
            candidates,
            solver_used: SolverKind::Local,
            solver_time_ms: started.elapsed().as_millis() as u64,
        })
    }

    fn kind(&self) -> SolverKind {
        SolverKind::Local
    }
}

/// Selection policy: remote solving pays off only for large inputs.
/// Thresholds are inclusive boundaries; exactly 3 participants or exactly 5
/// constraints still selects local.
pub fn select_solver(input: &SolverInput) -> SolverKind {
    if input.participant_hashes.len() > REMOTE_PARTICIPANT_THRESHOLD
        || input.constraints.len() > REMOTE_CONSTRAINT_THRESHOLD
    {
        SolverKind::Remote
    } else {
        SolverKind::Local
    }
}
