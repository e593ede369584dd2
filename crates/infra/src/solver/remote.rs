//! Remote solver strategy
//!
//! Serializes the solver input to a configured endpoint and deserializes the
//! scored candidates it returns. The call is bounded by a cancellation
//! timeout. This strategy never substitutes data: a non-2xx response, a
//! malformed body, or a timeout all surface as errors, and the orchestrator
//! owns the fallback to the local strategy.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tminus_core::SolverStrategy;
use tminus_domain::constants::REMOTE_SOLVER_TIMEOUT_SECS;
use tminus_domain::{Result, ScoredCandidate, SolverInput, SolverKind, SolverOutcome, TminusError};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::http::HttpClient;

/// Configuration for the remote solver client
#[derive(Debug, Clone)]
pub struct RemoteSolverConfig {
    /// Endpoint accepting solve requests
    pub endpoint: String,
    /// Cancellation timeout for one solve call
    pub timeout: Duration,
}

impl RemoteSolverConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), timeout: Duration::from_secs(REMOTE_SOLVER_TIMEOUT_SECS) }
    }
}

/// Remote solving strategy speaking JSON over HTTP
pub struct RemoteSolver {
    http_client: HttpClient,
    config: RemoteSolverConfig,
}

#[derive(Debug, Serialize)]
struct SolveRequest<'a> {
    input: &'a SolverInput,
    max_candidates: usize,
}

#[derive(Debug, Deserialize)]
struct SolveResponse {
    /// Absent candidate list marks the body as malformed
    candidates: Option<Vec<RemoteCandidate>>,
    #[serde(default)]
    solver_time_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RemoteCandidate {
    #[serde(default)]
    id: Option<String>,
    start: chrono::DateTime<chrono::Utc>,
    end: chrono::DateTime<chrono::Utc>,
    score: f64,
    #[serde(default)]
    explanation: Option<String>,
}

impl RemoteSolver {
    /// Create a remote solver client for the given endpoint.
    pub fn new(config: RemoteSolverConfig) -> Result<Self> {
        // The outer tokio timeout is the authoritative deadline; the request
        // timeout below it just keeps reqwest from outliving the task.
        let http_client = HttpClient::builder().timeout(config.timeout).max_attempts(1).build()?;
        Ok(Self { http_client, config })
    }

    async fn solve_inner(&self, input: &SolverInput, max_candidates: usize) -> Result<SolveResponse> {
        let request = self
            .http_client
            .request(Method::POST, &self.config.endpoint)
            .json(&SolveRequest { input, max_candidates });

        let response = self.http_client.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TminusError::Solver(format!(
                "remote solver returned status {status}"
            )));
        }

        response
            .json::<SolveResponse>()
            .await
            .map_err(|err| TminusError::Solver(format!("malformed remote solver body: {err}")))
    }
}

#[async_trait]
impl SolverStrategy for RemoteSolver {
    #[instrument(skip(self, input), fields(endpoint = %self.config.endpoint))]
    async fn solve(&self, input: &SolverInput, max_candidates: usize) -> Result<SolverOutcome> {
        let started = Instant::now();

        let response =
            tokio::time::timeout(self.config.timeout, self.solve_inner(input, max_candidates))
                .await
                .map_err(|_| {
                    TminusError::Solver(format!(
                        "remote solver timed out after {}s",
                        self.config.timeout.as_secs()
                    ))
                })??;

        let candidates = response.candidates.ok_or_else(|| {
            TminusError::Solver("remote solver body is missing the candidate list".to_string())
        })?;

        let candidates: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|c| ScoredCandidate {
                id: c.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
                start: c.start,
                end: c.end,
                score: c.score,
                explanation: c.explanation.unwrap_or_default(),
            })
            .collect();

        let solver_time_ms =
            response.solver_time_ms.unwrap_or_else(|| started.elapsed().as_millis() as u64);
        debug!(candidates = candidates.len(), solver_time_ms, "Remote solve finished");

        Ok(SolverOutcome { candidates, solver_used: SolverKind::Remote, solver_time_ms })
    }

    fn kind(&self) -> SolverKind {
        SolverKind::Remote
    }
}
