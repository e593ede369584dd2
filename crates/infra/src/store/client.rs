//! RPC client for the per-user scheduling store actor
//!
//! The actor owns all durable scheduling state for one user and serializes
//! access to it. This client speaks HTTP-shaped JSON RPC: one POST endpoint
//! per store operation under the actor's base URL. Store failures surface as
//! [`TminusError::Store`]; the orchestrator decides which reads are
//! best-effort.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tminus_core::SchedulingStore;
use tminus_domain::{
    AvailabilityResponse, CanonicalEvent, Hold, Result, SchedulingHistoryEntry, SchedulingSession,
    SolverConstraint, TminusError, VipPolicy,
};
use tracing::{debug, instrument};

use crate::http::HttpClient;
use crate::redact::redact_account;

/// Configuration for the store RPC client
#[derive(Debug, Clone)]
pub struct HttpSchedulingStoreConfig {
    /// Base URL of the owning actor, already scoped to one user
    pub base_url: String,
    /// Timeout for one store RPC
    pub timeout: Duration,
    /// Retry attempts for transient transport failures
    pub max_retries: usize,
}

impl HttpSchedulingStoreConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), timeout: Duration::from_secs(10), max_retries: 3 }
    }
}

/// HTTP-shaped RPC client for the scheduling store
pub struct HttpSchedulingStore {
    http_client: HttpClient,
    config: HttpSchedulingStoreConfig,
}

#[derive(Debug, Serialize)]
struct AvailabilityRequest<'a> {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    account_ids: &'a [String],
}

#[derive(Debug, Serialize)]
struct HistoryRequest<'a> {
    participant_hashes: &'a [String],
}

#[derive(Debug, Serialize)]
struct RecordHistoryRequest<'a> {
    entries: &'a [SchedulingHistoryEntry],
}

#[derive(Debug, Serialize)]
struct SessionIdRequest<'a> {
    session_id: &'a str,
}

#[derive(Debug, Serialize)]
struct CommitSessionRequest<'a> {
    session_id: &'a str,
    candidate_id: &'a str,
    event_id: &'a str,
}

#[derive(Debug, Serialize)]
struct StoreHoldsRequest<'a> {
    holds: &'a [Hold],
}

#[derive(Debug, Serialize)]
struct UpsertEventRequest<'a> {
    event: &'a CanonicalEvent,
    source: &'a str,
}

#[derive(Debug, Deserialize)]
struct ConstraintsResponse {
    constraints: Vec<SolverConstraint>,
}

#[derive(Debug, Deserialize)]
struct VipPoliciesResponse {
    policies: Vec<VipPolicy>,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    entries: Vec<SchedulingHistoryEntry>,
}

#[derive(Debug, Deserialize)]
struct HoldsResponse {
    holds: Vec<Hold>,
}

impl HttpSchedulingStore {
    /// Create a store client for the given actor base URL.
    pub fn new(config: HttpSchedulingStoreConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .max_attempts(config.max_retries)
            .build()?;
        Ok(Self { http_client, config })
    }

    /// Issue one RPC, returning the response after status handling.
    async fn call_raw<Req>(&self, operation: &str, body: &Req) -> Result<reqwest::Response>
    where
        Req: Serialize + ?Sized,
    {
        let url = format!("{}/scheduling/{operation}", self.config.base_url);
        let request = self.http_client.request(Method::POST, &url).json(body);
        let response = self.http_client.send(request).await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(TminusError::NotFound(format!("{operation}: not found")));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(TminusError::Store(format!(
                "{operation} returned status {status}: {detail}"
            )));
        }

        debug!(operation, %status, "store rpc succeeded");
        Ok(response)
    }

    /// Issue one RPC and deserialize the JSON response.
    async fn call<Req, Resp>(&self, operation: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        self.call_raw(operation, body)
            .await?
            .json::<Resp>()
            .await
            .map_err(|err| TminusError::Store(format!("{operation}: malformed response: {err}")))
    }

    /// Issue one RPC whose response body is irrelevant.
    async fn call_ack<Req>(&self, operation: &str, body: &Req) -> Result<()>
    where
        Req: Serialize + ?Sized,
    {
        self.call_raw(operation, body).await?;
        Ok(())
    }
}

#[async_trait]
impl SchedulingStore for HttpSchedulingStore {
    #[instrument(skip(self, account_ids))]
    async fn compute_availability(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        account_ids: &[String],
    ) -> Result<AvailabilityResponse> {
        let redacted: Vec<String> = account_ids.iter().map(|id| redact_account(id)).collect();
        debug!(accounts = ?redacted, "computing availability");
        self.call("compute_availability", &AvailabilityRequest { start, end, account_ids }).await
    }

    async fn list_constraints(&self) -> Result<Vec<SolverConstraint>> {
        let response: ConstraintsResponse =
            self.call("list_constraints", &serde_json::json!({})).await?;
        Ok(response.constraints)
    }

    async fn list_vip_policies(&self) -> Result<Vec<VipPolicy>> {
        let response: VipPoliciesResponse =
            self.call("list_vip_policies", &serde_json::json!({})).await?;
        Ok(response.policies)
    }

    async fn get_scheduling_history(
        &self,
        participant_hashes: &[String],
    ) -> Result<Vec<SchedulingHistoryEntry>> {
        let response: HistoryResponse =
            self.call("get_scheduling_history", &HistoryRequest { participant_hashes }).await?;
        Ok(response.entries)
    }

    async fn record_scheduling_history(&self, entries: &[SchedulingHistoryEntry]) -> Result<()> {
        self.call_ack("record_scheduling_history", &RecordHistoryRequest { entries }).await
    }

    async fn store_scheduling_session(&self, session: &SchedulingSession) -> Result<()> {
        self.call_ack("store_scheduling_session", session).await
    }

    async fn get_scheduling_session(&self, session_id: &str) -> Result<SchedulingSession> {
        self.call("get_scheduling_session", &SessionIdRequest { session_id }).await
    }

    async fn commit_scheduling_session(
        &self,
        session_id: &str,
        candidate_id: &str,
        event_id: &str,
    ) -> Result<()> {
        self.call_ack(
            "commit_scheduling_session",
            &CommitSessionRequest { session_id, candidate_id, event_id },
        )
        .await
    }

    async fn cancel_scheduling_session(&self, session_id: &str) -> Result<()> {
        self.call_ack("cancel_scheduling_session", &SessionIdRequest { session_id }).await
    }

    async fn store_holds(&self, holds: &[Hold]) -> Result<()> {
        self.call_ack("store_holds", &StoreHoldsRequest { holds }).await
    }

    async fn get_holds_by_session(&self, session_id: &str) -> Result<Vec<Hold>> {
        let response: HoldsResponse =
            self.call("get_holds_by_session", &SessionIdRequest { session_id }).await?;
        Ok(response.holds)
    }

    async fn release_session_holds(&self, session_id: &str) -> Result<()> {
        self.call_ack("release_session_holds", &SessionIdRequest { session_id }).await
    }

    async fn get_expired_holds(&self) -> Result<Vec<Hold>> {
        let response: HoldsResponse =
            self.call("get_expired_holds", &serde_json::json!({})).await?;
        Ok(response.holds)
    }

    async fn upsert_canonical_event(&self, event: &CanonicalEvent, source: &str) -> Result<()> {
        self.call_ack("upsert_canonical_event", &UpsertEventRequest { event, source }).await
    }
}
