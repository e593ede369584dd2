//! RPC client for the outbound write queue
//!
//! The write queue mutates provider calendars with at-least-once delivery;
//! each message's idempotency key makes duplicates safe, so this client only
//! has to hand batches over, never to dedupe.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use tminus_core::WriteQueue;
use tminus_domain::{Result, TminusError, WriteMessage};
use tracing::{debug, instrument};

use crate::http::HttpClient;

/// Configuration for the write-queue client
#[derive(Debug, Clone)]
pub struct HttpWriteQueueConfig {
    /// Batch submission endpoint
    pub endpoint: String,
    /// Timeout for one batch submission
    pub timeout: Duration,
    /// Retry attempts for transient transport failures
    pub max_retries: usize,
}

impl HttpWriteQueueConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), timeout: Duration::from_secs(10), max_retries: 3 }
    }
}

/// HTTP client submitting message batches to the write queue
pub struct HttpWriteQueue {
    http_client: HttpClient,
    config: HttpWriteQueueConfig,
}

#[derive(Debug, Serialize)]
struct BatchRequest<'a> {
    messages: &'a [WriteMessage],
}

impl HttpWriteQueue {
    /// Create a write-queue client for the given endpoint.
    pub fn new(config: HttpWriteQueueConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .max_attempts(config.max_retries)
            .build()?;
        Ok(Self { http_client, config })
    }
}

#[async_trait]
impl WriteQueue for HttpWriteQueue {
    #[instrument(skip(self, messages), fields(count = messages.len()))]
    async fn enqueue_batch(&self, messages: &[WriteMessage]) -> Result<()> {
        if messages.is_empty() {
            return Ok(());
        }

        let request = self
            .http_client
            .request(Method::POST, &self.config.endpoint)
            .json(&BatchRequest { messages });
        let response = self.http_client.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(TminusError::Network(format!(
                "write queue returned status {status}: {detail}"
            )));
        }

        debug!(count = messages.len(), "enqueued write batch");
        Ok(())
    }
}
