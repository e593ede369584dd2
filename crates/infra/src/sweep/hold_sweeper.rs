//! Hold expiry sweeper
//!
//! Cron-driven worker that queries holds past their `expires_at` while still
//! `held` and issues the same release path cancellation uses. Safe to run
//! without locks: the `held -> expired` transition is monotonic, and
//! re-running cleanup on an already-released hold is a no-op. Join handles
//! are tracked, cancellation is explicit, and every asynchronous operation
//! is wrapped in a timeout.

use std::sync::Arc;
use std::time::Duration;

use tminus_core::SchedulingService;
use tminus_domain::{Result, TminusError};
use tokio::task::JoinHandle;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Configuration for the hold sweeper.
#[derive(Debug, Clone)]
pub struct HoldSweeperConfig {
    /// Cron expression describing the execution schedule.
    pub cron_expression: String,
    /// Timeout applied to a single sweep execution.
    pub job_timeout: Duration,
    /// Timeout for starting the underlying scheduler.
    pub start_timeout: Duration,
    /// Timeout for stopping the scheduler.
    pub stop_timeout: Duration,
    /// Timeout for awaiting the monitor task join handle.
    pub join_timeout: Duration,
}

impl Default for HoldSweeperConfig {
    fn default() -> Self {
        Self {
            cron_expression: "0 */10 * * * *".into(), // every 10 minutes
            job_timeout: Duration::from_secs(120),
            start_timeout: Duration::from_secs(5),
            stop_timeout: Duration::from_secs(5),
            join_timeout: Duration::from_secs(5),
        }
    }
}

/// Hold expiry sweeper with explicit lifecycle management.
pub struct HoldSweeper {
    scheduler: Option<JobScheduler>,
    config: HoldSweeperConfig,
    monitor_handle: Option<JoinHandle<()>>,
    cancellation: CancellationToken,
    service: Arc<SchedulingService>,
}

impl HoldSweeper {
    /// Create a sweeper with the default configuration.
    pub fn new(service: Arc<SchedulingService>) -> Self {
        Self::with_config(HoldSweeperConfig::default(), service)
    }

    /// Create a sweeper with a custom configuration.
    pub fn with_config(config: HoldSweeperConfig, service: Arc<SchedulingService>) -> Self {
        Self {
            scheduler: None,
            config,
            monitor_handle: None,
            cancellation: CancellationToken::new(),
            service,
        }
    }

    /// Start the sweeper, spawning the monitoring task.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(TminusError::InvalidInput("Sweeper already running".to_string()));
        }

        self.cancellation = CancellationToken::new();

        let scheduler_instance = self.build_scheduler().await?;
        let start_timeout = self.config.start_timeout;

        tokio::time::timeout(start_timeout, scheduler_instance.start())
            .await
            .map_err(|_| {
                TminusError::Internal(format!(
                    "sweeper start timed out after {}s",
                    start_timeout.as_secs()
                ))
            })?
            .map_err(|err| TminusError::Internal(format!("failed to start sweeper: {err}")))?;

        self.scheduler = Some(scheduler_instance);

        let cancel = self.cancellation.clone();
        let handle = tokio::spawn(async move {
            Self::monitor_task(cancel).await;
        });

        self.monitor_handle = Some(handle);
        info!("Hold sweeper started");
        Ok(())
    }

    /// Stop the sweeper and wait for the monitor task to finish.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> Result<()> {
        if !self.is_running() {
            return Err(TminusError::InvalidInput("Sweeper not running".to_string()));
        }

        self.cancellation.cancel();

        let mut scheduler = match self.scheduler.take() {
            Some(scheduler) => scheduler,
            None => return Err(TminusError::InvalidInput("Sweeper not running".to_string())),
        };

        let stop_timeout = self.config.stop_timeout;
        tokio::time::timeout(stop_timeout, async move { scheduler.shutdown().await })
            .await
            .map_err(|_| {
                TminusError::Internal(format!(
                    "sweeper stop timed out after {}s",
                    stop_timeout.as_secs()
                ))
            })?
            .map_err(|err| TminusError::Internal(format!("failed to stop sweeper: {err}")))?;

        if let Some(handle) = self.monitor_handle.take() {
            let join_timeout = self.config.join_timeout;
            tokio::time::timeout(join_timeout, handle)
                .await
                .map_err(|_| {
                    TminusError::Internal(format!(
                        "sweeper join timed out after {}s",
                        join_timeout.as_secs()
                    ))
                })?
                .map_err(|err| TminusError::Internal(format!("monitor task panicked: {err}")))?;
        }

        info!("Hold sweeper stopped");
        self.cancellation = CancellationToken::new();
        Ok(())
    }

    /// Returns true when a scheduler instance is active.
    pub fn is_running(&self) -> bool {
        self.scheduler.is_some()
    }

    async fn build_scheduler(&self) -> Result<JobScheduler> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|err| TminusError::Internal(format!("failed to create scheduler: {err}")))?;

        let cron_expr = self.config.cron_expression.clone();
        let job_timeout = self.config.job_timeout;
        let service = Arc::clone(&self.service);

        let job_definition = Job::new_async(cron_expr.as_str(), move |_id, _lock| {
            let service = Arc::clone(&service);

            Box::pin(async move {
                match tokio::time::timeout(job_timeout, service.release_expired_holds()).await {
                    Ok(Ok(released)) => {
                        if released > 0 {
                            info!(released, "Hold sweep released expired holds");
                        } else {
                            debug!("Hold sweep found nothing to release");
                        }
                    }
                    Ok(Err(err)) => {
                        error!(error = ?err, "Hold sweep failed");
                    }
                    Err(_) => {
                        warn!(timeout_secs = job_timeout.as_secs(), "Hold sweep timed out");
                    }
                }
            })
        })
        .map_err(|err| TminusError::Internal(format!("failed to register sweep job: {err}")))?;

        let job_id = job_definition.guid();
        scheduler
            .add(job_definition)
            .await
            .map_err(|err| TminusError::Internal(format!("failed to register sweep job: {err}")))?;

        debug!(cron = %self.config.cron_expression, job_id = %job_id, "Registered hold sweep job");
        Ok(scheduler)
    }

    async fn monitor_task(cancel: CancellationToken) {
        cancel.cancelled().await;
        debug!("Hold sweeper monitor cancelled");
    }
}

impl Drop for HoldSweeper {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("HoldSweeper dropped while running; cancelling tasks");
            self.cancellation.cancel();
        }
    }
}
