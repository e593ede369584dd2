//! Composition helpers
//!
//! Wires the HTTP adapters into a ready-to-use [`SchedulingService`]. The
//! hosting process supplies the collaborator endpoints; everything else
//! comes from [`SchedulerConfig`]. A configured remote solver URL attaches
//! the remote strategy, otherwise selection always resolves to local.

use std::sync::Arc;

use tminus_core::SchedulingService;
use tminus_domain::{Result, SchedulerConfig};

use crate::queue::{HttpWriteQueue, HttpWriteQueueConfig};
use crate::solver::{RemoteSolver, RemoteSolverConfig};
use crate::store::{HttpSchedulingStore, HttpSchedulingStoreConfig};

/// Collaborator endpoints for one user's scheduling service
#[derive(Debug, Clone)]
pub struct ServiceEndpoints {
    /// Base URL of the user's owning store actor
    pub store_base_url: String,
    /// Batch endpoint of the outbound write queue
    pub write_queue_endpoint: String,
}

/// Build a scheduling service wired to the HTTP adapters.
pub fn build_scheduling_service(
    config: &SchedulerConfig,
    endpoints: &ServiceEndpoints,
) -> Result<SchedulingService> {
    let store =
        HttpSchedulingStore::new(HttpSchedulingStoreConfig::new(&endpoints.store_base_url))?;
    let queue =
        HttpWriteQueue::new(HttpWriteQueueConfig::new(&endpoints.write_queue_endpoint))?;

    let mut service =
        SchedulingService::new(Arc::new(store), Arc::new(queue), config.clone());
    if let Some(url) = &config.remote_solver_url {
        let mut remote_config = RemoteSolverConfig::new(url.clone());
        remote_config.timeout = config.remote_solver_timeout;
        service = service.with_remote_solver(Arc::new(RemoteSolver::new(remote_config)?));
    }

    Ok(service)
}
