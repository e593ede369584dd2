//! # T-Minus Infra
//!
//! Infrastructure adapters for the scheduling engine.
//!
//! This crate contains:
//! - The retrying HTTP client shared by every adapter
//! - The remote solver strategy
//! - HTTP-shaped RPC clients for the per-user store actor and the write queue
//! - The cron-driven hold expiry sweeper
//! - Configuration loading and service composition helpers

pub mod bootstrap;
pub mod config;
pub mod http;
pub mod queue;
pub mod redact;
pub mod solver;
pub mod store;
pub mod sweep;

pub use bootstrap::{build_scheduling_service, ServiceEndpoints};
pub use http::HttpClient;
pub use queue::HttpWriteQueue;
pub use solver::RemoteSolver;
pub use store::HttpSchedulingStore;
pub use sweep::{HoldSweeper, HoldSweeperConfig};
