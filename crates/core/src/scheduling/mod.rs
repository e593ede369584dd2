//! Session orchestration

pub mod service;

pub use service::{CommitOutcome, SchedulingService};
