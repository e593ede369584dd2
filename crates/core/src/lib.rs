//! # T-Minus Core
//!
//! Business logic for the scheduling negotiation engine.
//!
//! This crate contains:
//! - The constraint-aware slot solver and its scoring components
//! - The solver strategy contract, local strategy, and selection policy
//! - Fairness/VIP re-scoring helpers
//! - The tentative-hold lifecycle
//! - The session orchestrator and the port traits it is bounded by
//!
//! ## Architecture
//! - Depends only on `tminus-domain`
//! - All I/O goes through the port traits in [`ports`]; infrastructure
//!   adapters live in `tminus-infra`

pub mod fairness;
pub mod holds;
pub mod ports;
pub mod scheduling;
pub mod solver;

pub use ports::{SchedulingStore, WriteQueue};
pub use scheduling::{CommitOutcome, SchedulingService};
pub use solver::strategy::{select_solver, LocalSolver, SolverStrategy};
