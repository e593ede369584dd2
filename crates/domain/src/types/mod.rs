//! Scheduling domain types
//!
//! Grouped by concern: availability snapshots, solver constraints and
//! candidates, session and hold lifecycles, VIP/fairness records, and the
//! outbound write-queue message shapes.

pub mod availability;
pub mod constraint;
pub mod hold;
pub mod queue;
pub mod session;
pub mod solver;
pub mod vip;

pub use availability::*;
pub use constraint::*;
pub use hold::*;
pub use queue::*;
pub use session::*;
pub use solver::*;
pub use vip::*;
