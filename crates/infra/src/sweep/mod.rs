//! Periodic reconciliation workers

mod hold_sweeper;

pub use hold_sweeper::{HoldSweeper, HoldSweeperConfig};
