//! Solver adapters

mod remote;

pub use remote::{RemoteSolver, RemoteSolverConfig};
