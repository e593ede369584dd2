//! Store adapters

mod client;

pub use client::{HttpSchedulingStore, HttpSchedulingStoreConfig};
