//! Write-queue adapters

mod client;

pub use client::{HttpWriteQueue, HttpWriteQueueConfig};
