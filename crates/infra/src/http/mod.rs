//! HTTP plumbing shared by the infra adapters

mod client;

pub use client::{HttpClient, HttpClientBuilder};
