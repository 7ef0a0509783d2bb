//! Onboarding audit library for managed Kubernetes clusters
//!
//! This crate provides:
//! - An authenticated, retrying client for the inventory API
//! - Cluster, agent and runtime-protection data sources
//! - Paginated host inventory with per-resource configuration resolution
//! - Correlation of hosts with connected agents by MAC address
//! - The enrichment pipeline that merges all of it into report records

pub mod api;
pub mod client;
pub mod clusters;
pub mod connectivity;
pub mod enrichment;
pub mod error;
pub mod inventory;
pub mod models;
pub mod observability;
pub mod retry;
pub mod runtime;
pub mod summary;

#[cfg(test)]
mod testing;

pub use api::InventoryApi;
pub use client::InventoryClient;
pub use enrichment::Enricher;
pub use error::{Error, Result};
pub use models::*;
pub use observability::RunLogger;
pub use retry::RetryPolicy;
pub use summary::CoverageSummary;
