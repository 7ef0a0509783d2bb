//! Structured logging for an onboarding audit run
//!
//! Every event carries an `event` field and the service name so the run can be
//! followed in JSON logs.

use std::time::Duration;

use tracing::{error, info, warn};

use crate::error::Error;
use crate::models::EnrichedCluster;
use crate::summary::CoverageSummary;

/// Emits the lifecycle events of one run
#[derive(Debug, Clone)]
pub struct RunLogger {
    service_name: String,
}

impl Default for RunLogger {
    fn default() -> Self {
        Self::new("managed-clusters-onboard-tracking")
    }
}

impl RunLogger {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn log_run_started(&self, limit: u32, filter: &str, connected: &str) {
        info!(
            event = "run_started",
            service = %self.service_name,
            limit,
            filter = %filter,
            connected = %connected,
            "Starting onboarding audit"
        );
    }

    pub fn log_clusters_fetched(&self, total: usize, agent_connected: usize) {
        info!(
            event = "clusters_fetched",
            service = %self.service_name,
            total,
            agent_connected,
            "Fetched cluster list"
        );
    }

    pub fn log_agent_limit_exceeded(&self, cluster: &str, node_count: u32, limit: u32) {
        warn!(
            event = "agent_limit_exceeded",
            service = %self.service_name,
            cluster = %cluster,
            node_count,
            limit,
            "Cluster has more nodes than the agent page size, agent details may be truncated"
        );
    }

    pub fn log_cluster_enriched(&self, enriched: &EnrichedCluster) {
        info!(
            event = "cluster_enriched",
            service = %self.service_name,
            cluster = %enriched.cluster.name,
            nodes_connected = %enriched.nodes_connected,
            agent_status = %enriched.agent_status,
            agent_version = %enriched.agent_version,
            runtime_enabled = enriched.runtime_enabled,
            "Cluster enriched"
        );
    }

    pub fn log_cluster_lookup_failed(&self, err: &Error) {
        error!(
            event = "cluster_lookup_failed",
            service = %self.service_name,
            error = %err,
            "Cluster lookup failed"
        );
    }

    pub fn log_hosts_resolved(&self, discovered: usize, resolved: usize, connected: usize) {
        let skipped = discovered.saturating_sub(resolved);
        if skipped > 0 {
            warn!(
                event = "hosts_resolved",
                service = %self.service_name,
                discovered,
                resolved,
                skipped,
                connected,
                "Resolved host inventory with skipped resources"
            );
        } else {
            info!(
                event = "hosts_resolved",
                service = %self.service_name,
                discovered,
                resolved,
                connected,
                "Resolved host inventory"
            );
        }
    }

    pub fn log_run_completed(&self, summary: &CoverageSummary, elapsed: Duration) {
        info!(
            event = "run_completed",
            service = %self.service_name,
            clusters = summary.total_clusters,
            total_nodes = summary.total_nodes,
            nodes_connected = summary.nodes_connected,
            node_coverage_percent = summary.node_coverage_percent,
            hosts = summary.total_hosts,
            connected_hosts = summary.connected_hosts,
            elapsed_ms = elapsed.as_millis() as u64,
            "Onboarding audit completed"
        );
    }
}
