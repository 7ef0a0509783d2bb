//! Coverage totals across the merged report

use serde::Serialize;

use crate::models::{EnrichedCluster, Host};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoverageSummary {
    pub total_clusters: usize,
    pub agent_connected_clusters: usize,
    pub runtime_enabled_clusters: usize,
    pub total_nodes: u64,
    pub nodes_connected: u64,
    pub node_coverage_percent: f64,
    pub total_hosts: usize,
    pub kubernetes_hosts: usize,
    pub connected_hosts: usize,
}

impl CoverageSummary {
    pub fn from_results(clusters: &[EnrichedCluster], hosts: &[Host]) -> Self {
        let total_nodes: u64 = clusters.iter().map(|c| u64::from(c.cluster.node_count)).sum();
        let nodes_connected: u64 = clusters.iter().map(|c| c.nodes_connected_count()).sum();
        let node_coverage_percent = if total_nodes == 0 {
            0.0
        } else {
            nodes_connected as f64 / total_nodes as f64 * 100.0
        };

        Self {
            total_clusters: clusters.len(),
            agent_connected_clusters: clusters.iter().filter(|c| c.cluster.agent_connected).count(),
            runtime_enabled_clusters: clusters.iter().filter(|c| c.runtime_enabled).count(),
            total_nodes,
            nodes_connected,
            node_coverage_percent,
            total_hosts: hosts.len(),
            kubernetes_hosts: hosts.iter().filter(|h| h.is_kubernetes_host).count(),
            connected_hosts: hosts.iter().filter(|h| h.connected).count(),
        }
    }
}
