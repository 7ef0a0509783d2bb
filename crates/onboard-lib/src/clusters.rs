//! Cluster list and per-cluster agent status

use crate::client::InventoryClient;
use crate::error::Result;
use crate::models::{AgentData, AgentDetail, ClusterInfo};

/// Cluster data source endpoint
pub const CLUSTERS_PATH: &str = "/api/cloud/v2/dataSources/clusters";
/// Agent data source endpoint
pub const AGENTS_PATH: &str = "/api/cloud/v2/dataSources/agents";

/// Page size for agent lookups.
///
/// Fixed rather than derived from the cluster's node count; a cluster
/// reporting more agents than this gets its details truncated.
pub const AGENT_PAGE_LIMIT: u32 = 500;

/// Agent states that may represent a cluster in the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentStatus {
    AlmostOutOfDate,
    OutOfDate,
    UpToDate,
    Disconnected,
}

impl AgentStatus {
    /// States that count as an installed agent
    pub const ELIGIBLE: [AgentStatus; 4] = [
        AgentStatus::AlmostOutOfDate,
        AgentStatus::OutOfDate,
        AgentStatus::UpToDate,
        AgentStatus::Disconnected,
    ];

    /// Status string as sent by the API
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::AlmostOutOfDate => "Almost Out of Date",
            AgentStatus::OutOfDate => "Out of Date",
            AgentStatus::UpToDate => "Up to Date",
            AgentStatus::Disconnected => "Disconnected",
        }
    }

    /// Parse an API status string; `None` for transient or unknown states
    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ELIGIBLE.into_iter().find(|status| status.as_str() == value)
    }
}

/// Query for the cluster list; filter and connected are passed through verbatim
pub fn cluster_query(limit: u32, filter: &str, connected: &str) -> Vec<(&'static str, String)> {
    vec![
        ("limit", limit.to_string()),
        ("filter", filter.to_string()),
        ("connected", connected.to_string()),
    ]
}

/// Query for the agents of a single cluster
pub fn agent_query(cluster_name: &str, limit: u32) -> Vec<(&'static str, String)> {
    vec![
        ("filter", cluster_name.to_string()),
        ("limit", limit.to_string()),
        ("offset", "0".to_string()),
    ]
}

/// First detail, in source order, whose status is eligible
pub fn eligible_agent_detail(details: &[AgentDetail]) -> Option<&AgentDetail> {
    details
        .iter()
        .find(|detail| AgentStatus::from_wire(&detail.agent_status).is_some())
}

/// List clusters through the cluster data source
pub async fn fetch_clusters(
    client: &InventoryClient,
    limit: u32,
    filter: &str,
    connected: &str,
) -> Result<Vec<ClusterInfo>> {
    client
        .get(CLUSTERS_PATH, &cluster_query(limit, filter, connected))
        .await
}

/// Agent stats and details for one cluster
pub async fn fetch_agent_data(
    client: &InventoryClient,
    cluster_name: &str,
    limit: u32,
) -> Result<AgentData> {
    client.get(AGENTS_PATH, &agent_query(cluster_name, limit)).await
}
