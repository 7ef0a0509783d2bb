//! Data shapes returned by the inventory API and the merged report records

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Placeholder written when a lookup produced no value
pub const NOT_AVAILABLE: &str = "N/A";

/// Reads an explicit JSON `null` as the type's default value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A managed cluster as listed by the cluster data source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterInfo {
    #[serde(rename = "customerID")]
    pub customer_id: i64,
    #[serde(rename = "accountID", deserialize_with = "null_as_default")]
    pub account_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub provider: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region: String,
    pub agent_connected: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    pub node_count: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub cluster_resource_group: String,
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
}

/// Agent data scoped to a single cluster
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentData {
    #[serde(deserialize_with = "null_as_default")]
    pub agent_stats: AgentStats,
    #[serde(deserialize_with = "null_as_default")]
    pub details: Vec<AgentDetail>,
}

/// Agent totals by freshness bucket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentStats {
    pub almost_out_of_date_count: u32,
    pub out_of_date_count: u32,
    pub disconnected_count: u32,
    pub healthy_count: u32,
    pub never_connected: u32,
    pub unknown: u32,
    pub total_containerised_count: u32,
    pub total_count: u32,
}

impl AgentStats {
    /// True when the API sent no stats at all (every counter zero)
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One agent reported for a cluster
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentDetail {
    #[serde(deserialize_with = "null_as_default")]
    pub agent_status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub agent_version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub agent_last_seen: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cluster_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub deployment_type: String,
    pub containerised: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub labels: HashMap<String, String>,
}

/// Paging block of the runtime results endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    pub returned: u32,
    pub matched: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeResult {
    #[serde(deserialize_with = "null_as_default")]
    pub hash_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub result_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub policy_evaluations_result: String,
}

/// Raw runtime results page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeResults {
    #[serde(deserialize_with = "null_as_default")]
    pub page: Page,
    #[serde(deserialize_with = "null_as_default")]
    pub data: Vec<RuntimeResult>,
}

/// Whether runtime protection is active for a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeCluster {
    pub cluster_name: String,
    pub is_enabled: bool,
}

/// One page of the host inventory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryPage {
    #[serde(deserialize_with = "null_as_default")]
    pub data: Vec<InventoryEntry>,
    pub total_count: u32,
}

/// Reference to a discovered host resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hash: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

/// Account placement of a cloud resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ResourceMetadata {
    #[serde(deserialize_with = "null_as_default")]
    pub account: String,
    #[serde(deserialize_with = "null_as_default")]
    pub organization: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region: String,
}

/// Envelope of the resource-by-hash endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CloudResourceEnvelope {
    pub data: CloudResourceRecord,
}

/// Resource as sent by the API, configuration still encoded
///
/// `configuration` is a JSON string whose contents are themselves JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudResourceRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hash: String,
    #[serde(deserialize_with = "null_as_default")]
    pub platform: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub resource_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub labels: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: ResourceMetadata,
    pub configuration: serde_json::Value,
}

/// Fully resolved host resource
#[derive(Debug, Clone, Default)]
pub struct CloudResource {
    pub id: String,
    pub name: String,
    pub hash: String,
    pub labels: Vec<String>,
    pub metadata: ResourceMetadata,
    pub configuration: InstanceConfiguration,
}

/// Decoded instance configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct InstanceConfiguration {
    #[serde(deserialize_with = "null_as_default")]
    pub instance_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub instance_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_id: String,
    pub launch_time: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub private_ip_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub vpc_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subnet_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub network_interfaces: Vec<NetworkInterface>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NetworkInterface {
    #[serde(deserialize_with = "null_as_default")]
    pub mac_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub network_interface_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub private_ip_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
}

/// Response of the connected agents endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectedAgents {
    pub total: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub agents: Vec<ConnectedAgent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectedAgent {
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub machine_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub host_name: String,
    pub connected: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
}

/// A cluster plus everything learned about its agents and runtime protection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedCluster {
    pub cluster: ClusterInfo,
    pub nodes_connected: String,
    pub agent_status: String,
    pub agent_version: String,
    pub runtime_enabled: bool,
}

impl EnrichedCluster {
    /// Record with every enrichment field at its default
    pub fn defaulted(cluster: ClusterInfo) -> Self {
        Self {
            cluster,
            nodes_connected: "0".to_string(),
            agent_status: NOT_AVAILABLE.to_string(),
            agent_version: NOT_AVAILABLE.to_string(),
            runtime_enabled: false,
        }
    }

    /// Connected node count, zero when unparseable
    pub fn nodes_connected_count(&self) -> u64 {
        self.nodes_connected.parse().unwrap_or(0)
    }
}

/// A host from the inventory, correlated with live agents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Host {
    pub name: String,
    pub account: String,
    pub organization: String,
    pub region: String,
    pub is_kubernetes_host: bool,
    pub cluster_name: String,
    pub node_group: String,
    pub connected: bool,
}
