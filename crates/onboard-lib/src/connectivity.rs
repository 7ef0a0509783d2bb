//! Matches inventory hosts against currently connected agents

use crate::client::InventoryClient;
use crate::error::Result;
use crate::inventory;
use crate::models::{CloudResource, ConnectedAgent, ConnectedAgents, Host};

/// Connected agents endpoint
pub const CONNECTED_AGENTS_PATH: &str = "/api/agents/connected";

/// Fetch every agent currently connected
pub async fn fetch_connected_agents(client: &InventoryClient) -> Result<ConnectedAgents> {
    client.get(CONNECTED_AGENTS_PATH, &[]).await
}

/// Machine identities (MAC addresses) of the connected agents
pub fn machine_ids(agents: &[ConnectedAgent]) -> Vec<String> {
    agents.iter().map(|agent| agent.machine_id.clone()).collect()
}

/// True iff any interface MAC exactly matches a connected identity
pub fn is_connected(resource: &CloudResource, identities: &[String]) -> bool {
    resource
        .configuration
        .network_interfaces
        .iter()
        .any(|interface| identities.iter().any(|id| *id == interface.mac_address))
}

/// Build the host record for a resolved resource
pub fn to_host(resource: &CloudResource, identities: &[String]) -> Host {
    Host {
        name: resource.name.clone(),
        account: resource.metadata.account.clone(),
        organization: resource.metadata.organization.clone(),
        region: resource.metadata.region.clone(),
        is_kubernetes_host: inventory::is_kubernetes_host(&resource.labels),
        cluster_name: inventory::cluster_name_from_labels(&resource.labels),
        node_group: inventory::node_group_from_labels(&resource.labels),
        connected: is_connected(resource, identities),
    }
}
