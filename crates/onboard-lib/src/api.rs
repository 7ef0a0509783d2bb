//! The seam between the correlation pipeline and the remote inventory API

use async_trait::async_trait;

use crate::client::InventoryClient;
use crate::error::Result;
use crate::models::{
    AgentData, CloudResourceRecord, ClusterInfo, ConnectedAgents, InventoryPage, RuntimeCluster,
};
use crate::{clusters, connectivity, inventory, runtime};

/// One method per inventory API endpoint
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// Cluster list; filter and connected are remote predicates
    async fn get_clusters(&self, limit: u32, filter: &str, connected: &str)
        -> Result<Vec<ClusterInfo>>;

    /// Agent stats and details for one cluster
    async fn get_agent_data(&self, cluster_name: &str, limit: u32) -> Result<AgentData>;

    /// Runtime-protection status for one cluster
    async fn get_runtime_status(&self, cluster_name: &str) -> Result<RuntimeCluster>;

    /// One page of host inventory, 1-based
    async fn get_inventory_page(&self, page_number: u32, page_size: u32) -> Result<InventoryPage>;

    /// A resource by hash, configuration still double-encoded
    async fn get_resource(&self, hash: &str) -> Result<CloudResourceRecord>;

    /// Every agent currently connected
    async fn get_connected_agents(&self) -> Result<ConnectedAgents>;
}

#[async_trait]
impl InventoryApi for InventoryClient {
    async fn get_clusters(
        &self,
        limit: u32,
        filter: &str,
        connected: &str,
    ) -> Result<Vec<ClusterInfo>> {
        clusters::fetch_clusters(self, limit, filter, connected).await
    }

    async fn get_agent_data(&self, cluster_name: &str, limit: u32) -> Result<AgentData> {
        clusters::fetch_agent_data(self, cluster_name, limit).await
    }

    async fn get_runtime_status(&self, cluster_name: &str) -> Result<RuntimeCluster> {
        runtime::fetch_runtime_status(self, cluster_name).await
    }

    async fn get_inventory_page(&self, page_number: u32, page_size: u32) -> Result<InventoryPage> {
        inventory::fetch_inventory_page(self, page_number, page_size).await
    }

    async fn get_resource(&self, hash: &str) -> Result<CloudResourceRecord> {
        inventory::fetch_resource(self, hash).await
    }

    async fn get_connected_agents(&self) -> Result<ConnectedAgents> {
        connectivity::fetch_connected_agents(self).await
    }
}
