//! In-memory `InventoryApi` used by the pipeline tests

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::InventoryApi;
use crate::error::{Error, Result};
use crate::models::{
    AgentData, AgentDetail, AgentStats, CloudResourceRecord, ClusterInfo, ConnectedAgent,
    ConnectedAgents, InstanceConfiguration, InventoryEntry, InventoryPage, NetworkInterface,
    RuntimeCluster,
};

#[derive(Default)]
pub struct MockApi {
    clusters: Vec<ClusterInfo>,
    agent_data: HashMap<String, AgentData>,
    runtime_matched: HashMap<String, u32>,
    failing_agent: HashSet<String>,
    failing_runtime: HashSet<String>,
    inventory_pages: Vec<usize>,
    inventory_total: Option<u32>,
    endless_inventory: Option<usize>,
    resources: HashMap<String, CloudResourceRecord>,
    connected: Vec<String>,
    calls: Mutex<Vec<String>>,
}

fn failure(endpoint: &str, status: u16) -> Error {
    Error::Api {
        url: format!("mock://{}", endpoint),
        status,
    }
}

pub fn cluster(name: &str, agent_connected: bool) -> ClusterInfo {
    ClusterInfo {
        name: name.to_string(),
        provider: "AWS".to_string(),
        agent_connected,
        node_count: 3,
        ..Default::default()
    }
}

pub fn agent_data(total: u32, details: &[(&str, &str)]) -> AgentData {
    AgentData {
        agent_stats: AgentStats {
            total_count: total,
            ..Default::default()
        },
        details: details
            .iter()
            .map(|(status, version)| AgentDetail {
                agent_status: status.to_string(),
                agent_version: version.to_string(),
                ..Default::default()
            })
            .collect(),
    }
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clusters(mut self, clusters: Vec<ClusterInfo>) -> Self {
        self.clusters = clusters;
        self
    }

    pub fn with_agent_data(mut self, cluster: &str, data: AgentData) -> Self {
        self.agent_data.insert(cluster.to_string(), data);
        self
    }

    pub fn with_runtime_matched(mut self, cluster: &str, matched: u32) -> Self {
        self.runtime_matched.insert(cluster.to_string(), matched);
        self
    }

    pub fn failing_agent(mut self, cluster: &str) -> Self {
        self.failing_agent.insert(cluster.to_string());
        self
    }

    pub fn failing_runtime(mut self, cluster: &str) -> Self {
        self.failing_runtime.insert(cluster.to_string());
        self
    }

    /// Page `n` (1-based) returns `sizes[n - 1]` entries; later pages are empty
    pub fn with_inventory_pages(mut self, sizes: &[usize]) -> Self {
        self.inventory_pages = sizes.to_vec();
        self
    }

    /// Override the reported `totalCount`; defaults to the sum of all pages
    pub fn with_inventory_total(mut self, total: u32) -> Self {
        self.inventory_total = Some(total);
        self
    }

    /// Every page returns `size` entries, whatever page number is asked for
    pub fn with_endless_inventory(mut self, size: usize) -> Self {
        self.endless_inventory = Some(size);
        self
    }

    pub fn with_resource(mut self, hash: &str, labels: &[&str], macs: &[&str]) -> Self {
        let configuration = InstanceConfiguration {
            instance_id: format!("i-{}", hash),
            network_interfaces: macs
                .iter()
                .map(|mac| NetworkInterface {
                    mac_address: mac.to_string(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };
        let encoded = serde_json::to_string(&configuration).unwrap();

        self.resources.insert(
            hash.to_string(),
            CloudResourceRecord {
                id: format!("id-{}", hash),
                name: format!("host-{}", hash),
                hash: hash.to_string(),
                labels: labels.iter().map(|l| l.to_string()).collect(),
                configuration: serde_json::Value::String(encoded),
                ..Default::default()
            },
        );
        self
    }

    pub fn with_malformed_resource(mut self, hash: &str) -> Self {
        self.resources.insert(
            hash.to_string(),
            CloudResourceRecord {
                hash: hash.to_string(),
                configuration: serde_json::Value::String("{\"NetworkInterfaces\": [".to_string()),
                ..Default::default()
            },
        );
        self
    }

    pub fn with_connected(mut self, machine_ids: &[&str]) -> Self {
        self.connected = machine_ids.iter().map(|id| id.to_string()).collect();
        self
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn calls_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| call.strip_prefix(prefix).map(str::to_string))
            .collect()
    }

    pub fn agent_lookups(&self) -> Vec<String> {
        self.calls_with_prefix("agent:")
    }

    pub fn runtime_lookups(&self) -> Vec<String> {
        self.calls_with_prefix("runtime:")
    }

    pub fn inventory_pages_requested(&self) -> Vec<u32> {
        self.calls_with_prefix("inventory:")
            .into_iter()
            .filter_map(|page| page.parse().ok())
            .collect()
    }
}

#[async_trait]
impl InventoryApi for MockApi {
    async fn get_clusters(
        &self,
        _limit: u32,
        _filter: &str,
        _connected: &str,
    ) -> Result<Vec<ClusterInfo>> {
        self.record("clusters".to_string());
        Ok(self.clusters.clone())
    }

    async fn get_agent_data(&self, cluster_name: &str, _limit: u32) -> Result<AgentData> {
        self.record(format!("agent:{}", cluster_name));
        if self.failing_agent.contains(cluster_name) {
            return Err(failure("agents", 500));
        }
        Ok(self.agent_data.get(cluster_name).cloned().unwrap_or_default())
    }

    async fn get_runtime_status(&self, cluster_name: &str) -> Result<RuntimeCluster> {
        self.record(format!("runtime:{}", cluster_name));
        if self.failing_runtime.contains(cluster_name) {
            return Err(failure("runtime", 500));
        }
        let matched = self.runtime_matched.get(cluster_name).copied().unwrap_or(0);
        Ok(RuntimeCluster {
            cluster_name: cluster_name.to_string(),
            is_enabled: matched > 0,
        })
    }

    async fn get_inventory_page(&self, page_number: u32, _page_size: u32) -> Result<InventoryPage> {
        self.record(format!("inventory:{}", page_number));
        let size = self.endless_inventory.unwrap_or_else(|| {
            (page_number as usize)
                .checked_sub(1)
                .and_then(|index| self.inventory_pages.get(index))
                .copied()
                .unwrap_or(0)
        });
        let total = self
            .inventory_total
            .unwrap_or_else(|| self.inventory_pages.iter().sum::<usize>() as u32);

        Ok(InventoryPage {
            data: (0..size)
                .map(|i| InventoryEntry {
                    id: format!("id-{}-{}", page_number, i),
                    hash: format!("page{}-{}", page_number, i),
                    name: format!("host-{}-{}", page_number, i),
                })
                .collect(),
            total_count: total,
        })
    }

    async fn get_resource(&self, hash: &str) -> Result<CloudResourceRecord> {
        self.record(format!("resource:{}", hash));
        self.resources
            .get(hash)
            .cloned()
            .ok_or_else(|| failure("resource", 404))
    }

    async fn get_connected_agents(&self) -> Result<ConnectedAgents> {
        self.record("connected".to_string());
        Ok(ConnectedAgents {
            total: self.connected.len() as u32,
            agents: self
                .connected
                .iter()
                .map(|id| ConnectedAgent {
                    machine_id: id.clone(),
                    connected: true,
                    ..Default::default()
                })
                .collect(),
        })
    }
}
