//! Merges cluster, agent, runtime and host data into report records
//!
//! Cluster enrichment is all-or-nothing: every agent-connected cluster gets
//! one worker running its agent and runtime lookups concurrently, and a single
//! failed lookup fails the whole call once all workers have finished.
//! Host collection is best-effort: resources that fail to resolve are skipped.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::api::InventoryApi;
use crate::clusters::{eligible_agent_detail, AGENT_PAGE_LIMIT};
use crate::connectivity;
use crate::error::{Error, Result};
use crate::inventory;
use crate::models::{AgentData, ClusterInfo, EnrichedCluster, Host, RuntimeCluster};
use crate::observability::RunLogger;

/// Output of one cluster worker
struct ClusterLookup {
    index: usize,
    cluster_name: String,
    agent: Result<AgentData>,
    runtime: Result<RuntimeCluster>,
}

/// Drives every data source and merges their results
pub struct Enricher {
    api: Arc<dyn InventoryApi>,
    agent_page_limit: u32,
    logger: RunLogger,
}

impl Enricher {
    pub fn new(api: Arc<dyn InventoryApi>) -> Self {
        Self {
            api,
            agent_page_limit: AGENT_PAGE_LIMIT,
            logger: RunLogger::default(),
        }
    }

    pub fn with_logger(mut self, logger: RunLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_agent_page_limit(mut self, limit: u32) -> Self {
        self.agent_page_limit = limit;
        self
    }

    /// Base cluster list, filtered remotely
    pub async fn fetch_clusters(
        &self,
        limit: u32,
        filter: &str,
        connected: &str,
    ) -> Result<Vec<ClusterInfo>> {
        let clusters = self.api.get_clusters(limit, filter, connected).await?;
        let agent_connected = clusters.iter().filter(|c| c.agent_connected).count();
        self.logger.log_clusters_fetched(clusters.len(), agent_connected);
        Ok(clusters)
    }

    /// Enrich every cluster, in input order.
    ///
    /// Clusters without a connected agent are never looked up and keep the
    /// default enrichment values.
    pub async fn enrich_clusters(&self, clusters: Vec<ClusterInfo>) -> Result<Vec<EnrichedCluster>> {
        let mut workers = JoinSet::new();

        for (index, cluster) in clusters.iter().enumerate() {
            if !cluster.agent_connected {
                continue;
            }
            if cluster.node_count > self.agent_page_limit {
                self.logger
                    .log_agent_limit_exceeded(&cluster.name, cluster.node_count, self.agent_page_limit);
            }

            let api = Arc::clone(&self.api);
            let cluster_name = cluster.name.clone();
            let limit = self.agent_page_limit;
            workers.spawn(async move {
                let (agent, runtime) = tokio::join!(
                    api.get_agent_data(&cluster_name, limit),
                    api.get_runtime_status(&cluster_name)
                );
                ClusterLookup {
                    index,
                    cluster_name,
                    agent,
                    runtime,
                }
            });
        }

        let mut lookups: HashMap<usize, (AgentData, RuntimeCluster)> = HashMap::new();
        let mut failures = Vec::new();

        while let Some(joined) = workers.join_next().await {
            let lookup = match joined {
                Ok(lookup) => lookup,
                Err(e) => {
                    failures.push(Error::Worker(e.to_string()));
                    continue;
                }
            };

            match (lookup.agent, lookup.runtime) {
                (Ok(agent), Ok(runtime)) => {
                    lookups.insert(lookup.index, (agent, runtime));
                }
                (agent, runtime) => {
                    if let Err(e) = agent {
                        failures.push(Error::cluster_lookup(&lookup.cluster_name, "agent", e));
                    }
                    if let Err(e) = runtime {
                        failures.push(Error::cluster_lookup(&lookup.cluster_name, "runtime", e));
                    }
                }
            }
        }

        if !failures.is_empty() {
            for failure in &failures {
                self.logger.log_cluster_lookup_failed(failure);
            }
            return Err(failures.swap_remove(0));
        }

        let enriched = clusters
            .into_iter()
            .enumerate()
            .map(|(index, cluster)| {
                let lookup = lookups.remove(&index);
                let merged = merge_cluster(
                    cluster,
                    lookup.as_ref().map(|(agent, _)| agent),
                    lookup.as_ref().map(|(_, runtime)| runtime),
                );
                self.logger.log_cluster_enriched(&merged);
                merged
            })
            .collect();

        Ok(enriched)
    }

    /// Discover hosts, resolve them and mark the ones with a live agent
    pub async fn collect_hosts(&self, page_size: u32) -> Result<Vec<Host>> {
        let entries = inventory::list_inventory(self.api.as_ref(), page_size).await?;
        let resources = inventory::resolve_resources(self.api.as_ref(), &entries).await;

        let connected = self.api.get_connected_agents().await?;
        let identities = connectivity::machine_ids(&connected.agents);

        let hosts: Vec<Host> = resources
            .iter()
            .map(|resource| connectivity::to_host(resource, &identities))
            .collect();

        let live = hosts.iter().filter(|host| host.connected).count();
        self.logger.log_hosts_resolved(entries.len(), resources.len(), live);

        Ok(hosts)
    }
}

/// Default every enrichment field, then override from the sources that produced data
pub fn merge_cluster(
    cluster: ClusterInfo,
    agent: Option<&AgentData>,
    runtime: Option<&RuntimeCluster>,
) -> EnrichedCluster {
    let mut enriched = EnrichedCluster::defaulted(cluster);

    if let Some(agent) = agent {
        if !agent.agent_stats.is_empty() {
            enriched.nodes_connected = agent.agent_stats.total_count.to_string();
        }
        if let Some(detail) = eligible_agent_detail(&agent.details) {
            enriched.agent_status = detail.agent_status.clone();
            enriched.agent_version = detail.agent_version.clone();
        }
    }

    if let Some(runtime) = runtime {
        enriched.runtime_enabled = runtime.is_enabled;
    }

    enriched
}
