//! Runtime-protection status per cluster

use crate::client::InventoryClient;
use crate::error::Result;
use crate::models::{RuntimeCluster, RuntimeResults};

/// Runtime workflow results endpoint
pub const RUNTIME_RESULTS_PATH: &str = "/api/scanning/runtime/v2/workflows/results";

/// Exact-match filter on the cluster name
pub fn runtime_filter(cluster_name: &str) -> String {
    format!("kubernetes.cluster.name = \"{}\"", cluster_name)
}

/// Only the match count matters, so one result is enough
pub fn runtime_query(cluster_name: &str) -> Vec<(&'static str, String)> {
    vec![
        ("filter", runtime_filter(cluster_name)),
        ("limit", "1".to_string()),
    ]
}

/// Runtime protection is enabled when at least one result matched
pub fn runtime_cluster(cluster_name: &str, results: &RuntimeResults) -> RuntimeCluster {
    RuntimeCluster {
        cluster_name: cluster_name.to_string(),
        is_enabled: results.page.matched > 0,
    }
}

/// Query runtime results for one cluster
pub async fn fetch_runtime_status(
    client: &InventoryClient,
    cluster_name: &str,
) -> Result<RuntimeCluster> {
    let results: RuntimeResults = client
        .get(RUNTIME_RESULTS_PATH, &runtime_query(cluster_name))
        .await?;
    Ok(runtime_cluster(cluster_name, &results))
}
