//! CSV report files for clusters and hosts

use anyhow::{Context, Result};
use onboard_lib::{EnrichedCluster, Host};
use serde::Serialize;
use std::path::Path;

const CLUSTER_HEADERS: [&str; 9] = [
    "name",
    "node_count",
    "agent_connected",
    "nodes_connected",
    "agent_status",
    "agent_version",
    "provider",
    "environment",
    "runtime_enabled",
];

const HOST_HEADERS: [&str; 8] = [
    "name",
    "account",
    "organization",
    "region",
    "is_kubernetes_host",
    "cluster_name",
    "nodegroup_name",
    "connected",
];

#[derive(Serialize)]
struct ClusterRow<'a> {
    name: &'a str,
    node_count: u32,
    agent_connected: bool,
    nodes_connected: &'a str,
    agent_status: &'a str,
    agent_version: &'a str,
    provider: &'a str,
    environment: &'static str,
    runtime_enabled: bool,
}

impl<'a> From<&'a EnrichedCluster> for ClusterRow<'a> {
    fn from(enriched: &'a EnrichedCluster) -> Self {
        Self {
            name: &enriched.cluster.name,
            node_count: enriched.cluster.node_count,
            agent_connected: enriched.cluster.agent_connected,
            nodes_connected: &enriched.nodes_connected,
            agent_status: &enriched.agent_status,
            agent_version: &enriched.agent_version,
            provider: &enriched.cluster.provider,
            environment: environment(&enriched.cluster.name),
            runtime_enabled: enriched.runtime_enabled,
        }
    }
}

#[derive(Serialize)]
struct HostRow<'a> {
    name: &'a str,
    account: &'a str,
    organization: &'a str,
    region: &'a str,
    is_kubernetes_host: bool,
    cluster_name: &'a str,
    nodegroup_name: &'a str,
    connected: bool,
}

impl<'a> From<&'a Host> for HostRow<'a> {
    fn from(host: &'a Host) -> Self {
        Self {
            name: &host.name,
            account: &host.account,
            organization: &host.organization,
            region: &host.region,
            is_kubernetes_host: host.is_kubernetes_host,
            cluster_name: &host.cluster_name,
            nodegroup_name: &host.node_group,
            connected: host.connected,
        }
    }
}

/// Environment encoded in the 4th character of the cluster name
pub fn environment(cluster_name: &str) -> &'static str {
    match cluster_name.chars().nth(3) {
        Some('d') => "development",
        Some('p') => "production",
        Some('i') => "pre-production",
        _ => "unknown",
    }
}

pub fn write_clusters(path: &Path, clusters: &[EnrichedCluster]) -> Result<()> {
    write_rows(path, &CLUSTER_HEADERS, clusters.iter().map(ClusterRow::from))
}

pub fn write_hosts(path: &Path, hosts: &[Host]) -> Result<()> {
    write_rows(path, &HOST_HEADERS, hosts.iter().map(HostRow::from))
}

/// Header is written even when there are no rows
fn write_rows<T, I>(path: &Path, headers: &[&str], rows: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer
        .write_record(headers)
        .with_context(|| format!("Failed to write header to {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_lib::ClusterInfo;
    use tempfile::TempDir;

    #[test]
    fn test_environment_from_name() {
        assert_eq!(environment("eksd-sandbox"), "development");
        assert_eq!(environment("eksp-payments"), "production");
        assert_eq!(environment("eksi-staging"), "pre-production");
        assert_eq!(environment("eksx-lab"), "unknown");
        assert_eq!(environment("eks"), "unknown");
    }

    #[test]
    fn test_write_clusters() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clusters.csv");
        let mut enriched = EnrichedCluster::defaulted(ClusterInfo {
            name: "eksp-payments".to_string(),
            provider: "AWS".to_string(),
            agent_connected: true,
            node_count: 4,
            ..Default::default()
        });
        enriched.nodes_connected = "3".to_string();
        enriched.agent_status = "Up to Date".to_string();
        enriched.agent_version = "13.2.0".to_string();
        enriched.runtime_enabled = true;

        write_clusters(&path, &[enriched]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "name,node_count,agent_connected,nodes_connected,agent_status,agent_version,provider,environment,runtime_enabled"
        );
        assert_eq!(lines[1], "eksp-payments,4,true,3,Up to Date,13.2.0,AWS,production,true");
    }

    #[test]
    fn test_write_hosts_with_no_rows_keeps_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hosts.csv");

        write_hosts(&path, &[]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content.trim_end(),
            "name,account,organization,region,is_kubernetes_host,cluster_name,nodegroup_name,connected"
        );
    }

    #[test]
    fn test_write_hosts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hosts.csv");
        let host = Host {
            name: "ip-10-0-1-1".to_string(),
            account: "123456789012".to_string(),
            organization: "acme".to_string(),
            region: "us-east-1".to_string(),
            is_kubernetes_host: true,
            cluster_name: "eksp-payments".to_string(),
            node_group: "ng-1".to_string(),
            connected: false,
        };

        write_hosts(&path, &[host]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content.lines().nth(1),
            Some("ip-10-0-1-1,123456789012,acme,us-east-1,true,eksp-payments,ng-1,false")
        );
    }
}
