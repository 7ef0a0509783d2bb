//! Host inventory discovery and per-resource configuration resolution
//!
//! The resource endpoint returns `configuration` as a JSON string whose
//! contents are the instance configuration JSON. Resolution is therefore a
//! two-stage decode: first to the inner text, then to
//! [`InstanceConfiguration`].

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::api::InventoryApi;
use crate::client::InventoryClient;
use crate::error::{Error, Result};
use crate::models::{
    CloudResource, CloudResourceEnvelope, CloudResourceRecord, InstanceConfiguration,
    InventoryEntry, InventoryPage, NOT_AVAILABLE,
};

/// Inventory listing endpoint
pub const INVENTORY_PATH: &str = "/api/cspm/v1/inventory/resources";
/// Resource-by-hash endpoint
pub const RESOURCE_PATH: &str = "/api/cspm/v1/cloud/resource";

/// Default inventory page size
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Inventory is restricted to host resources
pub const HOST_FILTER: &str = "type = \"EC2 Instance\"";
const INVENTORY_FIELDS: &str = "id,hash,name";
const RESOURCE_FIELDS: &str = "id,hash,name,platform,type,configuration,keyvalueconfigs,labels,lastseen,metadata,zones,posturepolicysummary,posturecontrolsummary,resourceorigin,category";

/// Label carrying the EKS cluster name
pub const CLUSTER_NAME_LABEL: &str = "eks:cluster-name";
/// Label carrying the EKS node group
pub const NODE_GROUP_LABEL: &str = "eks:nodegroup-name";

/// Query for one page of host resources
pub fn inventory_query(page_number: u32, page_size: u32) -> Vec<(&'static str, String)> {
    vec![
        ("pageNumber", page_number.to_string()),
        ("pageSize", page_size.to_string()),
        ("filter", HOST_FILTER.to_string()),
        ("fields", INVENTORY_FIELDS.to_string()),
    ]
}

/// Query for a single resource by hash
pub fn resource_query(hash: &str) -> Vec<(&'static str, String)> {
    vec![
        ("resourceHash", hash.to_string()),
        ("fields", RESOURCE_FIELDS.to_string()),
    ]
}

/// Fetch one inventory page
pub async fn fetch_inventory_page(
    client: &InventoryClient,
    page_number: u32,
    page_size: u32,
) -> Result<InventoryPage> {
    client
        .get(INVENTORY_PATH, &inventory_query(page_number, page_size))
        .await
}

/// Fetch a resource with its configuration still encoded
pub async fn fetch_resource(client: &InventoryClient, hash: &str) -> Result<CloudResourceRecord> {
    let envelope: CloudResourceEnvelope = client.get(RESOURCE_PATH, &resource_query(hash)).await?;
    Ok(envelope.data)
}

/// Upper bound on inventory pages fetched in one listing
pub const MAX_INVENTORY_PAGES: u32 = 1000;

/// Page through the host inventory starting at page 1.
///
/// Stops at the first page holding fewer entries than `page_size`, or once
/// the reported `totalCount` has been collected.
pub async fn list_inventory(api: &dyn InventoryApi, page_size: u32) -> Result<Vec<InventoryEntry>> {
    list_inventory_bounded(api, page_size, MAX_INVENTORY_PAGES).await
}

async fn list_inventory_bounded(
    api: &dyn InventoryApi,
    page_size: u32,
    max_pages: u32,
) -> Result<Vec<InventoryEntry>> {
    let page_size = page_size.max(1);
    let mut entries = Vec::new();
    let mut page_number = 1;

    loop {
        let page = api.get_inventory_page(page_number, page_size).await?;
        let returned = page.data.len();
        debug!(page_number, returned, total = page.total_count, "Fetched inventory page");
        entries.extend(page.data);

        if returned < page_size as usize {
            break;
        }
        // A zero total means the field was absent
        if page.total_count > 0 && entries.len() >= page.total_count as usize {
            break;
        }
        if page_number >= max_pages {
            warn!(
                event = "inventory_page_limit",
                pages = page_number,
                hosts = entries.len(),
                "Host inventory still returning full pages, stopping"
            );
            break;
        }
        page_number += 1;
    }

    info!(hosts = entries.len(), pages = page_number, "Host inventory listed");
    Ok(entries)
}

/// Decode a double-encoded configuration payload
pub fn decode_configuration(
    hash: &str,
    configuration: &serde_json::Value,
) -> Result<InstanceConfiguration> {
    let to_error = |source| Error::PartialResolution {
        hash: hash.to_string(),
        source,
    };

    let inner = String::deserialize(configuration).map_err(to_error)?;
    serde_json::from_str(&inner).map_err(to_error)
}

/// Fetch one resource and decode its configuration
pub async fn resolve_resource(api: &dyn InventoryApi, hash: &str) -> Result<CloudResource> {
    let record = api.get_resource(hash).await?;
    let configuration = decode_configuration(hash, &record.configuration)?;

    Ok(CloudResource {
        id: record.id,
        name: record.name,
        hash: record.hash,
        labels: record.labels,
        metadata: record.metadata,
        configuration,
    })
}

/// Resolve every entry, skipping the ones that fail
pub async fn resolve_resources(api: &dyn InventoryApi, entries: &[InventoryEntry]) -> Vec<CloudResource> {
    let mut resources = Vec::with_capacity(entries.len());

    for entry in entries {
        match resolve_resource(api, &entry.hash).await {
            Ok(resource) => resources.push(resource),
            Err(e) => {
                warn!(
                    event = "resource_skipped",
                    resource_hash = %entry.hash,
                    resource_name = %entry.name,
                    error = %e,
                    "Failed to resolve cloud resource, skipping"
                );
            }
        }
    }

    resources
}

/// Value of the first label containing `key`: the text after its last colon
pub fn label_value(labels: &[String], key: &str) -> Option<String> {
    labels
        .iter()
        .find(|label| label.contains(key))
        .and_then(|label| label.rsplit(':').next())
        .map(|value| value.trim().to_string())
}

/// Hosts carrying a cluster name label belong to a Kubernetes cluster
pub fn is_kubernetes_host(labels: &[String]) -> bool {
    labels.iter().any(|label| label.contains(CLUSTER_NAME_LABEL))
}

/// Cluster name label value, or `N/A`
pub fn cluster_name_from_labels(labels: &[String]) -> String {
    label_value(labels, CLUSTER_NAME_LABEL).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Node group label value, or `N/A`
pub fn node_group_from_labels(labels: &[String]) -> String {
    label_value(labels, NODE_GROUP_LABEL).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockApi;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_decode_double_encoded_configuration() {
        // The API sends the configuration as a string containing JSON
        let payload: serde_json::Value = serde_json::from_str(
            r#""{\"InstanceId\":\"i-0abc\",\"InstanceType\":\"m5.large\",\"NetworkInterfaces\":[{\"MacAddress\":\"0a:1b:2c:3d:4e:5f\",\"NetworkInterfaceId\":\"eni-1\"}]}""#,
        )
        .unwrap();

        let config = decode_configuration("hash-1", &payload).unwrap();
        assert_eq!(config.instance_id, "i-0abc");
        assert_eq!(config.instance_type, "m5.large");
        assert_eq!(config.network_interfaces.len(), 1);
        assert_eq!(config.network_interfaces[0].mac_address, "0a:1b:2c:3d:4e:5f");
    }

    #[test]
    fn test_decode_rejects_single_encoded_configuration() {
        let payload = serde_json::json!({ "InstanceId": "i-0abc" });
        let err = decode_configuration("hash-1", &payload).unwrap_err();
        assert!(matches!(err, Error::PartialResolution { ref hash, .. } if hash == "hash-1"));
    }

    #[test]
    fn test_decode_rejects_malformed_inner_json() {
        let payload = serde_json::Value::String("{not json".to_string());
        assert!(decode_configuration("hash-2", &payload).is_err());
    }

    #[test]
    fn test_label_parsing() {
        let tags = labels(&[
            "Name: worker",
            "eks:cluster-name: eksp-payments ",
            "eks:nodegroup-name:ng-general",
        ]);

        assert!(is_kubernetes_host(&tags));
        assert_eq!(cluster_name_from_labels(&tags), "eksp-payments");
        assert_eq!(node_group_from_labels(&tags), "ng-general");
    }

    #[test]
    fn test_label_parsing_missing_labels() {
        let tags = labels(&["Name: bastion", "team: platform"]);

        assert!(!is_kubernetes_host(&tags));
        assert_eq!(cluster_name_from_labels(&tags), NOT_AVAILABLE);
        assert_eq!(node_group_from_labels(&tags), NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn test_pagination_stops_on_short_page() {
        let api = MockApi::new().with_inventory_pages(&[500, 500, 200]);

        let entries = list_inventory(&api, 500).await.unwrap();

        assert_eq!(entries.len(), 1200);
        assert_eq!(api.inventory_pages_requested(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_pagination_single_short_page() {
        let api = MockApi::new().with_inventory_pages(&[3]);

        let entries = list_inventory(&api, 500).await.unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(api.inventory_pages_requested(), vec![1]);
    }

    #[tokio::test]
    async fn test_pagination_stops_at_reported_total() {
        let api = MockApi::new().with_inventory_pages(&[500, 500]);

        let entries = list_inventory(&api, 500).await.unwrap();

        assert_eq!(entries.len(), 1000);
        assert_eq!(api.inventory_pages_requested(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_pagination_ignored_page_number_stops_at_total() {
        let api = MockApi::new().with_endless_inventory(2).with_inventory_total(6);

        let entries = list_inventory(&api, 2).await.unwrap();

        assert_eq!(entries.len(), 6);
        assert_eq!(api.inventory_pages_requested(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_pagination_page_limit_without_total() {
        let api = MockApi::new().with_endless_inventory(2).with_inventory_total(0);

        let entries = list_inventory_bounded(&api, 2, 4).await.unwrap();

        assert_eq!(entries.len(), 8);
        assert_eq!(api.inventory_pages_requested(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_malformed_resource_is_skipped() {
        let api = MockApi::new()
            .with_resource("h1", &[], &["aa:aa"])
            .with_malformed_resource("h2")
            .with_resource("h3", &[], &["bb:bb"]);
        let entries: Vec<InventoryEntry> = ["h1", "h2", "h3"]
            .iter()
            .map(|hash| InventoryEntry {
                hash: hash.to_string(),
                ..Default::default()
            })
            .collect();

        let resources = resolve_resources(&api, &entries).await;

        let hashes: Vec<&str> = resources.iter().map(|r| r.hash.as_str()).collect();
        assert_eq!(hashes, vec!["h1", "h3"]);
    }
}
