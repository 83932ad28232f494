//! Snapshots of droplets and volumes

use crate::api::{add_options, require_non_empty, Client, ListOptions, Response, Result};
use serde::{Deserialize, Serialize};

const SNAPSHOTS_PATH: &str = "/v2/snapshots";

/// A saved image of a droplet or volume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub resource_id: String,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub min_disk_size: u64,
    #[serde(default)]
    pub size_gigabytes: f64,
    #[serde(rename = "created_at", default)]
    pub created: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
struct SnapshotRoot {
    snapshot: Snapshot,
}

#[derive(Deserialize)]
struct SnapshotsRoot {
    #[serde(default)]
    snapshots: Vec<Snapshot>,
}

#[derive(Serialize)]
struct ResourceTypeFilter<'a> {
    #[serde(flatten)]
    list: &'a ListOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    resource_type: Option<&'a str>,
}

pub struct SnapshotsService<'a> {
    client: &'a Client,
}

impl<'a> SnapshotsService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List all snapshots.
    pub async fn list(&self, opts: &ListOptions) -> Result<(Vec<Snapshot>, Response)> {
        self.list_by_type(opts, None).await
    }

    /// List snapshots of droplets.
    pub async fn list_droplet(&self, opts: &ListOptions) -> Result<(Vec<Snapshot>, Response)> {
        self.list_by_type(opts, Some("droplet")).await
    }

    /// List snapshots of volumes.
    pub async fn list_volume(&self, opts: &ListOptions) -> Result<(Vec<Snapshot>, Response)> {
        self.list_by_type(opts, Some("volume")).await
    }

    async fn list_by_type(
        &self,
        opts: &ListOptions,
        resource_type: Option<&str>,
    ) -> Result<(Vec<Snapshot>, Response)> {
        let filter = ResourceTypeFilter {
            list: opts,
            resource_type,
        };
        let path = add_options(SNAPSHOTS_PATH, &filter)?;
        let (root, resp): (SnapshotsRoot, _) = self.client.get(&path).await?;
        Ok((root.snapshots, resp))
    }

    pub async fn get(&self, id: &str) -> Result<(Snapshot, Response)> {
        require_non_empty("id", id)?;
        let path = format!("{}/{}", SNAPSHOTS_PATH, id);
        let (root, resp): (SnapshotRoot, _) = self.client.get(&path).await?;
        Ok((root.snapshot, resp))
    }

    pub async fn delete(&self, id: &str) -> Result<Response> {
        require_non_empty("id", id)?;
        let path = format!("{}/{}", SNAPSHOTS_PATH, id);
        self.client.delete(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_filter() {
        let opts = ListOptions::new(2, 0);
        let filter = ResourceTypeFilter {
            list: &opts,
            resource_type: Some("volume"),
        };
        assert_eq!(
            add_options(SNAPSHOTS_PATH, &filter).unwrap(),
            "/v2/snapshots?page=2&resource_type=volume"
        );

        let unfiltered = ResourceTypeFilter {
            list: &opts,
            resource_type: None,
        };
        assert_eq!(add_options(SNAPSHOTS_PATH, &unfiltered).unwrap(), "/v2/snapshots?page=2");
    }

    #[test]
    fn test_snapshot_created_at() {
        let snapshot: Snapshot = serde_json::from_value(serde_json::json!({
            "id": "6372321",
            "name": "web-01-1595954862243",
            "created_at": "2020-07-28T16:47:44Z",
            "resource_type": "droplet",
            "min_disk_size": 25,
            "size_gigabytes": 2.34
        }))
        .unwrap();
        assert_eq!(snapshot.created, "2020-07-28T16:47:44Z");
        assert_eq!(snapshot.min_disk_size, 25);
    }
}
