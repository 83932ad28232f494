//! Network file shares and the actions that act on them

use crate::api::{add_options, require_non_empty, Client, ListOptions, Response, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::actions::{action_request, Action, ActionRequest, ActionRoot};

const NFS_PATH: &str = "/v2/nfs";

pub const NFS_SHARE_CREATING: &str = "CREATING";
pub const NFS_SHARE_ACTIVE: &str = "ACTIVE";
pub const NFS_SHARE_FAILED: &str = "FAILED";
pub const NFS_SHARE_DELETED: &str = "DELETED";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NfsShare {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size_gib: u64,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub vpc_ids: Vec<String>,
    #[serde(default)]
    pub user_id: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NfsCreateRequest {
    pub name: String,
    pub size_gib: u64,
    pub region: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vpc_ids: Vec<String>,
    pub user_id: u64,
}

#[derive(Serialize)]
struct RegionFilter<'a> {
    #[serde(flatten)]
    list: &'a ListOptions,
    #[serde(skip_serializing_if = "str::is_empty")]
    region: &'a str,
}

#[derive(Deserialize)]
struct ShareRoot {
    share: NfsShare,
}

#[derive(Deserialize)]
struct SharesRoot {
    #[serde(default)]
    shares: Vec<NfsShare>,
}

pub struct NfsService<'a> {
    client: &'a Client,
}

impl<'a> NfsService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Shares in `region`, or in every region when it is empty.
    pub async fn list(&self, opts: &ListOptions, region: &str) -> Result<(Vec<NfsShare>, Response)> {
        let path = add_options(NFS_PATH, &RegionFilter { list: opts, region })?;
        let (root, resp): (SharesRoot, _) = self.client.get(&path).await?;
        Ok((root.shares, resp))
    }

    pub async fn get(&self, id: &str) -> Result<(NfsShare, Response)> {
        let path = share_path(id)?;
        let (root, resp): (ShareRoot, _) = self.client.get(&path).await?;
        Ok((root.share, resp))
    }

    pub async fn create(&self, req: &NfsCreateRequest) -> Result<(NfsShare, Response)> {
        let (root, resp): (ShareRoot, _) = self.client.post(NFS_PATH, req).await?;
        Ok((root.share, resp))
    }

    pub async fn delete(&self, id: &str) -> Result<Response> {
        let path = share_path(id)?;
        self.client.delete(&path).await
    }
}

pub struct NfsActionsService<'a> {
    client: &'a Client,
}

impl<'a> NfsActionsService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Grow the share to `size_gib`.
    pub async fn resize(&self, share_id: &str, size_gib: u64, region: &str) -> Result<(Action, Response)> {
        let mut req = action_request("resize");
        req.insert("region".to_string(), Value::from(region));
        req.insert("size".to_string(), Value::from(size_gib));
        self.perform(share_id, &req).await
    }

    pub async fn snapshot(
        &self,
        share_id: &str,
        snapshot_name: &str,
        region: &str,
    ) -> Result<(Action, Response)> {
        let mut req = action_request("snapshot");
        req.insert("name".to_string(), Value::from(snapshot_name));
        req.insert("region".to_string(), Value::from(region));
        self.perform(share_id, &req).await
    }

    async fn perform(&self, share_id: &str, req: &ActionRequest) -> Result<(Action, Response)> {
        let path = format!("{}/actions", share_path(share_id)?);
        let (root, resp): (ActionRoot, _) = self.client.post(&path, req).await?;
        Ok((root.action, resp))
    }
}

fn share_path(id: &str) -> Result<String> {
    require_non_empty("id", id)?;
    Ok(format!("{}/{}", NFS_PATH, urlencoding::encode(id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_region_filter() {
        let opts = ListOptions {
            page: 2,
            ..Default::default()
        };
        let path = add_options(NFS_PATH, &RegionFilter { list: &opts, region: "atl1" }).unwrap();
        assert_eq!(path, "/v2/nfs?page=2&region=atl1");

        let path = add_options(NFS_PATH, &RegionFilter { list: &opts, region: "" }).unwrap();
        assert_eq!(path, "/v2/nfs?page=2");
    }

    #[test]
    fn test_create_omits_empty_vpcs() {
        let req = NfsCreateRequest {
            name: "test-nfs-share".to_string(),
            size_gib: 50,
            region: "atl1".to_string(),
            ..Default::default()
        };
        let body = serde_json::to_value(&req).unwrap();
        assert!(body.get("vpc_ids").is_none());
        assert_eq!(body["size_gib"], 50);
    }

    #[test]
    fn test_share_path_rejects_empty() {
        let err = share_path("").unwrap_err();
        assert_eq!(err.to_string(), "id is invalid because cannot be empty");
    }
}
