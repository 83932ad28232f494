//! Bring-your-own-IP prefixes

use crate::api::{add_options, require_non_empty, Client, ListOptions, Response, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const BYOIP_PATH: &str = "/v2/byoip_prefixes";

/// An IP prefix imported into the account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ByoipPrefix {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub validations: Vec<serde_json::Value>,
    #[serde(default)]
    pub failure_reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByoipCreateRequest {
    pub prefix: String,
    /// Signed proof of ownership of the prefix
    pub signature: String,
    pub region: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByoipCreateResponse {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub status: String,
}

/// An address of a prefix assigned to a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ByoipResource {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub byoip: String,
    #[serde(default)]
    pub resource: String,
    #[serde(default)]
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct ByoipRoot {
    byoip_prefix: ByoipPrefix,
}

#[derive(Deserialize)]
struct ByoipsRoot {
    #[serde(default)]
    byoip_prefixes: Vec<ByoipPrefix>,
}

#[derive(Deserialize)]
struct ByoipResourcesRoot {
    #[serde(default)]
    ips: Vec<ByoipResource>,
}

pub struct ByoipService<'a> {
    client: &'a Client,
}

impl<'a> ByoipService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, opts: &ListOptions) -> Result<(Vec<ByoipPrefix>, Response)> {
        let path = add_options(BYOIP_PATH, opts)?;
        let (root, resp): (ByoipsRoot, _) = self.client.get(&path).await?;
        Ok((root.byoip_prefixes, resp))
    }

    pub async fn get(&self, uuid: &str) -> Result<(ByoipPrefix, Response)> {
        let path = prefix_path(uuid)?;
        let (root, resp): (ByoipRoot, _) = self.client.get(&path).await?;
        Ok((root.byoip_prefix, resp))
    }

    /// Addresses of the prefix and the resources they are assigned to.
    pub async fn get_resources(
        &self,
        uuid: &str,
        opts: &ListOptions,
    ) -> Result<(Vec<ByoipResource>, Response)> {
        let path = add_options(&format!("{}/ips", prefix_path(uuid)?), opts)?;
        let (root, resp): (ByoipResourcesRoot, _) = self.client.get(&path).await?;
        Ok((root.ips, resp))
    }

    /// Start importing a prefix. The returned status tracks validation.
    pub async fn create(&self, req: &ByoipCreateRequest) -> Result<(ByoipCreateResponse, Response)> {
        self.client.post(BYOIP_PATH, req).await
    }

    pub async fn delete(&self, uuid: &str) -> Result<Response> {
        let path = prefix_path(uuid)?;
        self.client.delete(&path).await
    }
}

fn prefix_path(uuid: &str) -> Result<String> {
    require_non_empty("uuid", uuid)?;
    Ok(format!("{}/{}", BYOIP_PATH, urlencoding::encode(uuid)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prefix_path() {
        assert_eq!(prefix_path("f00b8f53").unwrap(), "/v2/byoip_prefixes/f00b8f53");
        assert_eq!(
            prefix_path("").unwrap_err().to_string(),
            "uuid is invalid because cannot be empty"
        );
    }

    #[test]
    fn test_prefix_decode() {
        let root: ByoipRoot = serde_json::from_value(json!({
            "byoip_prefix": {
                "uuid": "f00b8f53",
                "prefix": "10.10.10.0/24",
                "status": "active",
                "region": "nyc1",
                "validations": []
            }
        }))
        .unwrap();
        assert_eq!(root.byoip_prefix.prefix, "10.10.10.0/24");
        assert!(root.byoip_prefix.failure_reason.is_empty());
    }

    #[test]
    fn test_create_request_body() {
        let req = ByoipCreateRequest {
            prefix: "10.10.10.0/24".to_string(),
            signature: "sig".to_string(),
            region: "nyc1".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"prefix": "10.10.10.0/24", "signature": "sig", "region": "nyc1"})
        );
    }
}
