//! Access keys for Spaces object storage

use crate::api::{add_options, require_non_empty, Client, ListOptions, Response, Result};
use serde::{Deserialize, Serialize};

const SPACES_KEYS_PATH: &str = "/v2/spaces/keys";

/// Access level a key has on a bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    #[default]
    Read,
    #[serde(rename = "readwrite")]
    ReadWrite,
    #[serde(rename = "fullaccess")]
    FullAccess,
}

/// Permission on one bucket. An empty bucket with full access covers all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub permission: Permission,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacesKey {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub access_key: String,
    /// Only returned when the key is created
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub grants: Vec<Grant>,
    #[serde(default)]
    pub created_at: String,
}

/// Body of both create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpacesKeyRequest {
    pub name: String,
    pub grants: Vec<Grant>,
}

#[derive(Deserialize)]
struct KeyRoot {
    key: SpacesKey,
}

#[derive(Deserialize)]
struct KeysRoot {
    #[serde(default)]
    keys: Vec<SpacesKey>,
}

pub struct SpacesKeysService<'a> {
    client: &'a Client,
}

impl<'a> SpacesKeysService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, opts: &ListOptions) -> Result<(Vec<SpacesKey>, Response)> {
        let path = add_options(SPACES_KEYS_PATH, opts)?;
        let (root, resp): (KeysRoot, _) = self.client.get(&path).await?;
        Ok((root.keys, resp))
    }

    pub async fn create(&self, req: &SpacesKeyRequest) -> Result<(SpacesKey, Response)> {
        let (root, resp): (KeyRoot, _) = self.client.post(SPACES_KEYS_PATH, req).await?;
        Ok((root.key, resp))
    }

    pub async fn update(&self, access_key: &str, req: &SpacesKeyRequest) -> Result<(SpacesKey, Response)> {
        let path = key_path(access_key)?;
        let (root, resp): (KeyRoot, _) = self.client.put(&path, req).await?;
        Ok((root.key, resp))
    }

    pub async fn delete(&self, access_key: &str) -> Result<Response> {
        let path = key_path(access_key)?;
        self.client.delete(&path).await
    }
}

fn key_path(access_key: &str) -> Result<String> {
    require_non_empty("accessKey", access_key)?;
    Ok(format!("{}/{}", SPACES_KEYS_PATH, urlencoding::encode(access_key)))
}
