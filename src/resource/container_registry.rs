//! Container registry: the account's private Docker registry

use crate::api::{add_options, require_non_empty, Client, ListOptions, Response, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const REGISTRY_PATH: &str = "/v2/registry";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub storage_usage_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_usage_bytes_updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub region: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistryCreateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subscription_tier_slug: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub region: String,
}

/// Options for a Docker credentials file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryDockerCredentialsRequest {
    /// Grant push access as well as pull
    pub read_write: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_seconds: Option<u64>,
}

/// A Docker `config.json`, as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DockerCredentials {
    pub docker_config_json: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub registry_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_tag: Option<RepositoryTag>,
    #[serde(default)]
    pub tag_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryTag {
    #[serde(default)]
    pub registry_name: String,
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub manifest_digest: String,
    #[serde(default)]
    pub compressed_size_bytes: u64,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct RegistryRoot {
    registry: Registry,
}

#[derive(Deserialize)]
struct RepositoriesRoot {
    #[serde(default)]
    repositories: Vec<Repository>,
}

#[derive(Deserialize)]
struct TagsRoot {
    #[serde(default)]
    tags: Vec<RepositoryTag>,
}

pub struct RegistryService<'a> {
    client: &'a Client,
}

impl<'a> RegistryService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn get(&self) -> Result<(Registry, Response)> {
        let (root, resp): (RegistryRoot, _) = self.client.get(REGISTRY_PATH).await?;
        Ok((root.registry, resp))
    }

    pub async fn create(&self, req: &RegistryCreateRequest) -> Result<(Registry, Response)> {
        let (root, resp): (RegistryRoot, _) = self.client.post(REGISTRY_PATH, req).await?;
        Ok((root.registry, resp))
    }

    pub async fn delete(&self) -> Result<Response> {
        self.client.delete(REGISTRY_PATH).await
    }

    /// Docker credentials for the registry. The body is returned as-is.
    pub async fn docker_credentials(
        &self,
        req: &RegistryDockerCredentialsRequest,
    ) -> Result<(DockerCredentials, Response)> {
        let path = add_options(&format!("{}/docker-credentials", REGISTRY_PATH), req)?;
        let (body, resp) = self.client.get_raw(&path).await?;
        Ok((
            DockerCredentials {
                docker_config_json: body,
            },
            resp,
        ))
    }

    pub async fn list_repositories(
        &self,
        registry: &str,
        opts: &ListOptions,
    ) -> Result<(Vec<Repository>, Response)> {
        require_non_empty("registry", registry)?;
        let path = add_options(
            &format!("{}/{}/repositories", REGISTRY_PATH, urlencoding::encode(registry)),
            opts,
        )?;
        let (root, resp): (RepositoriesRoot, _) = self.client.get(&path).await?;
        Ok((root.repositories, resp))
    }

    pub async fn list_repository_tags(
        &self,
        registry: &str,
        repository: &str,
        opts: &ListOptions,
    ) -> Result<(Vec<RepositoryTag>, Response)> {
        let path = add_options(&format!("{}/tags", repository_path(registry, repository)?), opts)?;
        let (root, resp): (TagsRoot, _) = self.client.get(&path).await?;
        Ok((root.tags, resp))
    }

    pub async fn delete_tag(&self, registry: &str, repository: &str, tag: &str) -> Result<Response> {
        require_non_empty("tag", tag)?;
        let path = format!(
            "{}/tags/{}",
            repository_path(registry, repository)?,
            urlencoding::encode(tag)
        );
        self.client.delete(&path).await
    }
}

/// Repository names may contain `/`, which is escaped into one segment.
fn repository_path(registry: &str, repository: &str) -> Result<String> {
    require_non_empty("registry", registry)?;
    require_non_empty("repository", repository)?;
    Ok(format!(
        "{}/{}/repositories/{}",
        REGISTRY_PATH,
        urlencoding::encode(registry),
        urlencoding::encode(repository)
    ))
}
