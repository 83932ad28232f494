//! Managed Kubernetes clusters
//!
//! # Module Structure
//!
//! - Clusters: CRUD, upgrades, credentials and kubeconfig
//! - Node pools and their nodes, nested under a cluster
//! - Deletion of a cluster together with its associated resources
//! - Cluster-wide options, registry integration and clusterlint runs

use crate::api::options::{is_false, is_zero};
use crate::api::{
    add_options, require_non_empty, ArgError, Client, ListOptions, Response, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

const KUBERNETES_PATH: &str = "/v2/kubernetes";
const CLUSTERS_PATH: &str = "/v2/kubernetes/clusters";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KubernetesCluster {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "region", default)]
    pub region_slug: String,
    #[serde(rename = "version", default)]
    pub version_slug: String,
    #[serde(default)]
    pub cluster_subnet: String,
    #[serde(default)]
    pub service_subnet: String,
    #[serde(default)]
    pub ipv4: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub endpoint: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub vpc_uuid: String,
    #[serde(default)]
    pub ha: bool,
    #[serde(default)]
    pub auto_upgrade: bool,
    #[serde(default)]
    pub surge_upgrade: bool,
    #[serde(default)]
    pub registry_enabled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub node_pools: Vec<KubernetesNodePool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_policy: Option<KubernetesMaintenancePolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<KubernetesClusterStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl KubernetesCluster {
    pub fn urn(&self) -> String {
        format!("do:kubernetes:{}", self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubernetesClusterStatus {
    #[serde(default)]
    pub state: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KubernetesNodePool {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub taints: Vec<Taint>,
    #[serde(default)]
    pub auto_scale: bool,
    #[serde(default)]
    pub min_nodes: u32,
    #[serde(default)]
    pub max_nodes: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<KubernetesNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taint {
    pub key: String,
    #[serde(default)]
    pub value: String,
    pub effect: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KubernetesNode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<KubernetesNodeStatus>,
    #[serde(default)]
    pub droplet_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubernetesNodeStatus {
    #[serde(default)]
    pub state: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

/// When automatic upgrades may run. `start_time` is `HH:MM` in UTC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubernetesMaintenancePolicy {
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub day: KubernetesMaintenancePolicyDay,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum KubernetesMaintenancePolicyDay {
    #[default]
    Any,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl KubernetesMaintenancePolicyDay {
    pub const ALL: [KubernetesMaintenancePolicyDay; 8] = [
        Self::Any,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }
}

impl fmt::Display for KubernetesMaintenancePolicyDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KubernetesMaintenancePolicyDay {
    type Err = ArgError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|day| day.as_str() == s)
            .ok_or_else(|| ArgError::new("day", format!("'{}' is not a valid weekday", s)))
    }
}

impl Serialize for KubernetesMaintenancePolicyDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for KubernetesMaintenancePolicyDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KubernetesClusterCreateRequest {
    pub name: String,
    #[serde(rename = "region")]
    pub region_slug: String,
    #[serde(rename = "version")]
    pub version_slug: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vpc_uuid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cluster_subnet: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service_subnet: String,
    #[serde(skip_serializing_if = "is_false")]
    pub ha: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub auto_upgrade: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub surge_upgrade: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub registry_enabled: bool,
    pub node_pools: Vec<KubernetesNodePoolCreateRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_policy: Option<KubernetesMaintenancePolicy>,
}

/// Partial update. Unset fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KubernetesClusterUpdateRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_policy: Option<KubernetesMaintenancePolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_upgrade: Option<bool>,
    #[serde(skip_serializing_if = "is_false")]
    pub surge_upgrade: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ha: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KubernetesClusterUpgradeRequest {
    #[serde(rename = "version")]
    pub version_slug: String,
}

/// Associated resources to destroy along with the cluster, by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KubernetesClusterDeleteSelectiveRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volume_snapshots: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub load_balancers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubernetesAssociatedResources {
    #[serde(default)]
    pub volumes: Vec<AssociatedResource>,
    #[serde(default)]
    pub volume_snapshots: Vec<AssociatedResource>,
    #[serde(default)]
    pub load_balancers: Vec<AssociatedResource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociatedResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubernetesClusterUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

/// A kubeconfig file, as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KubernetesClusterConfig {
    pub kubeconfig_yaml: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KubernetesClusterCredentials {
    #[serde(default)]
    pub server: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub certificate_authority_data: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_certificate_data: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_key_data: String,
    #[serde(default)]
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KubernetesClusterCredentialsGetRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KubernetesNodePoolCreateRequest {
    pub name: String,
    pub size: String,
    pub count: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub taints: Vec<Taint>,
    #[serde(skip_serializing_if = "is_false")]
    pub auto_scale: bool,
    #[serde(skip_serializing_if = "is_zero")]
    pub min_nodes: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub max_nodes: u32,
}

/// Partial node pool update. `count` may be set to zero explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KubernetesNodePoolUpdateRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taints: Option<Vec<Taint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_scale: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_nodes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_nodes: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KubernetesNodePoolRecycleNodesRequest {
    pub nodes: Vec<String>,
}

/// How a node is removed from its pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KubernetesNodeDeleteRequest {
    /// Remove the node without evicting its pods first
    pub skip_drain: bool,
    /// Provision a replacement node
    pub replace: bool,
}

#[derive(Serialize)]
struct NodeDeleteQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    skip_drain: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    replace: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubernetesOptions {
    #[serde(default)]
    pub versions: Vec<KubernetesVersion>,
    #[serde(default)]
    pub regions: Vec<KubernetesRegion>,
    #[serde(default)]
    pub sizes: Vec<KubernetesNodeSize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubernetesVersion {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub kubernetes_version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supported_features: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubernetesRegion {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubernetesNodeSize {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubernetesClusterRegistryRequest {
    pub cluster_uuids: Vec<String>,
}

/// Which clusterlint checks to run. Empty runs the default set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KubernetesRunClusterlintRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_groups: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_checks: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_groups: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_checks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterlintDiagnostic {
    #[serde(default)]
    pub check_name: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<ClusterlintObject>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterlintObject {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owners: Vec<ClusterlintOwner>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterlintOwner {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize)]
struct ClusterRoot {
    kubernetes_cluster: KubernetesCluster,
}

#[derive(Deserialize)]
struct ClustersRoot {
    #[serde(default)]
    kubernetes_clusters: Vec<KubernetesCluster>,
}

#[derive(Deserialize)]
struct ClusterUserRoot {
    kubernetes_cluster_user: KubernetesClusterUser,
}

#[derive(Deserialize)]
struct UpgradesRoot {
    #[serde(default)]
    available_upgrade_versions: Vec<KubernetesVersion>,
}

#[derive(Deserialize)]
struct NodePoolRoot {
    node_pool: KubernetesNodePool,
}

#[derive(Deserialize)]
struct NodePoolsRoot {
    #[serde(default)]
    node_pools: Vec<KubernetesNodePool>,
}

#[derive(Deserialize)]
struct OptionsRoot {
    options: KubernetesOptions,
}

#[derive(Deserialize)]
struct ClusterlintRunRoot {
    #[serde(default)]
    run_id: String,
}

#[derive(Deserialize)]
struct ClusterlintResultsRoot {
    #[serde(default)]
    diagnostics: Vec<ClusterlintDiagnostic>,
}

#[derive(Serialize)]
struct ExpiryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    expiry_seconds: Option<u64>,
}

#[derive(Serialize)]
struct RunIdQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    run_id: Option<&'a str>,
}

pub struct KubernetesService<'a> {
    client: &'a Client,
}

impl<'a> KubernetesService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, opts: &ListOptions) -> Result<(Vec<KubernetesCluster>, Response)> {
        let path = add_options(CLUSTERS_PATH, opts)?;
        let (root, resp): (ClustersRoot, _) = self.client.get(&path).await?;
        Ok((root.kubernetes_clusters, resp))
    }

    pub async fn get(&self, cluster_id: &str) -> Result<(KubernetesCluster, Response)> {
        let path = cluster_path(cluster_id)?;
        let (root, resp): (ClusterRoot, _) = self.client.get(&path).await?;
        Ok((root.kubernetes_cluster, resp))
    }

    pub async fn create(
        &self,
        req: &KubernetesClusterCreateRequest,
    ) -> Result<(KubernetesCluster, Response)> {
        let (root, resp): (ClusterRoot, _) = self.client.post(CLUSTERS_PATH, req).await?;
        Ok((root.kubernetes_cluster, resp))
    }

    pub async fn update(
        &self,
        cluster_id: &str,
        req: &KubernetesClusterUpdateRequest,
    ) -> Result<(KubernetesCluster, Response)> {
        let path = cluster_path(cluster_id)?;
        let (root, resp): (ClusterRoot, _) = self.client.put(&path, req).await?;
        Ok((root.kubernetes_cluster, resp))
    }

    pub async fn upgrade(
        &self,
        cluster_id: &str,
        req: &KubernetesClusterUpgradeRequest,
    ) -> Result<Response> {
        let path = format!("{}/upgrade", cluster_path(cluster_id)?);
        self.client
            .send_empty(reqwest::Method::POST, &path, Some(req))
            .await
    }

    pub async fn delete(&self, cluster_id: &str) -> Result<Response> {
        let path = cluster_path(cluster_id)?;
        self.client.delete(&path).await
    }

    /// Delete the cluster and the listed associated resources.
    pub async fn delete_selective(
        &self,
        cluster_id: &str,
        req: &KubernetesClusterDeleteSelectiveRequest,
    ) -> Result<Response> {
        let path = format!(
            "{}/destroy_with_associated_resources/selective",
            cluster_path(cluster_id)?
        );
        self.client
            .send_empty(reqwest::Method::DELETE, &path, Some(req))
            .await
    }

    /// Delete the cluster and every associated resource.
    pub async fn delete_dangerous(&self, cluster_id: &str) -> Result<Response> {
        let path = format!(
            "{}/destroy_with_associated_resources/dangerous",
            cluster_path(cluster_id)?
        );
        self.client.delete(&path).await
    }

    pub async fn list_associated_resources(
        &self,
        cluster_id: &str,
    ) -> Result<(KubernetesAssociatedResources, Response)> {
        let path = format!(
            "{}/destroy_with_associated_resources",
            cluster_path(cluster_id)?
        );
        self.client.get(&path).await
    }

    pub async fn get_user(&self, cluster_id: &str) -> Result<(KubernetesClusterUser, Response)> {
        let path = format!("{}/user", cluster_path(cluster_id)?);
        let (root, resp): (ClusterUserRoot, _) = self.client.get(&path).await?;
        Ok((root.kubernetes_cluster_user, resp))
    }

    /// Raw kubeconfig YAML, optionally with credentials that expire after
    /// `expiry_seconds`.
    pub async fn get_kubeconfig(
        &self,
        cluster_id: &str,
        expiry_seconds: Option<u64>,
    ) -> Result<(KubernetesClusterConfig, Response)> {
        let path = add_options(
            &format!("{}/kubeconfig", cluster_path(cluster_id)?),
            &ExpiryQuery { expiry_seconds },
        )?;
        let (body, resp) = self.client.get_raw(&path).await?;
        Ok((
            KubernetesClusterConfig {
                kubeconfig_yaml: body,
            },
            resp,
        ))
    }

    pub async fn get_credentials(
        &self,
        cluster_id: &str,
        req: &KubernetesClusterCredentialsGetRequest,
    ) -> Result<(KubernetesClusterCredentials, Response)> {
        let path = add_options(&format!("{}/credentials", cluster_path(cluster_id)?), req)?;
        self.client.get(&path).await
    }

    /// Versions the cluster can be upgraded to.
    pub async fn get_upgrades(&self, cluster_id: &str) -> Result<(Vec<KubernetesVersion>, Response)> {
        let path = format!("{}/upgrades", cluster_path(cluster_id)?);
        let (root, resp): (UpgradesRoot, _) = self.client.get(&path).await?;
        Ok((root.available_upgrade_versions, resp))
    }

    pub async fn create_node_pool(
        &self,
        cluster_id: &str,
        req: &KubernetesNodePoolCreateRequest,
    ) -> Result<(KubernetesNodePool, Response)> {
        let path = format!("{}/node_pools", cluster_path(cluster_id)?);
        let (root, resp): (NodePoolRoot, _) = self.client.post(&path, req).await?;
        Ok((root.node_pool, resp))
    }

    pub async fn get_node_pool(
        &self,
        cluster_id: &str,
        pool_id: &str,
    ) -> Result<(KubernetesNodePool, Response)> {
        let path = node_pool_path(cluster_id, pool_id)?;
        let (root, resp): (NodePoolRoot, _) = self.client.get(&path).await?;
        Ok((root.node_pool, resp))
    }

    pub async fn list_node_pools(
        &self,
        cluster_id: &str,
        opts: &ListOptions,
    ) -> Result<(Vec<KubernetesNodePool>, Response)> {
        let path = add_options(&format!("{}/node_pools", cluster_path(cluster_id)?), opts)?;
        let (root, resp): (NodePoolsRoot, _) = self.client.get(&path).await?;
        Ok((root.node_pools, resp))
    }

    pub async fn update_node_pool(
        &self,
        cluster_id: &str,
        pool_id: &str,
        req: &KubernetesNodePoolUpdateRequest,
    ) -> Result<(KubernetesNodePool, Response)> {
        let path = node_pool_path(cluster_id, pool_id)?;
        let (root, resp): (NodePoolRoot, _) = self.client.put(&path, req).await?;
        Ok((root.node_pool, resp))
    }

    pub async fn delete_node_pool(&self, cluster_id: &str, pool_id: &str) -> Result<Response> {
        let path = node_pool_path(cluster_id, pool_id)?;
        self.client.delete(&path).await
    }

    /// Recycle the given nodes of a pool.
    pub async fn recycle_node_pool_nodes(
        &self,
        cluster_id: &str,
        pool_id: &str,
        req: &KubernetesNodePoolRecycleNodesRequest,
    ) -> Result<Response> {
        let path = format!("{}/recycle", node_pool_path(cluster_id, pool_id)?);
        self.client
            .send_empty(reqwest::Method::POST, &path, Some(req))
            .await
    }

    pub async fn delete_node(
        &self,
        cluster_id: &str,
        pool_id: &str,
        node_id: &str,
        req: Option<&KubernetesNodeDeleteRequest>,
    ) -> Result<Response> {
        require_non_empty("nodeID", node_id)?;
        let req = req.copied().unwrap_or_default();
        let query = NodeDeleteQuery {
            skip_drain: req.skip_drain.then_some(1),
            replace: req.replace.then_some(1),
        };
        let path = add_options(
            &format!(
                "{}/nodes/{}",
                node_pool_path(cluster_id, pool_id)?,
                urlencoding::encode(node_id)
            ),
            &query,
        )?;
        self.client.delete(&path).await
    }

    /// Versions, regions and node sizes available for new clusters.
    pub async fn get_options(&self) -> Result<(KubernetesOptions, Response)> {
        let path = format!("{}/options", KUBERNETES_PATH);
        let (root, resp): (OptionsRoot, _) = self.client.get(&path).await?;
        Ok((root.options, resp))
    }

    /// Give the clusters pull access to the account's container registry.
    pub async fn add_registry(&self, req: &KubernetesClusterRegistryRequest) -> Result<Response> {
        let path = format!("{}/registry", KUBERNETES_PATH);
        self.client
            .send_empty(reqwest::Method::POST, &path, Some(req))
            .await
    }

    pub async fn remove_registry(&self, req: &KubernetesClusterRegistryRequest) -> Result<Response> {
        let path = format!("{}/registry", KUBERNETES_PATH);
        self.client
            .send_empty(reqwest::Method::DELETE, &path, Some(req))
            .await
    }

    /// Start a clusterlint run and return its id.
    pub async fn run_clusterlint(
        &self,
        cluster_id: &str,
        req: &KubernetesRunClusterlintRequest,
    ) -> Result<(String, Response)> {
        let path = format!("{}/clusterlint", cluster_path(cluster_id)?);
        let (root, resp): (ClusterlintRunRoot, _) = self.client.post(&path, req).await?;
        Ok((root.run_id, resp))
    }

    /// Diagnostics of a run, or of the latest run when `run_id` is `None`.
    pub async fn get_clusterlint_results(
        &self,
        cluster_id: &str,
        run_id: Option<&str>,
    ) -> Result<(Vec<ClusterlintDiagnostic>, Response)> {
        let path = add_options(
            &format!("{}/clusterlint", cluster_path(cluster_id)?),
            &RunIdQuery { run_id },
        )?;
        let (root, resp): (ClusterlintResultsRoot, _) = self.client.get(&path).await?;
        Ok((root.diagnostics, resp))
    }
}

fn cluster_path(cluster_id: &str) -> Result<String> {
    require_non_empty("clusterID", cluster_id)?;
    Ok(format!("{}/{}", CLUSTERS_PATH, urlencoding::encode(cluster_id)))
}

fn node_pool_path(cluster_id: &str, pool_id: &str) -> Result<String> {
    require_non_empty("poolID", pool_id)?;
    Ok(format!(
        "{}/node_pools/{}",
        cluster_path(cluster_id)?,
        urlencoding::encode(pool_id)
    ))
}
