//! Droplets: virtual machines
//!
//! Besides plain CRUD the service exposes the sub-collections of a droplet
//! (kernels, snapshots, backups, actions, neighbors) and its backup policy.

use crate::api::{
    add_options, require_non_empty, require_positive, ArgError, Client, ListOptions, Response,
    Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

use super::actions::{Action, ActionsRoot};
use super::images::Image;
use super::regions::Region;
use super::sizes::Size;

const DROPLETS_PATH: &str = "/v2/droplets";

/// A virtual machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Droplet {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub memory: u64,
    #[serde(default)]
    pub vcpus: u32,
    #[serde(default)]
    pub disk: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default)]
    pub size_slug: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub backup_ids: Vec<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_backup_window: Option<BackupWindow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub snapshot_ids: Vec<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<Networks>,
    #[serde(rename = "created_at", default)]
    pub created: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel: Option<Kernel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volume_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vpc_uuid: String,
}

impl Droplet {
    pub fn urn(&self) -> String {
        format!("do:droplet:{}", self.id)
    }

    fn ipv4(&self, network_type: &str) -> Option<&str> {
        self.networks
            .as_ref()?
            .v4
            .iter()
            .find(|n| n.network_type == network_type)
            .map(|n| n.ip_address.as_str())
    }

    /// Public IPv4 address, if the droplet has one.
    pub fn public_ipv4(&self) -> Option<&str> {
        self.ipv4("public")
    }

    /// Private IPv4 address, if the droplet has one.
    pub fn private_ipv4(&self) -> Option<&str> {
        self.ipv4("private")
    }

    /// Public IPv6 address, if the droplet has one.
    pub fn public_ipv6(&self) -> Option<&str> {
        self.networks
            .as_ref()?
            .v6
            .iter()
            .find(|n| n.network_type == "public")
            .map(|n| n.ip_address.as_str())
    }
}

/// Start and end of a backup window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupWindow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

/// Network interfaces of a droplet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Networks {
    #[serde(default)]
    pub v4: Vec<NetworkV4>,
    #[serde(default)]
    pub v6: Vec<NetworkV6>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkV4 {
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub netmask: String,
    #[serde(default)]
    pub gateway: String,
    #[serde(rename = "type", default)]
    pub network_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkV6 {
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub netmask: u32,
    #[serde(default)]
    pub gateway: String,
    #[serde(rename = "type", default)]
    pub network_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kernel {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// Image to create a droplet from: either an id or a slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropletCreateImage {
    Id(u64),
    Slug(String),
}

impl Default for DropletCreateImage {
    fn default() -> Self {
        DropletCreateImage::Slug(String::new())
    }
}

impl Serialize for DropletCreateImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            DropletCreateImage::Id(id) => serializer.serialize_u64(*id),
            DropletCreateImage::Slug(slug) => serializer.serialize_str(slug),
        }
    }
}

/// Volume to attach at creation. An id takes precedence over a name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropletCreateVolume {
    pub id: String,
    pub name: String,
}

impl Serialize for DropletCreateVolume {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(1))?;
        if self.id.is_empty() {
            map.serialize_entry("name", &self.name)?;
        } else {
            map.serialize_entry("id", &self.id)?;
        }
        map.end()
    }
}

/// SSH key to install: either an id or a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropletCreateSshKey {
    Id(u64),
    Fingerprint(String),
}

impl Serialize for DropletCreateSshKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            DropletCreateSshKey::Id(id) => serializer.serialize_u64(*id),
            DropletCreateSshKey::Fingerprint(fp) => serializer.serialize_str(fp),
        }
    }
}

/// Backup schedule requested at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DropletBackupPolicyRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub plan: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub weekday: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hour: Option<u32>,
}

/// Request to create a single droplet.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DropletCreateRequest {
    pub name: String,
    pub region: String,
    pub size: String,
    pub image: DropletCreateImage,
    /// Serialized as `null` when empty
    #[serde(serialize_with = "null_if_empty")]
    pub ssh_keys: Vec<DropletCreateSshKey>,
    pub backups: bool,
    pub ipv6: bool,
    pub private_networking: bool,
    pub monitoring: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_data: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<DropletCreateVolume>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vpc_uuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_droplet_agent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_policy: Option<DropletBackupPolicyRequest>,
}

/// Request to create several identical droplets with different names.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DropletMultiCreateRequest {
    pub names: Vec<String>,
    pub region: String,
    pub size: String,
    pub image: DropletCreateImage,
    #[serde(serialize_with = "null_if_empty")]
    pub ssh_keys: Vec<DropletCreateSshKey>,
    pub backups: bool,
    pub ipv6: bool,
    pub private_networking: bool,
    pub monitoring: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_data: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vpc_uuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_droplet_agent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_policy: Option<DropletBackupPolicyRequest>,
}

fn null_if_empty<S: Serializer>(
    keys: &[DropletCreateSshKey],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    if keys.is_empty() {
        serializer.serialize_none()
    } else {
        serializer.collect_seq(keys)
    }
}

/// Backup policy of a droplet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropletBackupPolicy {
    #[serde(default)]
    pub droplet_id: u64,
    #[serde(default)]
    pub backup_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_policy: Option<DropletBackupPolicyConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_backup_window: Option<BackupWindow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropletBackupPolicyConfig {
    #[serde(default)]
    pub plan: String,
    #[serde(default)]
    pub weekday: String,
    #[serde(default)]
    pub hour: u32,
    #[serde(default)]
    pub window_length_hours: u32,
    #[serde(default)]
    pub retention_period_days: u32,
}

/// A backup plan the API offers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedBackupPolicy {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub possible_window_starts: Vec<u32>,
    #[serde(default)]
    pub window_length_hours: u32,
    #[serde(default)]
    pub retention_period_days: u32,
    #[serde(default)]
    pub possible_days: Vec<String>,
}

#[derive(Deserialize)]
struct DropletRoot {
    droplet: Droplet,
}

#[derive(Deserialize)]
struct DropletsRoot {
    #[serde(default)]
    droplets: Vec<Droplet>,
}

#[derive(Deserialize)]
struct KernelsRoot {
    #[serde(default)]
    kernels: Vec<Kernel>,
}

#[derive(Deserialize)]
struct SnapshotsRoot {
    #[serde(default)]
    snapshots: Vec<Image>,
}

#[derive(Deserialize)]
struct BackupsRoot {
    #[serde(default)]
    backups: Vec<Image>,
}

#[derive(Deserialize)]
struct BackupPolicyRoot {
    policy: DropletBackupPolicy,
}

#[derive(Deserialize)]
struct BackupPoliciesRoot {
    #[serde(default)]
    policies: HashMap<u64, DropletBackupPolicy>,
}

#[derive(Deserialize)]
struct SupportedBackupPoliciesRoot {
    #[serde(default)]
    supported_policies: Vec<SupportedBackupPolicy>,
}

#[derive(Serialize)]
struct DropletFilter<'a> {
    #[serde(flatten)]
    list: &'a ListOptions,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    droplet_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

impl<'a> DropletFilter<'a> {
    fn new(list: &'a ListOptions) -> Self {
        Self {
            list,
            droplet_type: None,
            tag_name: None,
            name: None,
        }
    }
}

pub struct DropletsService<'a> {
    client: &'a Client,
}

impl<'a> DropletsService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, opts: &ListOptions) -> Result<(Vec<Droplet>, Response)> {
        self.list_filtered(&DropletFilter::new(opts)).await
    }

    /// List GPU droplets only.
    pub async fn list_with_gpus(&self, opts: &ListOptions) -> Result<(Vec<Droplet>, Response)> {
        let filter = DropletFilter {
            droplet_type: Some("gpus"),
            ..DropletFilter::new(opts)
        };
        self.list_filtered(&filter).await
    }

    pub async fn list_by_tag(&self, tag: &str, opts: &ListOptions) -> Result<(Vec<Droplet>, Response)> {
        let filter = DropletFilter {
            tag_name: Some(tag),
            ..DropletFilter::new(opts)
        };
        self.list_filtered(&filter).await
    }

    pub async fn list_by_name(&self, name: &str, opts: &ListOptions) -> Result<(Vec<Droplet>, Response)> {
        let filter = DropletFilter {
            name: Some(name),
            ..DropletFilter::new(opts)
        };
        self.list_filtered(&filter).await
    }

    async fn list_filtered(&self, filter: &DropletFilter<'_>) -> Result<(Vec<Droplet>, Response)> {
        let path = add_options(DROPLETS_PATH, filter)?;
        let (root, resp): (DropletsRoot, _) = self.client.get(&path).await?;
        Ok((root.droplets, resp))
    }

    pub async fn get(&self, id: u64) -> Result<(Droplet, Response)> {
        require_positive("dropletID", id)?;
        let path = format!("{}/{}", DROPLETS_PATH, id);
        let (root, resp): (DropletRoot, _) = self.client.get(&path).await?;
        Ok((root.droplet, resp))
    }

    /// Create a droplet. The create action is in `response.links.actions`.
    pub async fn create(&self, req: &DropletCreateRequest) -> Result<(Droplet, Response)> {
        let (root, resp): (DropletRoot, _) = self.client.post(DROPLETS_PATH, req).await?;
        Ok((root.droplet, resp))
    }

    pub async fn create_multiple(&self, req: &DropletMultiCreateRequest) -> Result<(Vec<Droplet>, Response)> {
        if req.names.is_empty() {
            return Err(ArgError::new("names", "cannot be empty").into());
        }
        let (root, resp): (DropletsRoot, _) = self.client.post(DROPLETS_PATH, req).await?;
        Ok((root.droplets, resp))
    }

    pub async fn delete(&self, id: u64) -> Result<Response> {
        require_positive("dropletID", id)?;
        self.client.delete(&format!("{}/{}", DROPLETS_PATH, id)).await
    }

    /// Delete every droplet carrying `tag`.
    pub async fn delete_by_tag(&self, tag: &str) -> Result<Response> {
        require_non_empty("tag", tag)?;
        let path = format!("{}?tag_name={}", DROPLETS_PATH, urlencoding::encode(tag));
        self.client.delete(&path).await
    }

    pub async fn kernels(&self, id: u64, opts: &ListOptions) -> Result<(Vec<Kernel>, Response)> {
        let path = self.sub_path(id, "kernels", opts)?;
        let (root, resp): (KernelsRoot, _) = self.client.get(&path).await?;
        Ok((root.kernels, resp))
    }

    pub async fn snapshots(&self, id: u64, opts: &ListOptions) -> Result<(Vec<Image>, Response)> {
        let path = self.sub_path(id, "snapshots", opts)?;
        let (root, resp): (SnapshotsRoot, _) = self.client.get(&path).await?;
        Ok((root.snapshots, resp))
    }

    pub async fn backups(&self, id: u64, opts: &ListOptions) -> Result<(Vec<Image>, Response)> {
        let path = self.sub_path(id, "backups", opts)?;
        let (root, resp): (BackupsRoot, _) = self.client.get(&path).await?;
        Ok((root.backups, resp))
    }

    pub async fn actions(&self, id: u64, opts: &ListOptions) -> Result<(Vec<Action>, Response)> {
        let path = self.sub_path(id, "actions", opts)?;
        let (root, resp): (ActionsRoot, _) = self.client.get(&path).await?;
        Ok((root.actions, resp))
    }

    /// Droplets running on the same physical hardware.
    pub async fn neighbors(&self, id: u64) -> Result<(Vec<Droplet>, Response)> {
        require_positive("dropletID", id)?;
        let path = format!("{}/{}/neighbors", DROPLETS_PATH, id);
        let (root, resp): (DropletsRoot, _) = self.client.get(&path).await?;
        Ok((root.droplets, resp))
    }

    pub async fn get_backup_policy(&self, id: u64) -> Result<(DropletBackupPolicy, Response)> {
        require_positive("dropletID", id)?;
        let path = format!("{}/{}/backups/policy", DROPLETS_PATH, id);
        let (root, resp): (BackupPolicyRoot, _) = self.client.get(&path).await?;
        Ok((root.policy, resp))
    }

    /// Backup policies of every droplet, keyed by droplet id.
    pub async fn list_backup_policies(
        &self,
        opts: &ListOptions,
    ) -> Result<(HashMap<u64, DropletBackupPolicy>, Response)> {
        let path = add_options(&format!("{}/backups/policies", DROPLETS_PATH), opts)?;
        let (root, resp): (BackupPoliciesRoot, _) = self.client.get(&path).await?;
        Ok((root.policies, resp))
    }

    pub async fn list_supported_backup_policies(&self) -> Result<(Vec<SupportedBackupPolicy>, Response)> {
        let path = format!("{}/backups/supported_policies", DROPLETS_PATH);
        let (root, resp): (SupportedBackupPoliciesRoot, _) = self.client.get(&path).await?;
        Ok((root.supported_policies, resp))
    }

    fn sub_path(&self, id: u64, collection: &str, opts: &ListOptions) -> Result<String> {
        require_positive("dropletID", id)?;
        add_options(&format!("{}/{}/{}", DROPLETS_PATH, id, collection), opts)
    }
}
