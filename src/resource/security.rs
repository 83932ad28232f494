//! Security posture scans and their findings

use crate::api::{add_options, require_non_empty, Client, ListOptions, Response, Result};
use serde::{Deserialize, Serialize};

const SCANS_PATH: &str = "/v2/security/scans";

pub const SCAN_STATUS_COMPLETED: &str = "COMPLETED";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scan {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub findings: Vec<ScanFinding>,
}

impl Scan {
    pub fn completed(&self) -> bool {
        self.status == SCAN_STATUS_COMPLETED
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanFinding {
    #[serde(default)]
    pub rule_uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub details: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub found_at: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub business_impact: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub technical_details: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mitigation_steps: Vec<MitigationStep>,
    #[serde(default)]
    pub affected_resources_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MitigationStep {
    #[serde(default)]
    pub step: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedResource {
    #[serde(default)]
    pub urn: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub resource_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanCreateRequest {
    /// Resource selectors such as `do:droplet`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
}

/// Paging plus finding filters for a single scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanFindingsOptions {
    #[serde(flatten)]
    pub list: ListOptions,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub finding_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub severity: String,
}

#[derive(Deserialize)]
struct ScanRoot {
    scan: Scan,
}

#[derive(Deserialize)]
struct ScansRoot {
    #[serde(default)]
    scans: Vec<Scan>,
}

#[derive(Deserialize)]
struct AffectedResourcesRoot {
    #[serde(default)]
    affected_resources: Vec<AffectedResource>,
}

pub struct SecurityService<'a> {
    client: &'a Client,
}

impl<'a> SecurityService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Start a scan. The API answers with the bare scan object.
    pub async fn create_scan(&self, req: &ScanCreateRequest) -> Result<(Scan, Response)> {
        self.client.post(SCANS_PATH, req).await
    }

    pub async fn list_scans(&self, opts: &ListOptions) -> Result<(Vec<Scan>, Response)> {
        let path = add_options(SCANS_PATH, opts)?;
        let (root, resp): (ScansRoot, _) = self.client.get(&path).await?;
        Ok((root.scans, resp))
    }

    pub async fn get_scan(&self, scan_id: &str, opts: &ScanFindingsOptions) -> Result<(Scan, Response)> {
        require_non_empty("scanUUID", scan_id)?;
        let path = add_options(&format!("{}/{}", SCANS_PATH, urlencoding::encode(scan_id)), opts)?;
        let (root, resp): (ScanRoot, _) = self.client.get(&path).await?;
        Ok((root.scan, resp))
    }

    pub async fn get_latest_scan(&self, opts: &ScanFindingsOptions) -> Result<(Scan, Response)> {
        let path = add_options(&format!("{}/latest", SCANS_PATH), opts)?;
        let (root, resp): (ScanRoot, _) = self.client.get(&path).await?;
        Ok((root.scan, resp))
    }

    pub async fn list_finding_affected_resources(
        &self,
        scan_id: &str,
        finding_id: &str,
        opts: &ListOptions,
    ) -> Result<(Vec<AffectedResource>, Response)> {
        require_non_empty("scanUUID", scan_id)?;
        require_non_empty("findingUUID", finding_id)?;
        let path = format!(
            "{}/{}/findings/{}/affected_resources",
            SCANS_PATH,
            urlencoding::encode(scan_id),
            urlencoding::encode(finding_id)
        );
        let path = add_options(&path, opts)?;
        let (root, resp): (AffectedResourcesRoot, _) = self.client.get(&path).await?;
        Ok((root.affected_resources, resp))
    }
}
