//! Partner attachments: private links between VPCs and a network-as-a-service
//! provider
//!
//! The same attachment API is served under two roots. `partner_network_connect`
//! is current, `partner_connect` is the older name. Responses wrap attachments
//! under whichever key the root uses, so decoding accepts all of them.

use crate::api::options::is_zero;
use crate::api::{add_options, require_non_empty, Client, ListOptions, Response, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const PARTNER_NETWORK_CONNECT_PATH: &str = "/v2/partner_network_connect/attachments";
pub const PARTNER_CONNECT_PATH: &str = "/v2/partner_connect/attachments";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerAttachment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub connection_bandwidth_in_mbps: u32,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub naas_provider: String,
    #[serde(default)]
    pub vpc_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub bgp: Bgp,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub redundancy_zone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// BGP session settings. Responses name the ASNs either `local_asn` or
/// `local_router_asn` (likewise for the peer).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bgp {
    #[serde(default, alias = "local_router_asn", skip_serializing_if = "is_zero")]
    pub local_asn: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub local_router_ip: String,
    #[serde(default, alias = "peer_router_asn", skip_serializing_if = "is_zero")]
    pub peer_asn: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub peer_router_ip: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub auth_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartnerAttachmentCreateRequest {
    pub name: String,
    pub connection_bandwidth_in_mbps: u32,
    pub region: String,
    pub naas_provider: String,
    pub vpc_ids: Vec<String>,
    /// Left out of the request body when default
    pub bgp: Bgp,
    pub redundancy_zone: String,
}

/// Wire form of a create. BGP ASNs are sent as `*_router_asn`.
#[derive(Serialize)]
struct CreateBody<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    name: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    connection_bandwidth_in_mbps: u32,
    #[serde(skip_serializing_if = "str::is_empty")]
    region: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    naas_provider: &'a str,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    vpc_ids: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    bgp: Option<BgpInput<'a>>,
    #[serde(skip_serializing_if = "str::is_empty")]
    redundancy_zone: &'a str,
}

#[derive(Serialize)]
struct BgpInput<'a> {
    #[serde(rename = "local_router_asn", skip_serializing_if = "is_zero")]
    local_asn: u32,
    #[serde(skip_serializing_if = "str::is_empty")]
    local_router_ip: &'a str,
    #[serde(rename = "peer_router_asn", skip_serializing_if = "is_zero")]
    peer_asn: u32,
    #[serde(skip_serializing_if = "str::is_empty")]
    peer_router_ip: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    auth_key: &'a str,
}

impl PartnerAttachmentCreateRequest {
    fn body(&self) -> CreateBody<'_> {
        let bgp = (self.bgp != Bgp::default()).then(|| BgpInput {
            local_asn: self.bgp.local_asn,
            local_router_ip: &self.bgp.local_router_ip,
            peer_asn: self.bgp.peer_asn,
            peer_router_ip: &self.bgp.peer_router_ip,
            auth_key: &self.bgp.auth_key,
        });
        CreateBody {
            name: &self.name,
            connection_bandwidth_in_mbps: self.connection_bandwidth_in_mbps,
            region: &self.region,
            naas_provider: &self.naas_provider,
            vpc_ids: &self.vpc_ids,
            bgp,
            redundancy_zone: &self.redundancy_zone,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartnerAttachmentUpdateRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vpc_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartnerAttachmentSetRoutesRequest {
    /// CIDRs reachable on the provider side
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceKey {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRoute {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub cidr: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BgpAuthKey {
    #[serde(default)]
    pub value: String,
}

#[derive(Deserialize)]
struct AttachmentRoot {
    #[serde(
        alias = "partner_attachment",
        alias = "partner_network_connect",
        alias = "partner_connect",
        alias = "partner_interconnect_attachment"
    )]
    attachment: PartnerAttachment,
}

#[derive(Deserialize)]
struct AttachmentsRoot {
    #[serde(
        default,
        alias = "partner_attachments",
        alias = "partner_network_connects",
        alias = "partner_connects",
        alias = "partner_interconnect_attachments"
    )]
    attachments: Vec<PartnerAttachment>,
}

#[derive(Deserialize)]
struct ServiceKeyRoot {
    service_key: ServiceKey,
}

#[derive(Deserialize)]
struct RemoteRoutesRoot {
    #[serde(default)]
    remote_routes: Vec<RemoteRoute>,
}

#[derive(Deserialize)]
struct BgpAuthKeyRoot {
    bgp_auth_key: BgpAuthKey,
}

pub struct PartnerAttachmentsService<'a> {
    client: &'a Client,
    base: &'static str,
}

impl<'a> PartnerAttachmentsService<'a> {
    pub(crate) fn new(client: &'a Client, base: &'static str) -> Self {
        Self { client, base }
    }

    pub async fn list(&self, opts: &ListOptions) -> Result<(Vec<PartnerAttachment>, Response)> {
        let path = add_options(self.base, opts)?;
        let (root, resp): (AttachmentsRoot, _) = self.client.get(&path).await?;
        Ok((root.attachments, resp))
    }

    pub async fn create(
        &self,
        req: &PartnerAttachmentCreateRequest,
    ) -> Result<(PartnerAttachment, Response)> {
        let (root, resp): (AttachmentRoot, _) = self.client.post(self.base, &req.body()).await?;
        Ok((root.attachment, resp))
    }

    pub async fn get(&self, id: &str) -> Result<(PartnerAttachment, Response)> {
        let path = self.attachment_path(id)?;
        let (root, resp): (AttachmentRoot, _) = self.client.get(&path).await?;
        Ok((root.attachment, resp))
    }

    pub async fn update(
        &self,
        id: &str,
        req: &PartnerAttachmentUpdateRequest,
    ) -> Result<(PartnerAttachment, Response)> {
        let path = self.attachment_path(id)?;
        let (root, resp): (AttachmentRoot, _) = self.client.patch(&path, req).await?;
        Ok((root.attachment, resp))
    }

    pub async fn delete(&self, id: &str) -> Result<Response> {
        let path = self.attachment_path(id)?;
        self.client.delete(&path).await
    }

    pub async fn get_service_key(&self, id: &str) -> Result<(ServiceKey, Response)> {
        let path = format!("{}/service_key", self.attachment_path(id)?);
        let (root, resp): (ServiceKeyRoot, _) = self.client.get(&path).await?;
        Ok((root.service_key, resp))
    }

    /// Ask for a new service key. The API acknowledges with an empty body;
    /// fetch the key afterwards with [`Self::get_service_key`].
    pub async fn regenerate_service_key(&self, id: &str) -> Result<Response> {
        let path = format!("{}/service_key", self.attachment_path(id)?);
        self.client
            .send_empty(reqwest::Method::POST, &path, None::<&()>)
            .await
    }

    pub async fn list_routes(&self, id: &str, opts: &ListOptions) -> Result<(Vec<RemoteRoute>, Response)> {
        let path = add_options(&format!("{}/remote_routes", self.attachment_path(id)?), opts)?;
        let (root, resp): (RemoteRoutesRoot, _) = self.client.get(&path).await?;
        Ok((root.remote_routes, resp))
    }

    pub async fn set_routes(
        &self,
        id: &str,
        req: &PartnerAttachmentSetRoutesRequest,
    ) -> Result<(PartnerAttachment, Response)> {
        let path = format!("{}/remote_routes", self.attachment_path(id)?);
        let (root, resp): (AttachmentRoot, _) = self.client.put(&path, req).await?;
        Ok((root.attachment, resp))
    }

    pub async fn get_bgp_auth_key(&self, id: &str) -> Result<(BgpAuthKey, Response)> {
        let path = format!("{}/bgp_auth_key", self.attachment_path(id)?);
        let (root, resp): (BgpAuthKeyRoot, _) = self.client.get(&path).await?;
        Ok((root.bgp_auth_key, resp))
    }

    fn attachment_path(&self, id: &str) -> Result<String> {
        require_non_empty("id", id)?;
        Ok(format!("{}/{}", self.base, urlencoding::encode(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_request() -> PartnerAttachmentCreateRequest {
        PartnerAttachmentCreateRequest {
            name: "my-new-partner-connect".to_string(),
            connection_bandwidth_in_mbps: 50,
            region: "NYC".to_string(),
            naas_provider: "MEGAPORT".to_string(),
            vpc_ids: vec!["f5a0c5e4-7537-47de-bb8d-46c766f89ffb".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_create_body_without_bgp() {
        let req = create_request();
        assert_eq!(
            serde_json::to_value(req.body()).unwrap(),
            json!({
                "name": "my-new-partner-connect",
                "connection_bandwidth_in_mbps": 50,
                "region": "NYC",
                "naas_provider": "MEGAPORT",
                "vpc_ids": ["f5a0c5e4-7537-47de-bb8d-46c766f89ffb"]
            })
        );
    }

    #[test]
    fn test_create_body_renames_asns() {
        let req = PartnerAttachmentCreateRequest {
            bgp: Bgp {
                local_asn: 64532,
                local_router_ip: "169.250.0.1".to_string(),
                peer_asn: 133937,
                peer_router_ip: "169.250.0.6".to_string(),
                auth_key: String::new(),
            },
            redundancy_zone: "MEGAPORT_BLUE".to_string(),
            ..create_request()
        };
        let body = serde_json::to_value(req.body()).unwrap();
        assert_eq!(
            body["bgp"],
            json!({
                "local_router_asn": 64532,
                "local_router_ip": "169.250.0.1",
                "peer_router_asn": 133937,
                "peer_router_ip": "169.250.0.6"
            })
        );
        assert_eq!(body["redundancy_zone"], "MEGAPORT_BLUE");
    }

    #[test]
    fn test_bgp_accepts_router_asn_names() {
        let bgp: Bgp = serde_json::from_value(json!({
            "local_router_asn": 64532,
            "peer_router_asn": 133937
        }))
        .unwrap();
        assert_eq!(bgp.local_asn, 64532);
        assert_eq!(bgp.peer_asn, 133937);
    }

    #[test]
    fn test_attachment_root_keys() {
        for key in ["partner_attachment", "partner_network_connect", "partner_interconnect_attachment"] {
            let root: AttachmentRoot = serde_json::from_value(json!({key: {"id": "a1"}})).unwrap();
            assert_eq!(root.attachment.id, "a1", "{}", key);
        }
        let root: AttachmentsRoot =
            serde_json::from_value(json!({"partner_connects": [{"id": "a1"}, {"id": "a2"}]})).unwrap();
        assert_eq!(root.attachments.len(), 2);
    }
}
