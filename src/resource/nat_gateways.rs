//! NAT gateways: managed egress for VPCs

use crate::api::options::{is_false, is_zero};
use crate::api::{add_options, require_non_empty, Client, ListOptions, Response, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const NAT_GATEWAYS_PATH: &str = "/v2/nat_gateways";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NatGateway {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub gateway_type: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub vpcs: Vec<IngressVpc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub egresses: Option<Egresses>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub udp_timeout_seconds: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub icmp_timeout_seconds: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub tcp_timeout_seconds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A VPC whose traffic leaves through the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressVpc {
    pub vpc_uuid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub gateway_ip: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub default_nat_gateway: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Egresses {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub public_gateways: Vec<PublicGateway>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicGateway {
    #[serde(default)]
    pub ipv4: String,
}

/// Body of a create or update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NatGatewayRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub gateway_type: String,
    pub region: String,
    pub vpcs: Vec<IngressVpc>,
    #[serde(skip_serializing_if = "is_zero")]
    pub udp_timeout_seconds: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub icmp_timeout_seconds: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub tcp_timeout_seconds: u32,
}

/// List filters. Each one may repeat, e.g. `state=active&state=new`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NatGatewaysListOptions {
    #[serde(flatten)]
    pub list: ListOptions,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub state: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub region: Vec<String>,
    #[serde(rename = "type", skip_serializing_if = "Vec::is_empty")]
    pub gateway_type: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<String>,
}

#[derive(Deserialize)]
struct NatGatewayRoot {
    nat_gateway: NatGateway,
}

#[derive(Deserialize)]
struct NatGatewaysRoot {
    #[serde(default)]
    nat_gateways: Vec<NatGateway>,
}

pub struct NatGatewaysService<'a> {
    client: &'a Client,
}

impl<'a> NatGatewaysService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, opts: &NatGatewaysListOptions) -> Result<(Vec<NatGateway>, Response)> {
        let path = add_options(NAT_GATEWAYS_PATH, opts)?;
        let (root, resp): (NatGatewaysRoot, _) = self.client.get(&path).await?;
        Ok((root.nat_gateways, resp))
    }

    pub async fn get(&self, id: &str) -> Result<(NatGateway, Response)> {
        let path = gateway_path(id)?;
        let (root, resp): (NatGatewayRoot, _) = self.client.get(&path).await?;
        Ok((root.nat_gateway, resp))
    }

    pub async fn create(&self, req: &NatGatewayRequest) -> Result<(NatGateway, Response)> {
        let (root, resp): (NatGatewayRoot, _) = self.client.post(NAT_GATEWAYS_PATH, req).await?;
        Ok((root.nat_gateway, resp))
    }

    pub async fn update(&self, id: &str, req: &NatGatewayRequest) -> Result<(NatGateway, Response)> {
        let path = gateway_path(id)?;
        let (root, resp): (NatGatewayRoot, _) = self.client.put(&path, req).await?;
        Ok((root.nat_gateway, resp))
    }

    pub async fn delete(&self, id: &str) -> Result<Response> {
        let path = gateway_path(id)?;
        self.client.delete(&path).await
    }
}

fn gateway_path(id: &str) -> Result<String> {
    require_non_empty("id", id)?;
    Ok(format!("{}/{}", NAT_GATEWAYS_PATH, urlencoding::encode(id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_filters_repeat() {
        let opts = NatGatewaysListOptions {
            list: ListOptions::new(1, 20),
            state: vec!["active".to_string(), "new".to_string()],
            region: vec!["nyc3".to_string()],
            ..Default::default()
        };
        let path = add_options(NAT_GATEWAYS_PATH, &opts).unwrap();
        assert_eq!(
            path,
            "/v2/nat_gateways?page=1&per_page=20&region=nyc3&state=active&state=new"
        );
    }
}
