//! Load balancers
//!
//! A load balancer distributes traffic across droplets according to its
//! forwarding rules. Droplets and rules can be attached or detached without
//! replacing the whole resource.

use crate::api::options::is_zero;
use crate::api::{add_options, require_non_empty, Client, ListOptions, Response, Result};
use serde::{Deserialize, Serialize};

use super::regions::Region;

const LOAD_BALANCERS_PATH: &str = "/v2/load_balancers";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancer {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub algorithm: String,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "created_at", default)]
    pub created: String,
    #[serde(default)]
    pub forwarding_rules: Vec<ForwardingRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticky_sessions: Option<StickySessions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub droplet_ids: Vec<u64>,
    #[serde(default)]
    pub redirect_http_to_https: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vpc_uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_lets_encrypt_dns_records: Option<bool>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_idle_timeout_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firewall: Option<LbFirewall>,
}

impl LoadBalancer {
    pub fn urn(&self) -> String {
        format!("do:loadbalancer:{}", self.id)
    }

    /// Build a request that recreates this load balancer as-is, useful as
    /// the starting point of a PUT update.
    pub fn as_request(&self) -> LoadBalancerRequest {
        LoadBalancerRequest {
            name: self.name.clone(),
            algorithm: self.algorithm.clone(),
            region: self
                .region
                .as_ref()
                .map(|r| r.slug.clone())
                .unwrap_or_default(),
            forwarding_rules: self.forwarding_rules.clone(),
            health_check: self.health_check.clone(),
            sticky_sessions: self.sticky_sessions.clone(),
            tag: String::new(),
            tags: self.tags.clone(),
            droplet_ids: self.droplet_ids.clone(),
            redirect_http_to_https: self.redirect_http_to_https,
            vpc_uuid: self.vpc_uuid.clone(),
            disable_lets_encrypt_dns_records: self.disable_lets_encrypt_dns_records,
            project_id: self.project_id.clone(),
            http_idle_timeout_seconds: self.http_idle_timeout_seconds,
            firewall: self.firewall.clone(),
        }
    }
}

/// Routes traffic from an entry port to a target port on the droplets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardingRule {
    #[serde(default)]
    pub entry_protocol: String,
    #[serde(default)]
    pub entry_port: u16,
    #[serde(default)]
    pub target_protocol: String,
    #[serde(default)]
    pub target_port: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub certificate_id: String,
    #[serde(default)]
    pub tls_passthrough: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub check_interval_seconds: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub response_timeout_seconds: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub unhealthy_threshold: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub healthy_threshold: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickySessions {
    #[serde(rename = "type", default)]
    pub session_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cookie_name: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub cookie_ttl_seconds: u64,
}

/// Allow and deny rules such as `ip:1.2.3.4` or `cidr:2.3.0.0/16`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LbFirewall {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allow: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deny: Vec<String>,
}

/// Body of a create or full update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadBalancerRequest {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub algorithm: String,
    pub region: String,
    pub forwarding_rules: Vec<ForwardingRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticky_sessions: Option<StickySessions>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tag: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub droplet_ids: Vec<u64>,
    pub redirect_http_to_https: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vpc_uuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_lets_encrypt_dns_records: Option<bool>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_idle_timeout_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firewall: Option<LbFirewall>,
}

#[derive(Deserialize)]
struct LoadBalancerRoot {
    load_balancer: LoadBalancer,
}

#[derive(Deserialize)]
struct LoadBalancersRoot {
    #[serde(default)]
    load_balancers: Vec<LoadBalancer>,
}

#[derive(Serialize)]
struct DropletIdsRequest<'a> {
    droplet_ids: &'a [u64],
}

#[derive(Serialize)]
struct ForwardingRulesRequest<'a> {
    forwarding_rules: &'a [ForwardingRule],
}

pub struct LoadBalancersService<'a> {
    client: &'a Client,
}

impl<'a> LoadBalancersService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, opts: &ListOptions) -> Result<(Vec<LoadBalancer>, Response)> {
        let path = add_options(LOAD_BALANCERS_PATH, opts)?;
        let (root, resp): (LoadBalancersRoot, _) = self.client.get(&path).await?;
        Ok((root.load_balancers, resp))
    }

    pub async fn get(&self, id: &str) -> Result<(LoadBalancer, Response)> {
        let path = lb_path(id)?;
        let (root, resp): (LoadBalancerRoot, _) = self.client.get(&path).await?;
        Ok((root.load_balancer, resp))
    }

    pub async fn create(&self, req: &LoadBalancerRequest) -> Result<(LoadBalancer, Response)> {
        let (root, resp): (LoadBalancerRoot, _) =
            self.client.post(LOAD_BALANCERS_PATH, req).await?;
        Ok((root.load_balancer, resp))
    }

    /// Replace the configuration. Omitted fields revert to their defaults.
    pub async fn update(&self, id: &str, req: &LoadBalancerRequest) -> Result<(LoadBalancer, Response)> {
        let path = lb_path(id)?;
        let (root, resp): (LoadBalancerRoot, _) = self.client.put(&path, req).await?;
        Ok((root.load_balancer, resp))
    }

    pub async fn delete(&self, id: &str) -> Result<Response> {
        let path = lb_path(id)?;
        self.client.delete(&path).await
    }

    pub async fn add_droplets(&self, id: &str, droplet_ids: &[u64]) -> Result<Response> {
        let path = format!("{}/droplets", lb_path(id)?);
        self.client
            .send_empty(reqwest::Method::POST, &path, Some(&DropletIdsRequest { droplet_ids }))
            .await
    }

    pub async fn remove_droplets(&self, id: &str, droplet_ids: &[u64]) -> Result<Response> {
        let path = format!("{}/droplets", lb_path(id)?);
        self.client
            .send_empty(reqwest::Method::DELETE, &path, Some(&DropletIdsRequest { droplet_ids }))
            .await
    }

    pub async fn add_forwarding_rules(&self, id: &str, rules: &[ForwardingRule]) -> Result<Response> {
        let path = format!("{}/forwarding_rules", lb_path(id)?);
        let body = ForwardingRulesRequest {
            forwarding_rules: rules,
        };
        self.client
            .send_empty(reqwest::Method::POST, &path, Some(&body))
            .await
    }

    pub async fn remove_forwarding_rules(
        &self,
        id: &str,
        rules: &[ForwardingRule],
    ) -> Result<Response> {
        let path = format!("{}/forwarding_rules", lb_path(id)?);
        let body = ForwardingRulesRequest {
            forwarding_rules: rules,
        };
        self.client
            .send_empty(reqwest::Method::DELETE, &path, Some(&body))
            .await
    }
}

fn lb_path(id: &str) -> Result<String> {
    require_non_empty("lbID", id)?;
    Ok(format!("{}/{}", LOAD_BALANCERS_PATH, urlencoding::encode(id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_as_request_keeps_configuration() {
        let lb: LoadBalancer = serde_json::from_value(json!({
            "id": "37e6be88-01ec-4ec7-9bc6-a514d4719057",
            "name": "example-lb-01",
            "algorithm": "round_robin",
            "region": {"slug": "nyc1", "name": "New York 1"},
            "forwarding_rules": [
                {"entry_protocol": "http", "entry_port": 80, "target_protocol": "http", "target_port": 80}
            ],
            "droplet_ids": [2, 21],
            "redirect_http_to_https": true
        }))
        .unwrap();

        let req = lb.as_request();
        assert_eq!(req.region, "nyc1");
        assert_eq!(req.droplet_ids, vec![2, 21]);
        assert!(req.redirect_http_to_https);
        assert_eq!(req.forwarding_rules[0].entry_port, 80);
        assert_eq!(lb.urn(), "do:loadbalancer:37e6be88-01ec-4ec7-9bc6-a514d4719057");
    }

    #[test]
    fn test_health_check_omits_unset_thresholds() {
        let hc = HealthCheck {
            protocol: "http".to_string(),
            port: 80,
            path: "/index.html".to_string(),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&hc).unwrap(),
            json!({"protocol": "http", "port": 80, "path": "/index.html"})
        );
    }
}
