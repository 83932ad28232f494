//! 1-Click applications for droplets and Kubernetes

use crate::api::{add_options, Client, Response, Result};
use serde::{Deserialize, Serialize};

const ONE_CLICK_PATH: &str = "/v2/1-click";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneClick {
    #[serde(default)]
    pub slug: String,
    /// `droplet` or `kubernetes`
    #[serde(rename = "type", default)]
    pub app_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallKubernetesAppsRequest {
    #[serde(rename = "addon_slugs")]
    pub slugs: Vec<String>,
    pub cluster_uuid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InstallKubernetesAppsResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize)]
struct TypeFilter<'a> {
    #[serde(rename = "type", skip_serializing_if = "str::is_empty")]
    app_type: &'a str,
}

#[derive(Deserialize)]
struct OneClicksRoot {
    #[serde(default)]
    list: Vec<OneClick>,
}

pub struct OneClickService<'a> {
    client: &'a Client,
}

impl<'a> OneClickService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Apps of the given type, or all of them when `app_type` is empty.
    pub async fn list(&self, app_type: &str) -> Result<(Vec<OneClick>, Response)> {
        let path = add_options(ONE_CLICK_PATH, &TypeFilter { app_type })?;
        let (root, resp): (OneClicksRoot, _) = self.client.get(&path).await?;
        Ok((root.list, resp))
    }

    pub async fn install_kubernetes(
        &self,
        req: &InstallKubernetesAppsRequest,
    ) -> Result<(InstallKubernetesAppsResponse, Response)> {
        let path = format!("{}/kubernetes", ONE_CLICK_PATH);
        self.client.post(&path, req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_filter() {
        assert_eq!(
            add_options(ONE_CLICK_PATH, &TypeFilter { app_type: "kubernetes" }).unwrap(),
            "/v2/1-click?type=kubernetes"
        );
        assert_eq!(
            add_options(ONE_CLICK_PATH, &TypeFilter { app_type: "" }).unwrap(),
            "/v2/1-click"
        );
    }

    #[test]
    fn test_install_request_body() {
        let req = InstallKubernetesAppsRequest {
            slugs: vec!["netdata".to_string()],
            cluster_uuid: "8ab12c".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"addon_slugs": ["netdata"], "cluster_uuid": "8ab12c"})
        );
    }
}
