//! Regions: datacenters resources can be created in

use crate::api::{add_options, Client, ListOptions, Response, Result};
use serde::{Deserialize, Serialize};

const REGIONS_PATH: &str = "/v2/regions";

/// A datacenter region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub name: String,
    /// Size slugs available in this region
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Deserialize)]
struct RegionsRoot {
    #[serde(default)]
    regions: Vec<Region>,
}

pub struct RegionsService<'a> {
    client: &'a Client,
}

impl<'a> RegionsService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, opts: &ListOptions) -> Result<(Vec<Region>, Response)> {
        let path = add_options(REGIONS_PATH, opts)?;
        let (root, resp): (RegionsRoot, _) = self.client.get(&path).await?;
        Ok((root.regions, resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_regions_root() {
        let root: RegionsRoot = serde_json::from_value(json!({
            "regions": [
                {"slug": "nyc3", "name": "New York 3", "sizes": ["s-1vcpu-1gb"], "available": true, "features": ["backups"]},
                {"slug": "ams2", "name": "Amsterdam 2", "available": false}
            ]
        }))
        .unwrap();

        assert_eq!(root.regions.len(), 2);
        assert_eq!(root.regions[0].sizes, vec!["s-1vcpu-1gb"]);
        assert!(!root.regions[1].available);
        assert!(root.regions[1].features.is_empty());
    }
}
