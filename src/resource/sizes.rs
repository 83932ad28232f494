//! Sizes: droplet plans and their prices

use crate::api::{add_options, Client, ListOptions, Response, Result};
use serde::{Deserialize, Serialize};

const SIZES_PATH: &str = "/v2/sizes";

/// A droplet size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    #[serde(default)]
    pub slug: String,
    /// Memory in MiB
    #[serde(default)]
    pub memory: u64,
    #[serde(default)]
    pub vcpus: u32,
    /// Disk in GiB
    #[serde(default)]
    pub disk: u64,
    #[serde(default)]
    pub price_monthly: f64,
    #[serde(default)]
    pub price_hourly: f64,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub available: bool,
    /// Outbound transfer in TiB
    #[serde(default)]
    pub transfer: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_info: Option<GpuInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disk_info: Vec<DiskInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskInfo {
    #[serde(rename = "type", default)]
    pub disk_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<DiskSize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskSize {
    #[serde(default)]
    pub amount: u64,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpuInfo {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vram: Option<DiskSize>,
}

#[derive(Deserialize)]
struct SizesRoot {
    #[serde(default)]
    sizes: Vec<Size>,
}

pub struct SizesService<'a> {
    client: &'a Client,
}

impl<'a> SizesService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, opts: &ListOptions) -> Result<(Vec<Size>, Response)> {
        let path = add_options(SIZES_PATH, opts)?;
        let (root, resp): (SizesRoot, _) = self.client.get(&path).await?;
        Ok((root.sizes, resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gpu_size_decodes() {
        let size: Size = serde_json::from_value(json!({
            "slug": "gpu-h100x1-80gb",
            "memory": 245760,
            "vcpus": 20,
            "disk": 720,
            "price_monthly": 4529.28,
            "price_hourly": 6.74,
            "regions": ["tor1"],
            "available": true,
            "transfer": 15,
            "gpu_info": {"count": 1, "model": "nvidia_h100", "vram": {"amount": 80, "unit": "gib"}},
            "disk_info": [
                {"type": "local", "size": {"amount": 720, "unit": "gib"}},
                {"type": "scratch", "size": {"amount": 5120, "unit": "gib"}}
            ]
        }))
        .unwrap();

        let gpu = size.gpu_info.unwrap();
        assert_eq!(gpu.model, "nvidia_h100");
        assert_eq!(gpu.vram.unwrap().amount, 80);
        assert_eq!(size.disk_info[1].disk_type, "scratch");
        assert_eq!(size.transfer, 15.0);
    }

    #[test]
    fn test_list_path() {
        assert_eq!(
            add_options(SIZES_PATH, &ListOptions::new(2, 50)).unwrap(),
            "/v2/sizes?page=2&per_page=50"
        );
    }
}
