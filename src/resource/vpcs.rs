//! Virtual private clouds

use crate::api::{add_options, require_non_empty, Client, ListOptions, Response, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const VPCS_PATH: &str = "/v2/vpcs";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vpc {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub urn: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ip_range: String,
    #[serde(rename = "region", default)]
    pub region_slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VpcCreateRequest {
    pub name: String,
    pub region: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ip_range: String,
}

/// Full update. `default` may only ever be switched on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VpcUpdateRequest {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
}

/// One field of a partial (PATCH) update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VpcSetField {
    Name(String),
    Description(String),
    /// Make this the default VPC of its region.
    Default,
}

impl VpcSetField {
    fn apply(&self, body: &mut Map<String, Value>) {
        match self {
            VpcSetField::Name(name) => {
                body.insert("name".to_string(), Value::from(name.as_str()));
            }
            VpcSetField::Description(description) => {
                body.insert("description".to_string(), Value::from(description.as_str()));
            }
            VpcSetField::Default => {
                body.insert("default".to_string(), Value::Bool(true));
            }
        }
    }
}

/// A resource attached to a VPC.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VpcMember {
    #[serde(default)]
    pub urn: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct VpcRoot {
    vpc: Vpc,
}

#[derive(Deserialize)]
struct VpcsRoot {
    #[serde(default)]
    vpcs: Vec<Vpc>,
}

#[derive(Deserialize)]
struct VpcMembersRoot {
    #[serde(default)]
    members: Vec<VpcMember>,
}

#[derive(Serialize)]
struct MemberFilter<'a> {
    #[serde(flatten)]
    list: &'a ListOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    resource_type: Option<&'a str>,
}

pub struct VpcsService<'a> {
    client: &'a Client,
}

impl<'a> VpcsService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, opts: &ListOptions) -> Result<(Vec<Vpc>, Response)> {
        let path = add_options(VPCS_PATH, opts)?;
        let (root, resp): (VpcsRoot, _) = self.client.get(&path).await?;
        Ok((root.vpcs, resp))
    }

    pub async fn get(&self, id: &str) -> Result<(Vpc, Response)> {
        let path = vpc_path(id)?;
        let (root, resp): (VpcRoot, _) = self.client.get(&path).await?;
        Ok((root.vpc, resp))
    }

    pub async fn create(&self, req: &VpcCreateRequest) -> Result<(Vpc, Response)> {
        let (root, resp): (VpcRoot, _) = self.client.post(VPCS_PATH, req).await?;
        Ok((root.vpc, resp))
    }

    pub async fn update(&self, id: &str, req: &VpcUpdateRequest) -> Result<(Vpc, Response)> {
        let path = vpc_path(id)?;
        let (root, resp): (VpcRoot, _) = self.client.put(&path, req).await?;
        Ok((root.vpc, resp))
    }

    /// Change only the given fields.
    pub async fn set(&self, id: &str, fields: &[VpcSetField]) -> Result<(Vpc, Response)> {
        let path = vpc_path(id)?;
        let mut body = Map::new();
        for field in fields {
            field.apply(&mut body);
        }
        let (root, resp): (VpcRoot, _) = self.client.patch(&path, &body).await?;
        Ok((root.vpc, resp))
    }

    pub async fn delete(&self, id: &str) -> Result<Response> {
        let path = vpc_path(id)?;
        self.client.delete(&path).await
    }

    /// Resources in the VPC, optionally narrowed to one `resource_type`
    /// such as `droplet` or `load_balancer`.
    pub async fn list_members(
        &self,
        id: &str,
        resource_type: Option<&str>,
        opts: &ListOptions,
    ) -> Result<(Vec<VpcMember>, Response)> {
        let filter = MemberFilter {
            list: opts,
            resource_type,
        };
        let path = add_options(&format!("{}/members", vpc_path(id)?), &filter)?;
        let (root, resp): (VpcMembersRoot, _) = self.client.get(&path).await?;
        Ok((root.members, resp))
    }
}

fn vpc_path(id: &str) -> Result<String> {
    require_non_empty("id", id)?;
    Ok(format!("{}/{}", VPCS_PATH, urlencoding::encode(id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_fields_build_patch_body() {
        let mut body = Map::new();
        for field in [
            VpcSetField::Name("my-new-vpc".to_string()),
            VpcSetField::Description("vpc description".to_string()),
            VpcSetField::Default,
        ] {
            field.apply(&mut body);
        }
        assert_eq!(
            Value::Object(body),
            json!({"default": true, "description": "vpc description", "name": "my-new-vpc"})
        );
    }

    #[test]
    fn test_vpc_region_field() {
        let vpc: Vpc = serde_json::from_value(json!({
            "id": "880b7f98-f062-404d-b33c-458d545696f6",
            "urn": "do:vpc:880b7f98-f062-404d-b33c-458d545696f6",
            "name": "my-new-vpc",
            "ip_range": "10.122.0.0/20",
            "region": "s2r7",
            "created_at": "2019-02-04T21:48:40.995304079Z",
            "default": false
        }))
        .unwrap();
        assert_eq!(vpc.region_slug, "s2r7");
        assert_eq!(vpc.created_at.unwrap().timestamp(), 1549316920);
    }
}
