//! Domains and their DNS records

use crate::api::{
    add_options, require_non_empty, require_positive, ArgError, Client, ListOptions, Response,
    Result,
};
use crate::api::options::is_zero;
use serde::{Deserialize, Serialize};

const DOMAINS_PATH: &str = "/v2/domains";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ttl: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone_file: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DomainCreateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ip_address: String,
}

/// A DNS record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    #[serde(default)]
    pub id: u64,
    #[serde(rename = "type", default)]
    pub record_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub port: u32,
    #[serde(default)]
    pub ttl: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub flags: u32,
    #[serde(default)]
    pub tag: String,
}

/// Body of a record create or edit. Zero fields are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecordEditRequest {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub record_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub priority: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub port: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub ttl: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub weight: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub flags: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
}

#[derive(Deserialize)]
struct DomainRoot {
    domain: Domain,
}

#[derive(Deserialize)]
struct DomainsRoot {
    #[serde(default)]
    domains: Vec<Domain>,
}

#[derive(Deserialize)]
struct DomainRecordRoot {
    domain_record: DomainRecord,
}

#[derive(Deserialize)]
struct DomainRecordsRoot {
    #[serde(default)]
    domain_records: Vec<DomainRecord>,
}

#[derive(Serialize)]
struct RecordFilter<'a> {
    #[serde(flatten)]
    list: &'a ListOptions,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    record_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

fn require_non_empty_string(arg: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ArgError::new(arg, "cannot be an empty string").into());
    }
    Ok(())
}

pub struct DomainsService<'a> {
    client: &'a Client,
}

impl<'a> DomainsService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, opts: &ListOptions) -> Result<(Vec<Domain>, Response)> {
        let path = add_options(DOMAINS_PATH, opts)?;
        let (root, resp): (DomainsRoot, _) = self.client.get(&path).await?;
        Ok((root.domains, resp))
    }

    pub async fn get(&self, name: &str) -> Result<(Domain, Response)> {
        require_non_empty("name", name)?;
        let path = format!("{}/{}", DOMAINS_PATH, name);
        let (root, resp): (DomainRoot, _) = self.client.get(&path).await?;
        Ok((root.domain, resp))
    }

    pub async fn create(&self, req: &DomainCreateRequest) -> Result<(Domain, Response)> {
        let (root, resp): (DomainRoot, _) = self.client.post(DOMAINS_PATH, req).await?;
        Ok((root.domain, resp))
    }

    pub async fn delete(&self, name: &str) -> Result<Response> {
        require_non_empty("name", name)?;
        self.client.delete(&format!("{}/{}", DOMAINS_PATH, name)).await
    }

    /// All records of a domain.
    pub async fn records(&self, domain: &str, opts: &ListOptions) -> Result<(Vec<DomainRecord>, Response)> {
        self.list_records(domain, opts, None, None).await
    }

    /// Records of one type, e.g. `A` or `CNAME`.
    pub async fn records_by_type(
        &self,
        domain: &str,
        record_type: &str,
        opts: &ListOptions,
    ) -> Result<(Vec<DomainRecord>, Response)> {
        require_non_empty_string("type", record_type)?;
        self.list_records(domain, opts, Some(record_type), None).await
    }

    /// Records with a fully qualified name.
    pub async fn records_by_name(
        &self,
        domain: &str,
        name: &str,
        opts: &ListOptions,
    ) -> Result<(Vec<DomainRecord>, Response)> {
        require_non_empty_string("name", name)?;
        self.list_records(domain, opts, None, Some(name)).await
    }

    pub async fn records_by_type_and_name(
        &self,
        domain: &str,
        record_type: &str,
        name: &str,
        opts: &ListOptions,
    ) -> Result<(Vec<DomainRecord>, Response)> {
        require_non_empty_string("type", record_type)?;
        require_non_empty_string("name", name)?;
        self.list_records(domain, opts, Some(record_type), Some(name)).await
    }

    async fn list_records(
        &self,
        domain: &str,
        opts: &ListOptions,
        record_type: Option<&str>,
        name: Option<&str>,
    ) -> Result<(Vec<DomainRecord>, Response)> {
        require_non_empty("domain", domain)?;
        let filter = RecordFilter {
            list: opts,
            record_type,
            name,
        };
        let path = add_options(&format!("{}/{}/records", DOMAINS_PATH, domain), &filter)?;
        let (root, resp): (DomainRecordsRoot, _) = self.client.get(&path).await?;
        Ok((root.domain_records, resp))
    }

    pub async fn record(&self, domain: &str, id: u64) -> Result<(DomainRecord, Response)> {
        let path = record_path(domain, id)?;
        let (root, resp): (DomainRecordRoot, _) = self.client.get(&path).await?;
        Ok((root.domain_record, resp))
    }

    pub async fn create_record(
        &self,
        domain: &str,
        req: &DomainRecordEditRequest,
    ) -> Result<(DomainRecord, Response)> {
        require_non_empty("domain", domain)?;
        let path = format!("{}/{}/records", DOMAINS_PATH, domain);
        let (root, resp): (DomainRecordRoot, _) = self.client.post(&path, req).await?;
        Ok((root.domain_record, resp))
    }

    pub async fn edit_record(
        &self,
        domain: &str,
        id: u64,
        req: &DomainRecordEditRequest,
    ) -> Result<(DomainRecord, Response)> {
        let path = record_path(domain, id)?;
        let (root, resp): (DomainRecordRoot, _) = self.client.put(&path, req).await?;
        Ok((root.domain_record, resp))
    }

    pub async fn delete_record(&self, domain: &str, id: u64) -> Result<Response> {
        let path = record_path(domain, id)?;
        self.client.delete(&path).await
    }
}

fn record_path(domain: &str, id: u64) -> Result<String> {
    require_non_empty("domain", domain)?;
    require_positive("id", id)?;
    Ok(format!("{}/{}/records/{}", DOMAINS_PATH, domain, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_edit_request_omits_zero_fields() {
        let req = DomainRecordEditRequest {
            record_type: "CNAME".to_string(),
            name: "example".to_string(),
            data: "@".to_string(),
            ttl: 1800,
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"type": "CNAME", "name": "example", "data": "@", "ttl": 1800})
        );
    }

    #[test]
    fn test_empty_filter_is_rejected() {
        let err = require_non_empty_string("type", "").unwrap_err();
        assert_eq!(err.to_string(), "type is invalid because cannot be an empty string");
    }
}
