//! Serverless functions: namespaces and their triggers
//!
//! Neither collection is paginated, so the list calls take no options.

use crate::api::{require_non_empty, Client, Response, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const NAMESPACES_PATH: &str = "/v2/functions/namespaces";

pub const TRIGGER_TYPE_SCHEDULED: &str = "SCHEDULED";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionsNamespace {
    #[serde(default)]
    pub api_host: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FunctionsNamespaceCreateRequest {
    pub label: String,
    pub region: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionsTrigger {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub function: String,
    #[serde(rename = "type", default)]
    pub trigger_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_details: Option<TriggerScheduledDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_runs: Option<TriggerScheduledRuns>,
}

/// Cron schedule and the body the function is invoked with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerScheduledDetails {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cron: String,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub body: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerScheduledRuns {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_run_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FunctionsTriggerCreateRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub trigger_type: String,
    pub function: String,
    #[serde(skip_serializing_if = "crate::api::options::is_false")]
    pub is_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_details: Option<TriggerScheduledDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FunctionsTriggerUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_details: Option<TriggerScheduledDetails>,
}

#[derive(Deserialize)]
struct NamespaceRoot {
    namespace: FunctionsNamespace,
}

#[derive(Deserialize)]
struct NamespacesRoot {
    #[serde(default)]
    namespaces: Vec<FunctionsNamespace>,
}

#[derive(Deserialize)]
struct TriggerRoot {
    trigger: FunctionsTrigger,
}

#[derive(Deserialize)]
struct TriggersRoot {
    #[serde(default)]
    triggers: Vec<FunctionsTrigger>,
}

pub struct FunctionsService<'a> {
    client: &'a Client,
}

impl<'a> FunctionsService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list_namespaces(&self) -> Result<(Vec<FunctionsNamespace>, Response)> {
        let (root, resp): (NamespacesRoot, _) = self.client.get(NAMESPACES_PATH).await?;
        Ok((root.namespaces, resp))
    }

    pub async fn get_namespace(&self, namespace: &str) -> Result<(FunctionsNamespace, Response)> {
        let path = namespace_path(namespace)?;
        let (root, resp): (NamespaceRoot, _) = self.client.get(&path).await?;
        Ok((root.namespace, resp))
    }

    pub async fn create_namespace(
        &self,
        req: &FunctionsNamespaceCreateRequest,
    ) -> Result<(FunctionsNamespace, Response)> {
        let (root, resp): (NamespaceRoot, _) = self.client.post(NAMESPACES_PATH, req).await?;
        Ok((root.namespace, resp))
    }

    pub async fn delete_namespace(&self, namespace: &str) -> Result<Response> {
        let path = namespace_path(namespace)?;
        self.client.delete(&path).await
    }

    pub async fn list_triggers(&self, namespace: &str) -> Result<(Vec<FunctionsTrigger>, Response)> {
        let path = format!("{}/triggers", namespace_path(namespace)?);
        let (root, resp): (TriggersRoot, _) = self.client.get(&path).await?;
        Ok((root.triggers, resp))
    }

    pub async fn get_trigger(
        &self,
        namespace: &str,
        trigger: &str,
    ) -> Result<(FunctionsTrigger, Response)> {
        let path = trigger_path(namespace, trigger)?;
        let (root, resp): (TriggerRoot, _) = self.client.get(&path).await?;
        Ok((root.trigger, resp))
    }

    pub async fn create_trigger(
        &self,
        namespace: &str,
        req: &FunctionsTriggerCreateRequest,
    ) -> Result<(FunctionsTrigger, Response)> {
        let path = format!("{}/triggers", namespace_path(namespace)?);
        let (root, resp): (TriggerRoot, _) = self.client.post(&path, req).await?;
        Ok((root.trigger, resp))
    }

    pub async fn update_trigger(
        &self,
        namespace: &str,
        trigger: &str,
        req: &FunctionsTriggerUpdateRequest,
    ) -> Result<(FunctionsTrigger, Response)> {
        let path = trigger_path(namespace, trigger)?;
        let (root, resp): (TriggerRoot, _) = self.client.put(&path, req).await?;
        Ok((root.trigger, resp))
    }

    pub async fn delete_trigger(&self, namespace: &str, trigger: &str) -> Result<Response> {
        let path = trigger_path(namespace, trigger)?;
        self.client.delete(&path).await
    }
}

fn namespace_path(namespace: &str) -> Result<String> {
    require_non_empty("namespace", namespace)?;
    Ok(format!("{}/{}", NAMESPACES_PATH, urlencoding::encode(namespace)))
}

fn trigger_path(namespace: &str, trigger: &str) -> Result<String> {
    require_non_empty("trigger", trigger)?;
    Ok(format!(
        "{}/triggers/{}",
        namespace_path(namespace)?,
        urlencoding::encode(trigger)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trigger_decodes_schedule() {
        let trigger: FunctionsTrigger = serde_json::from_value(json!({
            "name": "trigger",
            "namespace": "123-abc",
            "function": "hello",
            "type": "SCHEDULED",
            "is_enabled": true,
            "created_at": "2022-11-11T04:16:45Z",
            "scheduled_details": {"cron": "* * * * *", "body": {"foo": "bar"}},
            "scheduled_runs": {"next_run_at": "2022-11-03T17:03:02Z"}
        }))
        .unwrap();

        assert_eq!(trigger.trigger_type, TRIGGER_TYPE_SCHEDULED);
        let details = trigger.scheduled_details.unwrap();
        assert_eq!(details.body["foo"], "bar");
        let runs = trigger.scheduled_runs.unwrap();
        assert!(runs.last_run_at.is_none());
        assert!(runs.next_run_at.is_some());
    }

    #[test]
    fn test_update_can_disable() {
        let req = FunctionsTriggerUpdateRequest {
            is_enabled: Some(false),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({"is_enabled": false}));
    }

    #[test]
    fn test_trigger_path() {
        assert_eq!(
            trigger_path("123-abc", "trigger").unwrap(),
            "/v2/functions/namespaces/123-abc/triggers/trigger"
        );
        assert!(trigger_path("", "trigger").is_err());
    }
}
