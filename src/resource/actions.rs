//! Actions: records of events that happened to a resource

use crate::api::{add_options, require_positive, Client, ListOptions, Response, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::regions::Region;

const ACTIONS_PATH: &str = "/v2/actions";

pub const ACTION_IN_PROGRESS: &str = "in-progress";
pub const ACTION_COMPLETED: &str = "completed";
pub const ACTION_ERRORED: &str = "errored";

/// Free-form body of an action request, e.g. `{"type": "reboot"}`.
pub type ActionRequest = serde_json::Map<String, serde_json::Value>;

/// Build an [`ActionRequest`] with only a `type`.
pub fn action_request(action_type: &str) -> ActionRequest {
    let mut req = ActionRequest::new();
    req.insert("type".to_string(), action_type.into());
    req
}

/// An action taken on a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "type", default)]
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resource_id: u64,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region_slug: String,
}

impl Action {
    pub fn is_in_progress(&self) -> bool {
        self.status == ACTION_IN_PROGRESS
    }

    pub fn is_completed(&self) -> bool {
        self.status == ACTION_COMPLETED
    }
}

#[derive(Deserialize)]
pub(crate) struct ActionRoot {
    pub(crate) action: Action,
}

#[derive(Deserialize)]
pub(crate) struct ActionsRoot {
    #[serde(default)]
    pub(crate) actions: Vec<Action>,
}

pub struct ActionsService<'a> {
    client: &'a Client,
}

impl<'a> ActionsService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, opts: &ListOptions) -> Result<(Vec<Action>, Response)> {
        let path = add_options(ACTIONS_PATH, opts)?;
        let (root, resp): (ActionsRoot, _) = self.client.get(&path).await?;
        Ok((root.actions, resp))
    }

    pub async fn get(&self, id: u64) -> Result<(Action, Response)> {
        require_positive("id", id)?;
        let path = format!("{}/{}", ACTIONS_PATH, id);
        let (root, resp): (ActionRoot, _) = self.client.get(&path).await?;
        Ok((root.action, resp))
    }

    /// Fetch an action from the monitor URI handed out by a create call.
    pub async fn get_by_uri(&self, uri: &str) -> Result<(Action, Response)> {
        let (root, resp): (ActionRoot, _) = self.client.get(uri).await?;
        Ok((root.action, resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_request() {
        let req = action_request("reboot");
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({"type": "reboot"}));
    }

    #[test]
    fn test_action_status() {
        let action: Action = serde_json::from_value(json!({"status": "in-progress"})).unwrap();
        assert!(action.is_in_progress());
        assert!(!action.is_completed());
        assert_eq!(action.started_at, None);
    }

    #[test]
    fn test_action_timestamps() {
        let action: Action = serde_json::from_value(json!({
            "id": 1,
            "status": "completed",
            "type": "create",
            "started_at": "2014-11-14T16:29:21Z",
            "completed_at": "2014-11-14T16:30:06Z",
            "resource_id": 3164444,
            "resource_type": "droplet",
            "region_slug": "nyc3"
        }))
        .unwrap();
        assert!(action.is_completed());
        assert_eq!(action.action_type, "create");
        assert_eq!(action.completed_at.unwrap().timestamp(), 1415982606);
    }
}
