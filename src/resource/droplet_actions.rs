//! Droplet actions: power management, resizing, snapshots and backups

use crate::api::{require_positive, Client, Response, Result};
use serde_json::Value;

use super::actions::{action_request, Action, ActionRequest, ActionRoot};

pub struct DropletActionsService<'a> {
    client: &'a Client,
}

impl<'a> DropletActionsService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn shutdown(&self, id: u64) -> Result<(Action, Response)> {
        self.perform(id, &action_request("shutdown")).await
    }

    pub async fn power_off(&self, id: u64) -> Result<(Action, Response)> {
        self.perform(id, &action_request("power_off")).await
    }

    pub async fn power_on(&self, id: u64) -> Result<(Action, Response)> {
        self.perform(id, &action_request("power_on")).await
    }

    pub async fn power_cycle(&self, id: u64) -> Result<(Action, Response)> {
        self.perform(id, &action_request("power_cycle")).await
    }

    pub async fn reboot(&self, id: u64) -> Result<(Action, Response)> {
        self.perform(id, &action_request("reboot")).await
    }

    pub async fn rename(&self, id: u64, name: &str) -> Result<(Action, Response)> {
        let mut req = action_request("rename");
        req.insert("name".to_string(), Value::from(name));
        self.perform(id, &req).await
    }

    /// Resize to `size`. With `resize_disk` the change is permanent.
    pub async fn resize(&self, id: u64, size: &str, resize_disk: bool) -> Result<(Action, Response)> {
        let mut req = action_request("resize");
        req.insert("size".to_string(), Value::from(size));
        req.insert("disk".to_string(), Value::from(resize_disk));
        self.perform(id, &req).await
    }

    pub async fn snapshot(&self, id: u64, name: &str) -> Result<(Action, Response)> {
        let mut req = action_request("snapshot");
        req.insert("name".to_string(), Value::from(name));
        self.perform(id, &req).await
    }

    pub async fn enable_backups(&self, id: u64) -> Result<(Action, Response)> {
        self.perform(id, &action_request("enable_backups")).await
    }

    pub async fn disable_backups(&self, id: u64) -> Result<(Action, Response)> {
        self.perform(id, &action_request("disable_backups")).await
    }

    /// Send an arbitrary action request.
    pub async fn perform(&self, id: u64, req: &ActionRequest) -> Result<(Action, Response)> {
        require_positive("dropletID", id)?;
        let path = format!("/v2/droplets/{}/actions", id);
        let (root, resp): (ActionRoot, _) = self.client.post(&path, req).await?;
        Ok((root.action, resp))
    }

    pub async fn get(&self, id: u64, action_id: u64) -> Result<(Action, Response)> {
        require_positive("dropletID", id)?;
        require_positive("actionID", action_id)?;
        let path = format!("/v2/droplets/{}/actions/{}", id, action_id);
        let (root, resp): (ActionRoot, _) = self.client.get(&path).await?;
        Ok((root.action, resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_ids_are_rejected() {
        let client = Client::from_token("token").unwrap();
        let actions = client.droplet_actions();

        let err = actions.reboot(0).await.unwrap_err();
        assert_eq!(err.to_string(), "dropletID is invalid because cannot be less than 1");

        let err = actions.get(1, 0).await.unwrap_err();
        assert_eq!(err.to_string(), "actionID is invalid because cannot be less than 1");
    }
}
