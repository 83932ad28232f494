//! Uptime checks and their alert policies

use crate::api::{add_options, require_non_empty, Client, ListOptions, Response, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const UPTIME_CHECKS_PATH: &str = "/v2/uptime/checks";

/// A periodic check of a URL, host or port from one or more regions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UptimeCheck {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// `ping`, `http` or `https`
    #[serde(rename = "type", default)]
    pub check_type: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub enabled: bool,
}

/// Per-region status plus the most recent outage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UptimeCheckState {
    #[serde(default)]
    pub regions: BTreeMap<String, UptimeRegion>,
    #[serde(default)]
    pub previous_outage: UptimePreviousOutage,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UptimeRegion {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub status_changed_at: String,
    #[serde(default)]
    pub thirty_day_uptime_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UptimePreviousOutage {
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub started_at: String,
    #[serde(default)]
    pub ended_at: String,
    #[serde(default)]
    pub duration_seconds: u64,
}

/// Body of both create and update. Every field is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UptimeCheckRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub check_type: String,
    pub target: String,
    pub regions: Vec<String>,
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UptimeAlert {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// `latency`, `down`, `down_global` or `ssl_expiry`
    #[serde(rename = "type", default)]
    pub alert_type: String,
    #[serde(default)]
    pub threshold: i64,
    #[serde(default)]
    pub comparison: String,
    #[serde(default)]
    pub notifications: Option<Notifications>,
    #[serde(default)]
    pub period: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notifications {
    #[serde(default)]
    pub email: Vec<String>,
    #[serde(default)]
    pub slack: Vec<SlackDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackDetails {
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UptimeAlertRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub alert_type: String,
    pub threshold: i64,
    pub comparison: String,
    pub notifications: Option<Notifications>,
    pub period: String,
}

#[derive(Deserialize)]
struct CheckRoot {
    check: UptimeCheck,
}

#[derive(Deserialize)]
struct ChecksRoot {
    #[serde(default)]
    checks: Vec<UptimeCheck>,
}

#[derive(Deserialize)]
struct StateRoot {
    state: UptimeCheckState,
}

#[derive(Deserialize)]
struct AlertRoot {
    alert: UptimeAlert,
}

#[derive(Deserialize)]
struct AlertsRoot {
    #[serde(default)]
    alerts: Vec<UptimeAlert>,
}

pub struct UptimeChecksService<'a> {
    client: &'a Client,
}

impl<'a> UptimeChecksService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, opts: &ListOptions) -> Result<(Vec<UptimeCheck>, Response)> {
        let path = add_options(UPTIME_CHECKS_PATH, opts)?;
        let (root, resp): (ChecksRoot, _) = self.client.get(&path).await?;
        Ok((root.checks, resp))
    }

    pub async fn get(&self, check_id: &str) -> Result<(UptimeCheck, Response)> {
        let path = check_path(check_id)?;
        let (root, resp): (CheckRoot, _) = self.client.get(&path).await?;
        Ok((root.check, resp))
    }

    pub async fn get_state(&self, check_id: &str) -> Result<(UptimeCheckState, Response)> {
        let path = format!("{}/state", check_path(check_id)?);
        let (root, resp): (StateRoot, _) = self.client.get(&path).await?;
        Ok((root.state, resp))
    }

    pub async fn create(&self, req: &UptimeCheckRequest) -> Result<(UptimeCheck, Response)> {
        let (root, resp): (CheckRoot, _) = self.client.post(UPTIME_CHECKS_PATH, req).await?;
        Ok((root.check, resp))
    }

    pub async fn update(
        &self,
        check_id: &str,
        req: &UptimeCheckRequest,
    ) -> Result<(UptimeCheck, Response)> {
        let path = check_path(check_id)?;
        let (root, resp): (CheckRoot, _) = self.client.put(&path, req).await?;
        Ok((root.check, resp))
    }

    pub async fn delete(&self, check_id: &str) -> Result<Response> {
        let path = check_path(check_id)?;
        self.client.delete(&path).await
    }

    pub async fn list_alerts(
        &self,
        check_id: &str,
        opts: &ListOptions,
    ) -> Result<(Vec<UptimeAlert>, Response)> {
        let path = add_options(&format!("{}/alerts", check_path(check_id)?), opts)?;
        let (root, resp): (AlertsRoot, _) = self.client.get(&path).await?;
        Ok((root.alerts, resp))
    }

    pub async fn get_alert(&self, check_id: &str, alert_id: &str) -> Result<(UptimeAlert, Response)> {
        let path = alert_path(check_id, alert_id)?;
        let (root, resp): (AlertRoot, _) = self.client.get(&path).await?;
        Ok((root.alert, resp))
    }

    pub async fn create_alert(
        &self,
        check_id: &str,
        req: &UptimeAlertRequest,
    ) -> Result<(UptimeAlert, Response)> {
        let path = format!("{}/alerts", check_path(check_id)?);
        let (root, resp): (AlertRoot, _) = self.client.post(&path, req).await?;
        Ok((root.alert, resp))
    }

    pub async fn update_alert(
        &self,
        check_id: &str,
        alert_id: &str,
        req: &UptimeAlertRequest,
    ) -> Result<(UptimeAlert, Response)> {
        let path = alert_path(check_id, alert_id)?;
        let (root, resp): (AlertRoot, _) = self.client.put(&path, req).await?;
        Ok((root.alert, resp))
    }

    pub async fn delete_alert(&self, check_id: &str, alert_id: &str) -> Result<Response> {
        let path = alert_path(check_id, alert_id)?;
        self.client.delete(&path).await
    }
}

fn check_path(check_id: &str) -> Result<String> {
    require_non_empty("uptimeCheckID", check_id)?;
    Ok(format!("{}/{}", UPTIME_CHECKS_PATH, urlencoding::encode(check_id)))
}

fn alert_path(check_id: &str, alert_id: &str) -> Result<String> {
    require_non_empty("alertID", alert_id)?;
    Ok(format!(
        "{}/alerts/{}",
        check_path(check_id)?,
        urlencoding::encode(alert_id)
    ))
}
