//! Polling helpers for long-running actions
//!
//! Creating an image or a droplet returns a monitor URI (the `create`
//! action link). These helpers poll it until the action finishes.

use crate::api::{Client, Error, Result};
use crate::resource::actions::{ACTION_COMPLETED, ACTION_IN_PROGRESS};
use std::time::Duration;
use tracing::{debug, warn};

/// How often and how patiently to poll an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub interval: Duration,
    /// Consecutive fetch failures tolerated before giving up
    pub max_failures: u32,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_failures: 3,
        }
    }
}

/// Wait for an image to become available.
pub async fn wait_for_available(client: &Client, monitor_uri: &str) -> Result<()> {
    wait_for_action(client, monitor_uri, PollOptions::default()).await
}

/// Wait for a droplet to become active.
pub async fn wait_for_active(client: &Client, monitor_uri: &str) -> Result<()> {
    wait_for_action(client, monitor_uri, PollOptions::default()).await
}

/// Poll `monitor_uri` until its action completes.
///
/// Any status other than `in-progress` or `completed` is an error. A fetch
/// error is returned once more than `max_failures` happen in a row.
pub async fn wait_for_action(client: &Client, monitor_uri: &str, opts: PollOptions) -> Result<()> {
    if monitor_uri.is_empty() {
        return Err(Error::InvalidResponse("create had no monitor URI".to_string()));
    }

    let mut failures = 0;
    loop {
        match client.actions().get_by_uri(monitor_uri).await {
            Ok((action, _)) => {
                failures = 0;
                match action.status.as_str() {
                    ACTION_IN_PROGRESS => debug!("Action {} still in progress", action.id),
                    ACTION_COMPLETED => return Ok(()),
                    other => {
                        return Err(Error::InvalidResponse(format!("unknown status: [{}]", other)))
                    }
                }
            }
            Err(e) => {
                failures += 1;
                if failures > opts.max_failures {
                    return Err(e);
                }
                warn!("Polling {} failed ({}/{}): {}", monitor_uri, failures, opts.max_failures, e);
            }
        }

        tokio::time::sleep(opts.interval).await;
    }
}
