//! Account information for the authenticated user

use crate::api::{Client, Response, Result};
use serde::{Deserialize, Serialize};

const ACCOUNT_PATH: &str = "/v2/account";

/// The account the token belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub droplet_limit: u32,
    #[serde(default)]
    pub floating_ip_limit: u32,
    #[serde(default)]
    pub reserved_ip_limit: u32,
    #[serde(default)]
    pub volume_limit: u32,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamInfo>,
}

/// Team the account is acting as.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uuid: String,
}

#[derive(Deserialize)]
struct AccountRoot {
    account: Account,
}

pub struct AccountService<'a> {
    client: &'a Client,
}

impl<'a> AccountService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn get(&self) -> Result<(Account, Response)> {
        let (root, resp): (AccountRoot, _) = self.client.get(ACCOUNT_PATH).await?;
        Ok((root.account, resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_account_decodes_team() {
        let root: AccountRoot = serde_json::from_value(json!({
            "account": {
                "droplet_limit": 25,
                "floating_ip_limit": 25,
                "volume_limit": 22,
                "email": "sammy@digitalocean.com",
                "uuid": "b6fr89dbf6d9156cace5f3c78dc9851d957381ef",
                "email_verified": true,
                "status": "active",
                "team": {"uuid": "5df3e3004a17e242b7c20ca6c9fc25b701a47ece", "name": "My Team"}
            }
        }))
        .unwrap();

        let account = root.account;
        assert_eq!(account.droplet_limit, 25);
        assert_eq!(account.reserved_ip_limit, 0);
        assert!(account.email_verified);
        assert_eq!(account.team.unwrap().name, "My Team");
    }
}
