//! Token handling
//!
//! Personal access tokens are read, in order, from `DIGITALOCEAN_ACCESS_TOKEN`,
//! `DIGITALOCEAN_TOKEN`, and the doctl configuration file.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const TOKEN_ENV_VARS: &[&str] = &["DIGITALOCEAN_ACCESS_TOKEN", "DIGITALOCEAN_TOKEN"];

/// Strip surrounding whitespace and single quotes from a pasted token.
pub fn clean_token(raw: &str) -> String {
    raw.trim().trim_matches('\'').to_string()
}

/// A usable token is non-empty and has no whitespace left after cleaning.
fn validate_token(token: &str) -> bool {
    !token.is_empty() && !token.chars().any(char::is_whitespace)
}

/// The subset of doctl's `config.yaml` we read.
#[derive(Debug, Default, Deserialize)]
struct DoctlConfig {
    #[serde(rename = "access-token", default)]
    access_token: Option<String>,
    #[serde(default)]
    context: Option<String>,
    #[serde(rename = "auth-contexts", default)]
    auth_contexts: HashMap<String, String>,
}

impl DoctlConfig {
    /// Token of the active context, falling back to the top-level token.
    fn active_token(&self) -> Option<&str> {
        match self.context.as_deref() {
            Some(ctx) if ctx != "default" => self.auth_contexts.get(ctx).map(String::as_str),
            _ => self.access_token.as_deref(),
        }
    }
}

/// Get the doctl configuration file path
pub fn doctl_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("doctl").join("config.yaml"))
}

/// Read the active token from a doctl configuration file.
pub fn read_doctl_token(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let config: DoctlConfig = match serde_yaml::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to parse {}: {}", path.display(), e);
            return None;
        }
    };

    let token = clean_token(config.active_token()?);
    if validate_token(&token) {
        Some(token)
    } else {
        tracing::warn!("Invalid token format in {}", path.display());
        None
    }
}

/// Find a token in the environment or the doctl configuration.
pub fn default_token() -> Option<String> {
    for var in TOKEN_ENV_VARS {
        if let Ok(raw) = std::env::var(var) {
            let token = clean_token(&raw);
            if validate_token(&token) {
                return Some(token);
            }
            tracing::warn!("Invalid token format in {}", var);
        }
    }

    read_doctl_token(&doctl_config_path()?)
}
