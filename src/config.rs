//! Configuration Management
//!
//! Handles persistent configuration storage for docean.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_BASE_URL;

/// Page size used when nothing else asks for one
pub const DEFAULT_PER_PAGE: u32 = 50;

/// How the CLI prints results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// API endpoint override, e.g. a staging environment
    #[serde(default)]
    pub api_url: Option<String>,
    /// Default page size for list commands
    #[serde(default)]
    pub per_page: Option<u32>,
    /// Default output format
    #[serde(default)]
    pub output: Option<OutputFormat>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("docean").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load configuration from `path`. A missing or unreadable file yields the defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;

        Ok(())
    }

    /// Get effective API URL (CLI > config > default)
    pub fn effective_api_url(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Get effective page size (CLI > config > default)
    pub fn effective_per_page(&self, cli: Option<u32>) -> u32 {
        cli.or(self.per_page).unwrap_or(DEFAULT_PER_PAGE)
    }

    /// Get effective output format (CLI > config > default)
    pub fn effective_output(&self, cli: Option<OutputFormat>) -> OutputFormat {
        cli.or(self.output).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            api_url: Some("https://api.staging.example.com/".to_string()),
            per_page: Some(200),
            output: Some(OutputFormat::Yaml),
        };
        config.save_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"output\": \"yaml\""));
        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_malformed_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_precedence() {
        let config = Config {
            api_url: Some("https://config.example.com/".to_string()),
            per_page: Some(20),
            output: None,
        };

        assert_eq!(
            config.effective_api_url(Some("https://cli.example.com/")),
            "https://cli.example.com/"
        );
        assert_eq!(config.effective_api_url(None), "https://config.example.com/");
        assert_eq!(Config::default().effective_api_url(None), DEFAULT_BASE_URL);

        assert_eq!(config.effective_per_page(Some(5)), 5);
        assert_eq!(config.effective_per_page(None), 20);
        assert_eq!(Config::default().effective_per_page(None), DEFAULT_PER_PAGE);

        assert_eq!(config.effective_output(None), OutputFormat::Json);
        assert_eq!(
            config.effective_output(Some(OutputFormat::Yaml)),
            OutputFormat::Yaml
        );
    }
}
