//! Configuration management for triage
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (GITHUB_GRAPHQL_URL, TRIAGE_TIMEOUT)
//! 3. Config file (~/.config/triage/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default GitHub GraphQL endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com/graphql";

/// GitHub API configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GraphQL endpoint (differs on GitHub Enterprise Server)
    pub api_url: String,

    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// GitHub API configuration
    pub github: GitHubConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/triage/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("triage").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - GITHUB_GRAPHQL_URL: GraphQL endpoint (set by GitHub Actions)
    /// - TRIAGE_TIMEOUT: request timeout, e.g. `30s` or `1m 30s`
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    fn with_overrides_from(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(api_url) = var("GITHUB_GRAPHQL_URL").filter(|v| !v.is_empty()) {
            self.github.api_url = api_url;
        }

        if let Some(timeout) = var("TRIAGE_TIMEOUT").filter(|v| !v.trim().is_empty()) {
            self.github.timeout = parse_duration(timeout.trim()).map_err(|e| {
                Error::Config(format!(
                    "TRIAGE_TIMEOUT must be a duration like '30s', got '{}': {}",
                    timeout, e
                ))
            })?;
        }

        Ok(self)
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.github.api_url = url;
        }

        self
    }

    /// Check that the settings are usable
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.github.api_url).map_err(|e| {
            Error::Config(format!("Invalid API URL '{}': {}", self.github.api_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "API URL must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.github.timeout.is_zero() {
            return Err(Error::Config("Request timeout must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(api_url: Option<String>) -> Result<Self> {
        let config = Self::load()?
            .with_env_overrides()?
            .with_cli_overrides(api_url);
        config.validate()?;
        Ok(config)
    }
}

/// Same format as the `timeout` key in the config file
fn parse_duration(value: &str) -> std::result::Result<Duration, serde_json::Error> {
    #[derive(Deserialize)]
    struct Humantime(#[serde(with = "humantime_serde")] Duration);

    serde_json::from_value::<Humantime>(serde_json::Value::String(value.to_string())).map(|d| d.0)
}
