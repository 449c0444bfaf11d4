//! Secrets management for triage
//!
//! In GitHub Actions the token arrives as a step input. For local runs it
//! can instead come from the environment or from a secrets file kept apart
//! from the configuration, at `~/.config/triage/secrets.toml`, which must
//! have restrictive permissions (0600 on Unix).
//!
//! Loading priority:
//! 1. Environment variables (GITHUB_TOKEN)
//! 2. Secrets file (~/.config/triage/secrets.toml)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Secrets structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Secrets {
    /// GitHub configuration
    pub github: GitHubSecrets,
}

/// GitHub-related secrets
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubSecrets {
    /// GitHub Personal Access Token
    pub token: Option<String>,
}

impl Secrets {
    /// Load secrets from the default location
    ///
    /// Returns default (empty) secrets if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_secrets_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load secrets from a specific file with permission checking
    pub fn load_from_file(path: &Path) -> Result<Self> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mode = std::fs::metadata(path).map_err(Error::Io)?.permissions().mode();

            if mode & 0o077 != 0 {
                return Err(Error::Config(format!(
                    "Secrets file {} has insecure permissions {:o}. \
                     Please run: chmod 600 {}",
                    path.display(),
                    mode & 0o777,
                    path.display()
                )));
            }
        }

        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        let mut secrets: Secrets = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse secrets: {}", e)))?;

        if let Some(ref mut token) = secrets.github.token {
            *token = token.trim().to_string();
        }

        debug!(path = %path.display(), "Loaded secrets file");
        Ok(secrets)
    }

    /// Get the default secrets file path
    ///
    /// Returns `~/.config/triage/secrets.toml` on Unix
    pub fn default_secrets_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("triage").join("secrets.toml"))
    }

    /// Get GitHub token with environment variable override
    ///
    /// Priority: GITHUB_TOKEN env var > secrets file
    pub fn github_token(&self) -> Option<String> {
        self.github_token_with(std::env::var("GITHUB_TOKEN").ok())
    }

    pub(crate) fn github_token_with(&self, env_token: Option<String>) -> Option<String> {
        if let Some(token) = env_token.map(|t| t.trim().to_string()) {
            if !token.is_empty() {
                debug!("Using GitHub token from GITHUB_TOKEN environment variable");
                return Some(token);
            }
        }

        match self.github.token {
            Some(ref token) if !token.is_empty() => {
                debug!("Using GitHub token from secrets file");
                Some(token.clone())
            }
            _ => None,
        }
    }

    /// Create a template secrets file at the default location
    pub fn create_template() -> Result<PathBuf> {
        let path = Self::default_secrets_path()
            .ok_or_else(|| Error::Config("Could not determine secrets path".to_string()))?;
        Self::create_template_at(&path)?;
        Ok(path)
    }

    /// Create a template secrets file at `path` with owner-only permissions
    ///
    /// Never overwrites an existing file.
    pub fn create_template_at(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(Error::Io)?;
        }

        if path.exists() {
            return Err(Error::Config(format!(
                "Secrets file already exists at {}",
                path.display()
            )));
        }

        let template = r#"# triage secrets
# This file contains sensitive credentials - do not share or commit to version control
#
# IMPORTANT: This file must have restrictive permissions (chmod 600)

[github]
# GitHub Personal Access Token
# Create at: https://github.com/settings/tokens
# Required permissions: project (read/write), repo or read:org for org boards
token = ""
"#;

        std::fs::write(path, template).map_err(Error::Io)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(path, perms).map_err(Error::Io)?;
        }

        warn!(path = %path.display(), "Created secrets template - please edit and add your token");

        Ok(())
    }
}
