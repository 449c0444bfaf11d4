//! GitHub GraphQL API client

use std::time::Duration;

use tracing::info;
use triage_core::GitHubConfig;

use crate::{Error, Result};

/// GitHub GraphQL client for project board operations
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
    timeout: Duration,
}

impl GitHubClient {
    /// Create a new client authenticated with `token`
    ///
    /// Every request is bounded by the configured timeout.
    pub fn new(token: impl Into<String>, config: &GitHubConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("triage/", env!("CARGO_PKG_VERSION")))
            .build()?;

        info!(api_url = %config.api_url, timeout = ?config.timeout, "Created GitHub client");

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            token: token.into(),
            timeout: config.timeout,
        })
    }

    /// GraphQL endpoint this client talks to
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn token(&self) -> &str {
        &self.token
    }

    /// Classify a transport error, surfacing timeouts distinctly
    pub(crate) fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.timeout.as_secs())
        } else {
            Error::Http(err)
        }
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
