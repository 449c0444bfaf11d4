//! Invocation inputs
//!
//! The automation platform exposes step inputs as environment variables and
//! leaves unset inputs as empty strings, so blank values count as missing.

use std::fmt;

use crate::{Error, Result, Secrets};

/// The four values every invocation needs
#[derive(Clone, PartialEq, Eq)]
pub struct Inputs {
    /// URL of the target project board
    pub project_url: String,
    /// Credential for the GraphQL API
    pub github_token: String,
    /// Status to transition eligible items to
    pub new_status: String,
    /// Status an item must currently have to be eligible
    pub open_status: String,
}

impl Inputs {
    /// Assemble inputs, rejecting blank values
    ///
    /// The token falls back to `GITHUB_TOKEN` and then to the secrets file
    /// when not given directly.
    pub fn from_parts(
        project_url: Option<String>,
        github_token: Option<String>,
        new_status: Option<String>,
        open_status: Option<String>,
        secrets: &Secrets,
    ) -> Result<Self> {
        Self::from_parts_with(
            project_url,
            github_token,
            new_status,
            open_status,
            || secrets.github_token(),
        )
    }

    fn from_parts_with(
        project_url: Option<String>,
        github_token: Option<String>,
        new_status: Option<String>,
        open_status: Option<String>,
        fallback_token: impl FnOnce() -> Option<String>,
    ) -> Result<Self> {
        let github_token = match non_blank(github_token) {
            Some(token) => token,
            None => fallback_token()
                .ok_or_else(|| Error::MissingInput("github-token".to_string()))?,
        };

        Ok(Self {
            project_url: required("project-url", project_url)?,
            github_token,
            new_status: required("new-status", new_status)?,
            open_status: required("open-status", open_status)?,
        })
    }
}

impl fmt::Debug for Inputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inputs")
            .field("project_url", &self.project_url)
            .field("new_status", &self.new_status)
            .field("open_status", &self.open_status)
            .finish_non_exhaustive()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(name: &str, value: Option<String>) -> Result<String> {
    non_blank(value).ok_or_else(|| Error::MissingInput(name.to_string()))
}
