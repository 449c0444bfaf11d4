//! Triggering event payloads
//!
//! The automation platform hands us the raw webhook payload as a JSON file.
//! Only the `issue` / `pull_request` object and the repository owner are of
//! interest here.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Whether the triggering item is an issue or a pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Issue,
    PullRequest,
}

/// The issue or pull request that fired the workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerEvent {
    /// Issue or pull request number
    pub number: u64,
    /// Opaque global node id
    pub node_id: String,
    /// Logins of assigned accounts
    pub assignees: Vec<String>,
    /// Login of the repository owner
    pub repository_owner_login: String,
    /// Issue or pull request
    pub kind: ItemKind,
}

#[derive(Debug, Deserialize)]
struct Payload {
    issue: Option<PayloadItem>,
    pull_request: Option<PayloadItem>,
    repository: Option<PayloadRepository>,
}

#[derive(Debug, Deserialize)]
struct PayloadItem {
    number: u64,
    node_id: String,
    #[serde(default)]
    assignees: Vec<PayloadAccount>,
}

#[derive(Debug, Deserialize)]
struct PayloadRepository {
    owner: PayloadAccount,
}

#[derive(Debug, Deserialize)]
struct PayloadAccount {
    login: String,
}

impl TriggerEvent {
    /// Build an event from a webhook payload
    ///
    /// `issue` takes precedence over `pull_request`; `issue_comment` events
    /// on pull requests carry both.
    pub fn from_json(json: &str) -> Result<Self> {
        let payload: Payload = serde_json::from_str(json)?;

        let (item, kind) = match (payload.issue, payload.pull_request) {
            (Some(issue), _) => (issue, ItemKind::Issue),
            (None, Some(pr)) => (pr, ItemKind::PullRequest),
            (None, None) => {
                return Err(Error::Event(
                    "payload contains neither an issue nor a pull request".to_string(),
                ))
            }
        };

        let repository = payload
            .repository
            .ok_or_else(|| Error::Event("payload is missing the repository".to_string()))?;

        Ok(Self {
            number: item.number,
            node_id: item.node_id,
            assignees: item.assignees.into_iter().map(|a| a.login).collect(),
            repository_owner_login: repository.owner.login,
            kind,
        })
    }

    /// Load an event from a payload file such as `$GITHUB_EVENT_PATH`
    pub fn load_from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading event payload");
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Event(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&contents)
    }

    /// Whether anyone is assigned to the item
    pub fn is_assigned(&self) -> bool {
        !self.assignees.is_empty()
    }
}
