//! Abstraction over the remote project board
//!
//! The workflow needs exactly three remote operations. Implementations only
//! move data; deciding what a failure means is left to the caller.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::project::ProjectReference;

/// Failure reported by a [`ProjectBoard`] implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct RemoteError(pub String);

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Result type for remote board operations
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Opaque project board identifier assigned by the remote API
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One selectable value of the Status field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusOption {
    pub id: String,
    pub name: String,
}

/// Current Status value of a project item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFieldState {
    /// Display name of the current value
    pub status_name: String,
    /// Opaque id of the Status field itself
    pub field_id: String,
    /// Values the field accepts
    pub options: Vec<StatusOption>,
}

impl StatusFieldState {
    /// Find the option id for a status label (exact match)
    pub fn option_id(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.id.as_str())
    }

    /// Comma-separated option names, for diagnostics
    pub fn option_names(&self) -> String {
        self.options
            .iter()
            .map(|o| o.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A project item linking the triggering issue or pull request to a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedItem {
    /// Opaque id of the project item
    pub item_id: String,
    /// Board the item belongs to
    pub project_id: ProjectId,
    /// Status value, absent when the field was never set
    pub status: Option<StatusFieldState>,
}

/// Everything the status mutation needs, resolved in the current invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub project_id: ProjectId,
    pub item_id: String,
    pub field_id: String,
    pub option_id: String,
    /// Human-readable label of `option_id`
    pub value: String,
}

/// Remote operations against a project board
#[async_trait]
pub trait ProjectBoard: Send + Sync {
    /// Resolve the opaque id of a project board
    async fn project_id(&self, project: &ProjectReference) -> RemoteResult<ProjectId>;

    /// List the project items the given issue or pull request node is linked to
    async fn linked_items(&self, node_id: &str) -> RemoteResult<Vec<LinkedItem>>;

    /// Set the Status field of a project item
    ///
    /// Returns the Status value name reported after the update.
    async fn update_status(&self, update: &StatusUpdate) -> RemoteResult<String>;
}
