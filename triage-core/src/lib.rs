//! Triage Core - Core library for project board status automation
//!
//! This crate holds the domain model and the status update workflow. The
//! remote project board is reached through the [`ProjectBoard`] trait, which
//! `triage-github` implements against the GitHub GraphQL API.

pub mod board;
pub mod config;
pub mod error;
pub mod event;
pub mod inputs;
pub mod project;
pub mod secrets;
pub mod updater;

pub use board::{
    LinkedItem, ProjectBoard, ProjectId, RemoteError, RemoteResult, StatusFieldState, StatusOption,
    StatusUpdate,
};
pub use config::{Config, GitHubConfig};
pub use error::{Error, Result};
pub use event::{ItemKind, TriggerEvent};
pub use inputs::Inputs;
pub use project::{OwnerType, ProjectReference};
pub use secrets::Secrets;
pub use updater::{Outcome, SkipReason, StatusUpdater};
