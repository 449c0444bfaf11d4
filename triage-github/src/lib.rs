//! Triage GitHub - GitHub Projects integration for triage
//!
//! This crate implements [`triage_core::ProjectBoard`] on top of the GitHub
//! GraphQL API.

mod client;
mod error;
mod graphql;
mod projects;

pub use client::GitHubClient;
pub use error::{Error, Result};
