//! Error types for triage

use thiserror::Error;

/// Result type alias for triage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for triage operations
#[derive(Error, Debug)]
pub enum Error {
    /// The project URL does not have the expected shape
    #[error("Invalid project URL '{input}': {reason}")]
    InvalidConfiguration {
        /// The offending input, verbatim
        input: String,
        /// What was wrong with it
        reason: String,
    },

    /// The owner segment of the project URL is neither `orgs` nor `users`
    #[error("Unsupported project owner type '{0}', expected 'orgs' or 'users'")]
    UnsupportedOwnerType(String),

    /// A read query against the project board failed
    #[error("Failed to query {context}: {message}")]
    RemoteQuery {
        /// What was being resolved
        context: String,
        /// Underlying failure
        message: String,
    },

    /// The triggering item is not on the configured project board
    #[error("#{0} is not linked to the configured project")]
    MissingProjectItem(u64),

    /// The status update mutation failed
    #[error("Failed to update {context}: {message}")]
    RemoteMutation {
        /// What was being updated
        context: String,
        /// Underlying failure
        message: String,
    },

    /// A required input was not supplied
    #[error("Input required and not supplied: {0}")]
    MissingInput(String),

    /// The triggering event payload could not be used
    #[error("Event error: {0}")]
    Event(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
