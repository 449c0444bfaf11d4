//! Error types for GitHub operations

use thiserror::Error;
use triage_core::RemoteError;

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during GitHub operations
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure
    #[error("GraphQL request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The request exceeded the configured timeout
    #[error("GraphQL request timed out after {0}s")]
    Timeout(u64),

    /// Non-success HTTP status
    #[error("GraphQL request failed with status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        body: String,
    },

    /// The response carried GraphQL errors
    #[error("GraphQL errors: {}", .0.join(", "))]
    GraphQl(Vec<String>),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// A field the query relies on was null or absent
    #[error("{0}")]
    MissingData(String),
}

impl From<Error> for RemoteError {
    fn from(err: Error) -> Self {
        RemoteError::new(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_errors_are_joined() {
        let err = Error::GraphQl(vec!["first".to_string(), "second".to_string()]);
        assert_eq!(err.to_string(), "GraphQL errors: first, second");
    }

    #[test]
    fn test_into_remote_error_keeps_message() {
        let remote: RemoteError = Error::Status {
            status: 401,
            body: "Bad credentials".to_string(),
        }
        .into();
        assert_eq!(
            remote.to_string(),
            "GraphQL request failed with status 401: Bad credentials"
        );
    }
}
