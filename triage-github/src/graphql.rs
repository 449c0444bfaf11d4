//! GraphQL request execution

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::{Error, GitHubClient, Result};

/// GraphQL query response wrapper
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

/// GraphQL error
#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
}

impl GitHubClient {
    /// Execute a GraphQL query or mutation
    ///
    /// Any entry in `errors` fails the call, even when partial data came back.
    pub(crate) async fn graphql_query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: &serde_json::Value,
    ) -> Result<T> {
        let request_body = json!({
            "query": query,
            "variables": variables,
        });

        debug!(api_url = %self.api_url(), "Sending GraphQL request");

        let response = self
            .http()
            .post(self.api_url())
            .bearer_auth(self.token())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response".to_string());
            return Err(Error::Status { status, body });
        }

        let graphql_response: GraphQLResponse<T> = response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("Failed to parse GraphQL response: {}", e)))?;

        if let Some(errors) = graphql_response.errors.filter(|e| !e.is_empty()) {
            return Err(Error::GraphQl(
                errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        graphql_response
            .data
            .ok_or_else(|| Error::MissingData("GraphQL response missing data".to_string()))
    }
}
