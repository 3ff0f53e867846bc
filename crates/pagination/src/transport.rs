mod native;

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

pub use native::HttpTransport;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid transport configuration: {0}")]
    Configuration(String),
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Unexpected HTTP status {0}")]
    Status(u16),
    #[error("GraphQL errors: {}", .0.join("; "))]
    Graphql(Vec<String>),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl FetchError {
    pub fn invalid_response(error: impl ToString) -> Self {
        FetchError::InvalidResponse(error.to_string())
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

/// The body of a GraphQL request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest<'a> {
    pub query: &'a str,
    pub operation_name: &'a str,
    pub variables: Value,
}

/// Executes documents against the API. Implementations return the `data` object of a
/// successful response and turn anything else, GraphQL errors included, into a [`FetchError`].
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: GraphqlRequest<'_>) -> FetchResult<Value>;
}
