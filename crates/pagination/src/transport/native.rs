use std::time::Duration;

use dbdash_config::TransportConfig;
use http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderMap, HeaderName, HeaderValue,
};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::{FetchError, FetchResult, GraphqlRequest, Transport};

/// Posts documents as JSON to a single endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

#[derive(Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> FetchResult<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| FetchError::Configuration("no endpoint configured".into()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in &config.headers {
            let name = HeaderName::try_from(name.as_str())
                .map_err(|error| FetchError::Configuration(format!("invalid header name `{name}`: {error}")))?;
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|error| FetchError::Configuration(format!("invalid value for header `{name}`: {error}")))?;

            headers.insert(name, value);
        }

        if let Some(token) = &config.token {
            let mut value = HeaderValue::try_from(format!("Bearer {}", token.expose_secret()))
                .map_err(|_| FetchError::Configuration("the token is not a valid header value".into()))?;
            value.set_sensitive(true);

            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|error| FetchError::Configuration(error.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            timeout: config.timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: GraphqlRequest<'_>) -> FetchResult<Value> {
        tracing::debug!("Sending {} to {}", request.operation_name, self.endpoint);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|error| self.request_error(error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let response: GraphqlResponse = response.json().await.map_err(|error| self.request_error(error))?;

        if !response.errors.is_empty() {
            return Err(FetchError::Graphql(
                response.errors.into_iter().map(|error| error.message).collect(),
            ));
        }

        response
            .data
            .ok_or_else(|| FetchError::invalid_response("the response has neither data nor errors"))
    }
}

impl HttpTransport {
    fn request_error(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else if error.is_decode() {
            FetchError::invalid_response(error)
        } else {
            FetchError::Request(error.to_string())
        }
    }
}
