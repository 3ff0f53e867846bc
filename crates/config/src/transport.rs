use std::{collections::BTreeMap, time::Duration};

use secrecy::SecretString;
use url::Url;

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransportConfig {
    /// The GraphQL endpoint documents are posted to.
    pub endpoint: Option<Url>,
    /// Per-request timeout. 30 seconds by default.
    #[serde(deserialize_with = "duration_str::deserialize_duration")]
    pub timeout: Duration,
    /// Static headers added to every request.
    pub headers: BTreeMap<String, String>,
    /// Sent as a bearer token when present.
    pub token: Option<SecretString>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: Duration::from_secs(30),
            headers: BTreeMap::new(),
            token: None,
        }
    }
}
