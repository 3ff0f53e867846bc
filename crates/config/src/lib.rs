//! Configuration of the dbdash engine, read from a TOML file.
//!
//! ```toml
//! [pagination]
//! page_size = 100
//! buffer_pages = 1
//!
//! [selection]
//! minimal_field_count = 3
//!
//! [transport]
//! endpoint = "http://localhost:5000/graphql"
//! timeout = "30s"
//! ```

mod pagination;
mod selection;
mod transport;

use std::path::Path;

pub use pagination::PaginationConfig;
pub use selection::SelectionConfig;
pub use transport::TransportConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read the configuration file '{path}': {source}")]
    Read { path: String, source: std::io::Error },
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub pagination: PaginationConfig,
    pub selection: SelectionConfig,
    pub transport: TransportConfig,
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.pagination.page_size == 0 {
            return Err(ConfigError::Invalid("pagination.page_size must be greater than zero".into()));
        }

        if self.pagination.max_concurrent_pages == 0 {
            return Err(ConfigError::Invalid(
                "pagination.max_concurrent_pages must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use indoc::indoc;
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = EngineConfig::from_toml("").unwrap();

        assert_eq!(config.pagination, PaginationConfig::default());
        assert_eq!(config.selection, SelectionConfig::default());
        assert_eq!(config.transport.timeout, Duration::from_secs(30));
        assert!(config.transport.endpoint.is_none());
    }

    #[test]
    fn pagination_section() {
        let config = EngineConfig::from_toml(indoc! {r#"
            [pagination]
            page_size = 50
            buffer_pages = 2
        "#})
        .unwrap();

        insta::assert_debug_snapshot!(config.pagination, @r###"
        PaginationConfig {
            page_size: 50,
            buffer_pages: 2,
            max_concurrent_pages: 4,
        }
        "###);
    }

    #[test]
    fn transport_section() {
        let config = EngineConfig::from_toml(indoc! {r#"
            [transport]
            endpoint = "https://api.example.com/graphql"
            timeout = "5s"
            token = "super-secret"

            [transport.headers]
            x-tenant = "acme"
        "#})
        .unwrap();

        let transport = config.transport;
        assert_eq!(
            transport.endpoint.as_ref().map(|url| url.as_str()),
            Some("https://api.example.com/graphql")
        );
        assert_eq!(transport.timeout, Duration::from_secs(5));
        assert_eq!(transport.token.as_ref().map(|token| token.expose_secret().as_str()), Some("super-secret"));
        assert_eq!(transport.headers.get("x-tenant").map(String::as_str), Some("acme"));
    }

    #[test]
    fn the_token_is_not_printed() {
        let config = EngineConfig::from_toml(indoc! {r#"
            [transport]
            token = "super-secret"
        "#})
        .unwrap();

        assert!(!format!("{config:?}").contains("super-secret"));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let error = EngineConfig::from_toml(indoc! {r#"
            [pagination]
            page_size = 0
        "#})
        .unwrap_err();

        insta::assert_snapshot!(error, @"invalid configuration: pagination.page_size must be greater than zero");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = EngineConfig::from_toml(indoc! {r#"
            [pagination]
            pagesize = 10
        "#})
        .unwrap_err();

        assert!(matches!(error, ConfigError::Parse(_)), "{error}");
    }

    #[test]
    fn missing_file() {
        let error = EngineConfig::load("/definitely/not/here/dbdash.toml").unwrap_err();
        assert!(matches!(error, ConfigError::Read { .. }), "{error}");
    }
}
