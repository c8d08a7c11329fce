pub(crate) use crate::config::store::{StoreConfig, StoreKind};
use crate::config::oauth::OAuthConfig;
use crate::config::templafy::TemplafyConfig;
use config::{Config as ConfigCrate, ConfigError};
use serde::Deserialize;

pub mod oauth;
pub mod store;
pub mod templafy;

/// Main configuration structure for the connector server
#[derive(Debug, Deserialize, Clone)]
pub struct ConnectorConfig {
    /// API key protecting the admin surface - settings and template
    /// registration refuse all requests when unset
    #[serde(default)]
    pub api_key: String,

    /// The port the connector will listen to (default: 7788)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Outbound Templafy API client configuration
    #[serde(default)]
    pub templafy: TemplafyConfig,

    /// OAuth token endpoint configuration
    #[serde(default)]
    pub oauth: OAuthConfig,

    /// Record store configuration
    #[serde(default)]
    pub store: StoreConfig,
}

fn default_port() -> u16 {
    7788
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            api_key: "".to_string(),
            port: 7788,
            templafy: TemplafyConfig::default(),
            oauth: OAuthConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl ConnectorConfig {
    /// Creates a new Config instance from environment variables
    pub fn new() -> Result<Self, String> {
        ConfigCrate::builder()
            .add_source(
                config::Environment::with_prefix("CONNECTOR")
                    .prefix_separator("_")
                    .separator("_")
                    .convert_case(config::Case::Snake),
            )
            .build()
            .map_err(|e: ConfigError| e.to_string())?
            .try_deserialize()
            .map_err(|e| e.to_string())
    }

    #[cfg(test)]
    pub fn for_test_with_mocks(templafy_mock: &wiremock::MockServer) -> Self {
        Self {
            api_key: "test_admin_key".to_string(),
            port: 0, // Let the OS choose a port
            templafy: TemplafyConfig {
                base_url: Some(templafy_mock.uri()),
                connect_timeout: 1,
                request_timeout: 2,
            },
            oauth: OAuthConfig::default(),
            store: StoreConfig::default(),
        }
    }
}
