use serde::Deserialize;

/// Configuration for the outbound Templafy API client
#[derive(Debug, Deserialize, Clone)]
pub struct TemplafyConfig {
    /// Override for the remote API base URL. When unset the URL is derived
    /// from the `templafy.tenantId` setting as
    /// `https://{tenantId}.api.templafy.com`. Intended for test/staging
    /// deployments pointing at a stand-in server.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Connect timeout for generation calls in seconds (default: 2)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Overall request timeout for generation calls in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

fn default_connect_timeout() -> u64 {
    2
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for TemplafyConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            connect_timeout: 2,
            request_timeout: 30,
        }
    }
}
