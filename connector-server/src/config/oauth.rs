use serde::Deserialize;

/// Configuration for the OAuth 2.0 token endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct OAuthConfig {
    /// Access token TTL in seconds (default: 3600 = 1 hour)
    #[serde(default = "default_token_ttl")]
    pub token_ttl: u64,
}

fn default_token_ttl() -> u64 {
    3600
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self { token_ttl: 3600 }
    }
}
