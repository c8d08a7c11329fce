//! Typed access to the persisted settings store.
//!
//! Settings are stored as strings; this module owns the decode sequence and
//! resolves the typed snapshots the token endpoint and the generation
//! orchestrator depend on, so per-key string coercion never leaks into
//! handlers.

use crate::store::{Store, StoreBackend, StoreError};
use thiserror::Error;

/// Client identifier the connector expects for the client-credentials grant
pub const CONNECTOR_CLIENT_ID: &str = "connector.clientId";
/// Client secret the connector expects for the client-credentials grant
pub const CONNECTOR_CLIENT_SECRET: &str = "connector.clientSecret";
/// Default page size of the content listing
pub const CONNECTOR_DEFAULT_LIMIT: &str = "connector.defaultLimit";
/// Templafy tenant, forms the remote API host
pub const TEMPLAFY_TENANT_ID: &str = "templafy.tenantId";
/// Remote API version path segment
pub const TEMPLAFY_API_VERSION: &str = "templafy.apiVersion";
/// Bearer token presented to the remote generation endpoint
pub const TEMPLAFY_BEARER_TOKEN: &str = "templafy.bearerToken";
/// When "true", generation uses the configured test email instead of the
/// caller-supplied one
pub const DOC_GEN_USE_TEST_EMAIL: &str = "docGen.useTestEmail";
/// Email used for generation when the test-email override is on
pub const DOC_GEN_TEST_EMAIL: &str = "docGen.testEmail";

/// Page size applied when no limit is configured anywhere
pub const FALLBACK_PAGE_LIMIT: usize = 20;

/// Errors that can occur while resolving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Required setting '{0}' is not configured")]
    Missing(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A decoded setting value. Raw values are strings; the decode sequence is
/// "true"/"false" to bool, numeric without a decimal point to int, numeric
/// with a decimal point to float, anything else stays a string.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl SettingValue {
    pub fn decode(raw: &str) -> Self {
        match raw {
            "true" => return Self::Bool(true),
            "false" => return Self::Bool(false),
            _ => {}
        }
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            if trimmed.contains('.') {
                if let Ok(value) = trimmed.parse::<f64>() {
                    return Self::Float(value);
                }
            } else if let Ok(value) = trimmed.parse::<i64>() {
                return Self::Int(value);
            }
        }
        Self::Str(raw.to_string())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }
}

/// Read and decode a single setting
pub async fn get_decoded(
    store: &Store,
    key: &str,
) -> Result<Option<SettingValue>, StoreError> {
    let raw = store.get_setting(key).await?;
    Ok(raw.map(|raw| SettingValue::decode(&raw)))
}

/// Default page limit of the content listing, falling back to 20 when the
/// setting is absent or not an integer
pub async fn default_page_limit(store: &Store) -> Result<usize, StoreError> {
    let limit = get_decoded(store, CONNECTOR_DEFAULT_LIMIT)
        .await?
        .and_then(|value| value.as_int())
        .filter(|limit| *limit > 0)
        .map(|limit| limit as usize)
        .unwrap_or(FALLBACK_PAGE_LIMIT);
    Ok(limit)
}

/// Typed snapshot of the remote API configuration, resolved once per
/// generation call before any remote request is attempted.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplafySettings {
    pub tenant_id: String,
    pub api_version: String,
    pub bearer_token: String,
}

impl TemplafySettings {
    pub async fn resolve(store: &Store) -> Result<Self, SettingsError> {
        Ok(Self {
            tenant_id: require(store, TEMPLAFY_TENANT_ID).await?,
            api_version: require(store, TEMPLAFY_API_VERSION).await?,
            bearer_token: require(store, TEMPLAFY_BEARER_TOKEN).await?,
        })
    }
}

/// The client id/secret pair the token endpoint validates against
#[derive(Debug, Clone, PartialEq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    pub async fn resolve(store: &Store) -> Result<Self, SettingsError> {
        Ok(Self {
            client_id: require(store, CONNECTOR_CLIENT_ID).await?,
            client_secret: require(store, CONNECTOR_CLIENT_SECRET).await?,
        })
    }
}

async fn require(store: &Store, key: &'static str) -> Result<String, SettingsError> {
    store
        .get_setting(key)
        .await?
        .filter(|value| !value.is_empty())
        .ok_or(SettingsError::Missing(key))
}
