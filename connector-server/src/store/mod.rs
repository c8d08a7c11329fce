use crate::models::{AccessTokenRecord, NewTemplateItem, TemplateItem};
use thiserror::Error;

pub mod memory;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// One page of template items plus the total count of items matching the
/// filter, ignoring pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplatePage {
    pub items: Vec<TemplateItem>,
    pub total: usize,
}

/// Record store contract backing settings, template items and access tokens.
///
/// Settings are string-keyed/string-valued with upsert (last-writer-wins)
/// semantics. Template items are assigned identifiers by the store and never
/// mutated afterwards. Access tokens are append-only, keyed by token value.
///
/// Implementations must be thread-safe (Send + Sync) and cloneable so they
/// can be shared across handlers.
#[async_trait::async_trait]
pub trait StoreBackend: Send + Sync {
    /// Read a single setting value
    async fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Create or overwrite a setting
    async fn upsert_setting(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Register a template item, assigning its identifier
    async fn insert_template(&self, item: NewTemplateItem) -> Result<TemplateItem, StoreError>;

    /// Look up a template item by identifier
    async fn get_template(&self, id: i64) -> Result<Option<TemplateItem>, StoreError>;

    /// List template items ordered by name ascending. `search` matches
    /// case-insensitively against name or description; `total` counts the
    /// full filtered set independent of `limit`/`offset`.
    async fn list_templates(
        &self,
        search: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<TemplatePage, StoreError>;

    /// Persist a freshly issued access token
    async fn insert_token(&self, record: &AccessTokenRecord) -> Result<(), StoreError>;

    /// Look up an access token by its value. Expiry is checked by the
    /// caller, not the store.
    async fn get_token(&self, token: &str) -> Result<Option<AccessTokenRecord>, StoreError>;

    /// Performs a health check on the store backend
    async fn health_check(&self) -> Result<(), String>;
}

/// Store implementation that provides a uniform interface regardless of
/// backend. The concrete implementation is chosen at startup based on the
/// application configuration.
#[derive(Clone)]
pub enum Store {
    /// In-memory store, the default backend
    Memory(memory::MemoryStore),
}

#[async_trait::async_trait]
impl StoreBackend for Store {
    async fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            Self::Memory(store) => store.get_setting(key).await,
        }
    }

    async fn upsert_setting(&self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.upsert_setting(key, value).await,
        }
    }

    async fn insert_template(&self, item: NewTemplateItem) -> Result<TemplateItem, StoreError> {
        match self {
            Self::Memory(store) => store.insert_template(item).await,
        }
    }

    async fn get_template(&self, id: i64) -> Result<Option<TemplateItem>, StoreError> {
        match self {
            Self::Memory(store) => store.get_template(id).await,
        }
    }

    async fn list_templates(
        &self,
        search: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<TemplatePage, StoreError> {
        match self {
            Self::Memory(store) => store.list_templates(search, limit, offset).await,
        }
    }

    async fn insert_token(&self, record: &AccessTokenRecord) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.insert_token(record).await,
        }
    }

    async fn get_token(&self, token: &str) -> Result<Option<AccessTokenRecord>, StoreError> {
        match self {
            Self::Memory(store) => store.get_token(token).await,
        }
    }

    async fn health_check(&self) -> Result<(), String> {
        match self {
            Self::Memory(store) => store.health_check().await,
        }
    }
}

/// Factory function creating the store implementation selected by the
/// configuration.
pub async fn create_store(config: &crate::config::ConnectorConfig) -> Result<Store, StoreError> {
    match config.store.kind {
        crate::config::StoreKind::InMemory => Ok(Store::Memory(memory::MemoryStore::new())),
    }
}
