use crate::config::templafy::TemplafyConfig;
use crate::config::ConnectorConfig;
use crate::store::{create_store, Store};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConnectorConfig>,
    pub store: Arc<Store>,
    pub templafy_client: Arc<Client>,
}

impl AppState {
    pub async fn new(config: ConnectorConfig) -> Result<Self, std::io::Error> {
        let store = create_store(&config).await.map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to create store: {e}"),
            )
        })?;
        Self::with_store(config, store)
    }

    pub fn with_store(config: ConnectorConfig, store: Store) -> Result<Self, std::io::Error> {
        let templafy_client = Self::create_templafy_client(&config.templafy).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to create Templafy client: {e}"),
            )
        })?;
        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(store),
            templafy_client: Arc::new(templafy_client),
        })
    }

    /// Shared outbound client for the remote generation endpoint. Bounded
    /// timeouts keep a hung remote from occupying a handling task
    /// indefinitely; the bearer header is set per-request from the settings
    /// store.
    fn create_templafy_client(config: &TemplafyConfig) -> Result<Client, reqwest::Error> {
        Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
    }

    /// Check if all components are healthy
    pub async fn health_check(&self) -> bool {
        use crate::store::StoreBackend;
        self.store.health_check().await.is_ok()
    }
}
