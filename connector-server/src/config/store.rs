use serde::Deserialize;

/// Specifies which record store implementation to use
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StoreKind {
    #[serde(other)]
    #[default]
    InMemory,
}

/// Configuration for the record store backing settings, template items and
/// access tokens
#[derive(Debug, Deserialize, Clone, Default)]
pub struct StoreConfig {
    /// Store backend: currently only "in-memory"
    #[serde(default)]
    pub kind: StoreKind,
}
