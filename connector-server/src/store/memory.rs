use super::{StoreBackend, StoreError, TemplatePage};
use crate::models::{AccessTokenRecord, NewTemplateItem, TemplateItem};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    settings: HashMap<String, String>,
    templates: BTreeMap<i64, TemplateItem>,
    tokens: HashMap<String, AccessTokenRecord>,
    next_template_id: i64,
}

/// In-memory record store. All state lives behind a single RwLock; reads
/// take the shared lock, mutations the exclusive one.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                next_template_id: 1,
                ..Inner::default()
            })),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_search(item: &TemplateItem, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    item.name.to_lowercase().contains(&needle)
        || item.description.to_lowercase().contains(&needle)
}

#[async_trait]
impl StoreBackend for MemoryStore {
    async fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.settings.get(key).cloned())
    }

    async fn upsert_setting(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.settings.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn insert_template(&self, item: NewTemplateItem) -> Result<TemplateItem, StoreError> {
        let mut inner = self.inner.write().await;
        let id = inner.next_template_id;
        inner.next_template_id += 1;
        let item = TemplateItem {
            id,
            name: item.name,
            description: item.description,
            space_id: item.space_id,
            asset_id: item.asset_id,
            document_type: item.document_type,
        };
        inner.templates.insert(id, item.clone());
        Ok(item)
    }

    async fn get_template(&self, id: i64) -> Result<Option<TemplateItem>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.templates.get(&id).cloned())
    }

    async fn list_templates(
        &self,
        search: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<TemplatePage, StoreError> {
        let inner = self.inner.read().await;
        let mut matched: Vec<TemplateItem> = inner
            .templates
            .values()
            .filter(|item| match search {
                Some(needle) => matches_search(item, needle),
                None => true,
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        let total = matched.len();
        let items = matched.into_iter().skip(offset).take(limit).collect();
        Ok(TemplatePage { items, total })
    }

    async fn insert_token(&self, record: &AccessTokenRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.tokens.insert(record.token.clone(), record.clone());
        Ok(())
    }

    async fn get_token(&self, token: &str) -> Result<Option<AccessTokenRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.tokens.get(token).cloned())
    }

    async fn health_check(&self) -> Result<(), String> {
        Ok(())
    }
}
