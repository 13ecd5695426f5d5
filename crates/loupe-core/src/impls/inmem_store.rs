//! InMemoryArtifactStore - development and test backend.
//!
//! Keys are kept in insertion order, which is also the listing order, so
//! tests can pin down "first match wins" behaviour.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::latest_version_key;
use crate::domain::StoreError;
use crate::ports::{ArtifactStore, KeyPage, StoredPayload};

const DEFAULT_PAGE_SIZE: usize = 100;

/// In-memory artifact store.
///
/// # 使用例
/// ```ignore
/// let store = InMemoryArtifactStore::new().with_current_scope("owner1/sessionA");
/// store.put("owner1/sessionA/photo.png/v1", png_bytes).await;
/// ```
pub struct InMemoryArtifactStore {
    entries: RwLock<Vec<(String, StoredPayload)>>,
    page_size: usize,
    current_scope: Option<String>,
    unavailable: AtomicBool,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            page_size: DEFAULT_PAGE_SIZE,
            current_scope: None,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Keys per `list_keys` page. Zero is treated as one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// `{owner}/{session}` used by `load_by_logical_name`.
    pub fn with_current_scope(mut self, scope: impl Into<String>) -> Self {
        self.current_scope = Some(scope.into().trim_end_matches('/').to_string());
        self
    }

    /// Insert or overwrite. Overwriting keeps the key's listing position.
    pub async fn put(&self, key: impl Into<String>, payload: impl Into<StoredPayload>) {
        let key = key.into();
        let payload = payload.into();
        let mut entries = self.entries.write().await;
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = payload,
            None => entries.push((key, payload)),
        }
    }

    pub async fn remove(&self, key: &str) -> bool {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|(k, _)| k != key);
        entries.len() != before
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Make every call fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store switched off".to_string()));
        }
        Ok(())
    }
}

impl Default for InMemoryArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn list_keys(
        &self,
        prefix: &str,
        page_token: Option<&str>,
    ) -> Result<KeyPage, StoreError> {
        self.check_available()?;

        let offset = match page_token {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| StoreError::Unavailable(format!("invalid page token: {token}")))?,
            None => 0,
        };

        let entries = self.entries.read().await;
        let matching: Vec<&str> = entries
            .iter()
            .map(|(k, _)| k.as_str())
            .filter(|k| k.starts_with(prefix))
            .collect();

        let end = (offset + self.page_size).min(matching.len());
        let keys = matching
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(|k| k.to_string())
            .collect();
        let next_page_token = (end < matching.len()).then(|| end.to_string());

        Ok(KeyPage {
            keys,
            next_page_token,
        })
    }

    async fn get_bytes(&self, key: &str) -> Result<StoredPayload, StoreError> {
        self.check_available()?;
        let entries = self.entries.read().await;
        entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, payload)| payload.clone())
            .ok_or_else(|| StoreError::KeyNotFound(key.to_string()))
    }

    async fn load_by_logical_name(&self, logical_name: &str) -> Result<StoredPayload, StoreError> {
        self.check_available()?;
        let scope = self
            .current_scope
            .as_deref()
            .ok_or_else(|| StoreError::KeyNotFound(logical_name.to_string()))?;

        let entries = self.entries.read().await;
        let key = latest_version_key(entries.iter().map(|(k, _)| k.as_str()), scope, logical_name)
            .ok_or_else(|| StoreError::KeyNotFound(logical_name.to_string()))?;
        entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, payload)| payload.clone())
            .ok_or_else(|| StoreError::KeyNotFound(key))
    }
}
