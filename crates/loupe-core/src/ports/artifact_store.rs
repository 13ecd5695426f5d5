//! ArtifactStore port - リゾルバが読み出すストレージ
//!
//! ストアは外部サービスとして扱い、整合性はストア側の責務とします。
//!
//! # 設計原則
//! - タイムアウトとリトライは実装側が持つ（リゾルバはリトライしない）
//! - 「キーが無い」(`KeyNotFound`) と「ストアが落ちている」(`Unavailable`) を区別する
//! - 列挙はページ単位。`next_page_token` が `None` になるまで続ける

use async_trait::async_trait;

use crate::domain::StoreError;

/// Payload as handed back by a backend.
///
/// Some backends return bytes, others return a string where bytes were
/// expected. The distinction is kept so the decoder can try base64 only on
/// the latter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredPayload {
    Bytes(Vec<u8>),
    Text(String),
}

impl StoredPayload {
    pub fn len(&self) -> usize {
        match self {
            StoredPayload::Bytes(b) => b.len(),
            StoredPayload::Text(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            StoredPayload::Bytes(b) => b,
            StoredPayload::Text(t) => t.as_bytes(),
        }
    }
}

impl From<Vec<u8>> for StoredPayload {
    fn from(bytes: Vec<u8>) -> Self {
        StoredPayload::Bytes(bytes)
    }
}

impl From<String> for StoredPayload {
    fn from(text: String) -> Self {
        StoredPayload::Text(text)
    }
}

/// One page of a key listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPage {
    pub keys: Vec<String>,
    /// Pass back to `list_keys` to get the next page; `None` on the last one.
    pub next_page_token: Option<String>,
}

/// Read-only contract the resolver needs from a backend.
///
/// # Ordering
/// Listing order is whatever the backend iterates in. It is not guaranteed to
/// reflect version or recency.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// List keys starting with `prefix`. An empty prefix lists everything.
    async fn list_keys(
        &self,
        prefix: &str,
        page_token: Option<&str>,
    ) -> Result<KeyPage, StoreError>;

    /// Fetch the payload stored under exactly `key`.
    async fn get_bytes(&self, key: &str) -> Result<StoredPayload, StoreError>;

    /// Load an artifact by name from the store's current scope.
    ///
    /// Stands in for whatever "current session" artifact API the host
    /// exposes. Used only as the resolver's last resort.
    async fn load_by_logical_name(&self, logical_name: &str) -> Result<StoredPayload, StoreError>;
}
