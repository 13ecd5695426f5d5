//! LocalArtifactStore - artifacts laid out as files under a root directory.
//!
//! `{root}/{owner}/{session}/{logical_name}/{version}` holds the payload of key
//! `{owner}/{session}/{logical_name}/{version}`. Listing walks only the
//! directory named by the prefix, on a blocking thread, sorted by file name so
//! the order is reproducible. One walk answers the whole listing, so pages are
//! never split and `next_page_token` is always `None`.

use std::io;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use walkdir::WalkDir;

use super::latest_version_key;
use crate::domain::StoreError;
use crate::ports::{ArtifactStore, KeyPage, StoredPayload};

pub struct LocalArtifactStore {
    root: PathBuf,
    current_scope: Option<String>,
}

impl LocalArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            current_scope: None,
        }
    }

    /// `{owner}/{session}` used by `load_by_logical_name`.
    pub fn with_current_scope(mut self, scope: impl Into<String>) -> Self {
        self.current_scope = Some(scope.into().trim_end_matches('/').to_string());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Keys starting with `prefix`, in walk order.
    ///
    /// Only the directory part of the prefix (`owner1/` of `owner1/sess`) is
    /// walked, so other owners' trees are never visited.
    async fn keys_under(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let dir = prefix.rsplit_once('/').map_or("", |(dir, _)| dir);
        let start = if dir.is_empty() {
            self.root.clone()
        } else {
            match self.path_for(dir) {
                Some(path) => path,
                None => return Ok(Vec::new()),
            }
        };

        let root = self.root.clone();
        let keys = tokio::task::spawn_blocking(move || walk_keys(&root, &start))
            .await
            .map_err(|e| StoreError::Unavailable(format!("listing task failed: {e}")))??;
        Ok(keys.into_iter().filter(|k| k.starts_with(prefix)).collect())
    }

    fn path_for(&self, key: &str) -> Option<PathBuf> {
        let relative = Path::new(key);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        (safe && !key.is_empty()).then(|| self.root.join(relative))
    }

    async fn read(&self, key: &str) -> Result<StoredPayload, StoreError> {
        let path = self
            .path_for(key)
            .ok_or_else(|| StoreError::KeyNotFound(key.to_string()))?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(StoredPayload::Bytes(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound || e.kind() == io::ErrorKind::IsADirectory => {
                Err(StoreError::KeyNotFound(key.to_string()))
            }
            Err(e) => Err(StoreError::Unavailable(format!("{}: {e}", path.display()))),
        }
    }
}

/// Files below `start`, as keys relative to `root`.
fn walk_keys(root: &Path, start: &Path) -> Result<Vec<String>, StoreError> {
    if !start.is_dir() {
        return Ok(Vec::new());
    }

    let mut keys = Vec::new();
    for entry in WalkDir::new(start).sort_by_file_name() {
        let entry = entry.map_err(|e| StoreError::Unavailable(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let segments: Option<Vec<&str>> = relative.components().map(|c| c.as_os_str().to_str()).collect();
        match segments {
            Some(segments) => keys.push(segments.join("/")),
            None => tracing::warn!(path = %entry.path().display(), "skipping non-UTF-8 artifact path"),
        }
    }
    Ok(keys)
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn list_keys(
        &self,
        prefix: &str,
        page_token: Option<&str>,
    ) -> Result<KeyPage, StoreError> {
        if let Some(token) = page_token {
            return Err(StoreError::Unavailable(format!(
                "local listings are a single page, got token {token}"
            )));
        }

        Ok(KeyPage {
            keys: self.keys_under(prefix).await?,
            next_page_token: None,
        })
    }

    async fn get_bytes(&self, key: &str) -> Result<StoredPayload, StoreError> {
        self.read(key).await
    }

    async fn load_by_logical_name(&self, logical_name: &str) -> Result<StoredPayload, StoreError> {
        let scope = self
            .current_scope
            .as_deref()
            .ok_or_else(|| StoreError::KeyNotFound(logical_name.to_string()))?;
        let keys = self.keys_under(&format!("{scope}/")).await?;
        let key = latest_version_key(keys.iter().map(String::as_str), scope, logical_name)
            .ok_or_else(|| StoreError::KeyNotFound(logical_name.to_string()))?;
        self.read(&key).await
    }
}
