//! ArtifactResolver - ユーザーが付けた名前から保存済みアーティファクトを探す
//!
//! # フロー
//! 候補生成 -> スコープ付きスキャン -> デコード -> 直接参照（フォールバック）
//!
//! キャッシュは持たず、呼び出しのたびにストアを列挙し直します。

use std::sync::Arc;

use crate::codec::decode_payload;
use crate::config::TieBreak;
use crate::domain::{
    CandidatePolicy, OwnerHint, ResolutionSource, ResolveError, ResolvedArtifact, StoreError,
    StoredKey, segment_matches,
};
use crate::ports::{ArtifactStore, StoredPayload};

/// Resolves logical filenames against an `ArtifactStore`.
///
/// Holds no mutable state, so one instance can be shared behind an `Arc`.
/// Build it with [`super::ResolverBuilder`].
pub struct ArtifactResolver {
    pub(crate) store: Arc<dyn ArtifactStore>,
    pub(crate) policy: CandidatePolicy,
    pub(crate) tie_break: TieBreak,
    pub(crate) direct_fallback: bool,
}

impl ArtifactResolver {
    /// Candidates `resolve` would try for `logical_name`, in order.
    pub fn candidates(&self, logical_name: &str) -> Vec<String> {
        self.policy.candidates(logical_name)
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Resolve `logical_name` to a decoded payload.
    ///
    /// # Errors
    /// - `NotFound`: no candidate matched and the direct lookup missed
    /// - `Decode`: a key matched but its payload is not usable bytes
    /// - `BackendUnavailable`: the store failed; not retried
    #[tracing::instrument(skip(self, owner_hint), fields(owner = %owner_hint))]
    pub async fn resolve(
        &self,
        logical_name: &str,
        owner_hint: &OwnerHint,
    ) -> Result<ResolvedArtifact, ResolveError> {
        if logical_name.trim().is_empty() {
            return Err(not_found(logical_name));
        }

        let candidates = self.policy.candidates(logical_name);
        let keys = self.scan(&owner_hint.scope_prefix()).await?;

        if let Some(key) = self.pick(&candidates, &keys) {
            tracing::debug!(key = %key, "scan matched");
            let payload = match self.store.get_bytes(key.as_str()).await {
                Ok(payload) => payload,
                Err(StoreError::KeyNotFound(_)) => {
                    tracing::warn!(key = %key, "listed key vanished before it could be read");
                    return Err(not_found(logical_name));
                }
                Err(err) => return Err(backend_error(err)),
            };
            return self.finish(logical_name, key.as_str(), &payload, ResolutionSource::Scan);
        }

        if !self.direct_fallback {
            return Err(not_found(logical_name));
        }

        tracing::debug!("scan found nothing, trying direct lookup");
        match self.store.load_by_logical_name(logical_name).await {
            Ok(payload) => self.finish(
                logical_name,
                logical_name,
                &payload,
                ResolutionSource::DirectFallback,
            ),
            Err(StoreError::KeyNotFound(_)) => Err(not_found(logical_name)),
            Err(err) => Err(backend_error(err)),
        }
    }

    /// Every artifact key under `prefix`, across all pages, in listing order.
    async fn scan(&self, prefix: &str) -> Result<Vec<StoredKey>, ResolveError> {
        let mut keys = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page = self
                .store
                .list_keys(prefix, page_token.as_deref())
                .await
                .map_err(backend_error)?;
            tracing::debug!(prefix, count = page.keys.len(), "listed page");

            for raw in page.keys {
                match StoredKey::parse(&raw) {
                    Some(key) => keys.push(key),
                    None => tracing::debug!(key = %raw, "skipping key outside owner/session/name/version layout"),
                }
            }

            match page.next_page_token {
                Some(next) => page_token = Some(next),
                None => return Ok(keys),
            }
        }
    }

    /// Candidates in order; within a candidate, the tie-break decides.
    fn pick<'k>(&self, candidates: &[String], keys: &'k [StoredKey]) -> Option<&'k StoredKey> {
        for candidate in candidates {
            let mut matching = keys
                .iter()
                .filter(|key| segment_matches(key.logical_name(), candidate));

            let chosen = match self.tie_break {
                TieBreak::FirstSeen => matching.next(),
                TieBreak::HighestVersion => matching.fold(None, |best: Option<&StoredKey>, key| {
                    match best {
                        Some(b) if b.version_number() >= key.version_number() => Some(b),
                        _ => Some(key),
                    }
                }),
            };

            if chosen.is_some() {
                tracing::debug!(candidate = %candidate, "candidate matched");
                return chosen;
            }
        }
        None
    }

    fn finish(
        &self,
        logical_name: &str,
        stored_key: &str,
        payload: &StoredPayload,
        source: ResolutionSource,
    ) -> Result<ResolvedArtifact, ResolveError> {
        let decoded = decode_payload(stored_key, payload)?;
        let resolved = ResolvedArtifact {
            logical_name: logical_name.to_string(),
            stored_key: stored_key.to_string(),
            mime_type: decoded.mime_type,
            size_bytes: decoded.bytes.len(),
            payload_encoding: decoded.encoding,
            source,
            decoded_bytes: decoded.bytes,
        };
        tracing::info!(
            key = %resolved.stored_key,
            mime_type = %resolved.mime_type,
            size_bytes = resolved.size_bytes,
            ?source,
            "resolved artifact"
        );
        Ok(resolved)
    }
}

fn not_found(logical_name: &str) -> ResolveError {
    ResolveError::NotFound {
        logical_name: logical_name.to_string(),
    }
}

fn backend_error(err: StoreError) -> ResolveError {
    tracing::warn!(error = %err, "artifact store query failed");
    ResolveError::BackendUnavailable(err)
}
