//! Artifact model: what a lookup finds and what it hands back.
//!
//! Nothing here talks to a store. `StoredArtifact` is the metadata view of
//! one persisted blob; `ResolvedArtifact` is the single canonical shape the
//! resolver returns regardless of how the backend serialised the payload.

use serde::{Deserialize, Serialize};

use super::classify::{MediaCategory, classify_size};

pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// How the backend serialised the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadEncoding {
    RawBytes,
    Base64Text,
    JsonWrapped,
}

/// One persisted blob for one owner/session.
///
/// Built fresh per lookup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredArtifact {
    pub logical_name: String,
    pub stored_key: String,
    pub payload_encoding: PayloadEncoding,
    pub mime_type: String,
    pub size_bytes: usize,
}

/// Where the resolver found the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Matched a key while scanning the owner scope.
    Scan,
    /// Loaded by name from the store's current scope.
    DirectFallback,
}

/// The decoded payload plus enough metadata for the caller to act on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedArtifact {
    pub logical_name: String,
    /// Full key the payload was read from. For `DirectFallback` this is the
    /// logical name, since the store does not report the key it used.
    pub stored_key: String,
    pub mime_type: String,
    pub size_bytes: usize,
    pub payload_encoding: PayloadEncoding,
    pub source: ResolutionSource,
    #[serde(skip)]
    pub decoded_bytes: Vec<u8>,
}

impl ResolvedArtifact {
    pub fn category(&self) -> MediaCategory {
        MediaCategory::from_mime(&self.mime_type)
    }

    /// One-line summary, e.g. `photo.png: image (image/png), 2.0 KB`.
    pub fn describe(&self) -> String {
        format!(
            "{}: {} ({}), {}",
            self.logical_name,
            self.category(),
            self.mime_type,
            classify_size(self.size_bytes)
        )
    }

    /// Metadata view, without the bytes.
    pub fn stored_artifact(&self) -> StoredArtifact {
        StoredArtifact {
            logical_name: self.logical_name.clone(),
            stored_key: self.stored_key.clone(),
            payload_encoding: self.payload_encoding,
            mime_type: self.mime_type.clone(),
            size_bytes: self.size_bytes,
        }
    }
}
