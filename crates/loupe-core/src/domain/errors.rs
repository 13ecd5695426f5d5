//! Errors - store-side and resolver-side error types.
//!
//! Every error here is recoverable at the caller: the tool layer turns them
//! into text for the end user instead of aborting the host process.

use thiserror::Error;

/// Operational classification of a failure.
///
/// - Permanent: retrying the same call against the same store gives the same answer.
/// - Infrastructure: the store itself failed (network, disk, permissions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Permanent,
    Infrastructure,
}

/// Errors surfaced by an `ArtifactStore` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("artifact store unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by `ArtifactResolver::resolve`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No candidate matched in any scope and the direct lookup missed too.
    #[error("artifact not found: {logical_name}")]
    NotFound { logical_name: String },

    /// A key matched but its payload could not be turned into bytes.
    #[error("could not decode artifact {key} ({mime_type}, {size_bytes} bytes): {reason}")]
    Decode {
        key: String,
        mime_type: String,
        size_bytes: usize,
        reason: String,
    },

    /// Listing or fetching failed outright. Not retried here.
    #[error("artifact store query failed")]
    BackendUnavailable(#[source] StoreError),
}

impl ResolveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::NotFound { .. } | ResolveError::Decode { .. } => ErrorKind::Permanent,
            ResolveError::BackendUnavailable(_) => ErrorKind::Infrastructure,
        }
    }

    /// Text suitable for handing back to the end user through a tool result.
    pub fn user_message(&self) -> String {
        match self {
            ResolveError::NotFound { logical_name } => {
                format!("The file '{logical_name}' is not available.")
            }
            ResolveError::Decode {
                key,
                mime_type,
                size_bytes,
                ..
            } => format!(
                "The file stored at '{key}' ({mime_type}, {size_bytes} bytes) could not be read."
            ),
            ResolveError::BackendUnavailable(_) => {
                "Artifact storage is currently unavailable. Please try again later.".to_string()
            }
        }
    }
}
