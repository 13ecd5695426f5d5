//! Domain model: keys, candidates, artifacts, classification, errors.

pub mod artifact;
pub mod candidate;
pub mod classify;
pub mod errors;
pub mod key;

pub use self::artifact::{
    DEFAULT_MIME_TYPE, PayloadEncoding, ResolutionSource, ResolvedArtifact, StoredArtifact,
};
pub use self::candidate::{CandidatePolicy, DEFAULT_VERSION_SUFFIXES, segment_matches};
pub use self::classify::{MediaCategory, classify_mime, classify_size};
pub use self::errors::{ErrorKind, ResolveError, StoreError};
pub use self::key::{OwnerHint, StoredKey};
