//! Ports - interfaces to the outside world.
//!
//! The only port is the artifact store. Implementations live in `impls`
//! (in-memory and local filesystem); cloud object stores plug in from other
//! crates by implementing the same trait.

pub mod artifact_store;

pub use self::artifact_store::{ArtifactStore, KeyPage, StoredPayload};
