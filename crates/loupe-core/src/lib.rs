//! loupe-core
//!
//! Locates user-uploaded artifacts in a versioned, owner-scoped store and
//! decodes them into one canonical shape.
//!
//! # Modules
//! - **domain**: keys, candidate policy, artifact model, classification, errors
//! - **ports**: the `ArtifactStore` trait
//! - **codec**: payload decoding (JSON-wrapped / base64 text / raw bytes)
//! - **impls**: in-memory and local-filesystem stores
//! - **app**: `ArtifactResolver` and `ResolverBuilder`
//! - **config**: `ResolverConfig` and its layered loader

pub mod app;
pub mod codec;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{ArtifactResolver, BuildError, ResolverBuilder};
pub use config::{ResolverConfig, TieBreak};
pub use domain::{
    MediaCategory, OwnerHint, PayloadEncoding, ResolveError, ResolvedArtifact, StoreError,
    classify_mime, classify_size,
};
pub use ports::{ArtifactStore, KeyPage, StoredPayload};
