//! Impls - ArtifactStore の実装（開発用・ローカル用）
//!
//! # 含まれる実装
//! - **InMemoryArtifactStore**: 開発・テスト用。挿入順で列挙する
//! - **LocalArtifactStore**: ローカルディスク上のディレクトリツリー
//!
//! # 本番用実装
//! オブジェクトストレージ（S3 など）は別クレートで同じ port を実装します。

pub mod inmem_store;
pub mod local_store;

pub use self::inmem_store::InMemoryArtifactStore;
pub use self::local_store::LocalArtifactStore;

use crate::domain::StoredKey;

/// Highest-version key stored under `{scope}/{logical_name}/`.
///
/// Versions without a number sort below numbered ones; among equals the last
/// key seen wins. The name must match exactly.
pub(crate) fn latest_version_key<'a>(
    keys: impl Iterator<Item = &'a str>,
    scope: &str,
    logical_name: &str,
) -> Option<String> {
    let prefix = format!("{scope}/");
    keys.filter(|k| k.starts_with(&prefix))
        .filter_map(StoredKey::parse)
        .filter(|k| k.logical_name() == logical_name)
        .max_by_key(|k| k.version_number())
        .map(|k| k.as_str().to_string())
}
