//! ResolverBuilder - ストアと設定から ArtifactResolver を組み立てる
//!
//! # 設計原則
//! - 検証は `build()` で行う（Fail-fast 設計）
//! - 不正なサフィックスは最初の検索ではなく起動時にエラーになる

use std::sync::Arc;

use super::ArtifactResolver;
use crate::config::{ResolverConfig, TieBreak};
use crate::domain::CandidatePolicy;
use crate::domain::candidate::split_version_marker;
use crate::ports::ArtifactStore;

/// ArtifactResolver を構築する
///
/// # 使用例
/// ```ignore
/// let config = loupe_core::config::load_config()?;
/// let resolver = ResolverBuilder::new(Arc::new(store))
///     .config(&config)
///     .build()?;
/// ```
pub struct ResolverBuilder {
    store: Arc<dyn ArtifactStore>,
    version_suffixes: Vec<String>,
    tie_break: TieBreak,
    direct_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("version suffix must not be empty")]
    EmptySuffix,

    #[error("version suffix {0:?} is not a recognised version marker")]
    UnrecognisedSuffix(String),
}

impl ResolverBuilder {
    pub fn new<S: ArtifactStore + 'static>(store: Arc<S>) -> Self {
        Self::from_dyn(store)
    }

    pub fn from_dyn(store: Arc<dyn ArtifactStore>) -> Self {
        let defaults = ResolverConfig::default();
        Self {
            store,
            version_suffixes: defaults.version_suffixes,
            tie_break: defaults.tie_break,
            direct_fallback: defaults.direct_fallback,
        }
    }

    /// Take every setting from `config`.
    pub fn config(mut self, config: &ResolverConfig) -> Self {
        self.version_suffixes = config.version_suffixes.clone();
        self.tie_break = config.tie_break;
        self.direct_fallback = config.direct_fallback;
        self
    }

    pub fn version_suffixes<I, T>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.version_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn direct_fallback(mut self, enabled: bool) -> Self {
        self.direct_fallback = enabled;
        self
    }

    /// # 検証
    /// 各サフィックスは、素の名前に付けたときにバージョンマーカーとして
    /// 取り除けなければならない。取り除けないと、生成した候補がサフィックス
    /// 無しで保存されたキーに一致しなくなる。
    pub fn build(self) -> Result<ArtifactResolver, BuildError> {
        for suffix in &self.version_suffixes {
            if suffix.is_empty() {
                return Err(BuildError::EmptySuffix);
            }
            let marked = format!("sample.txt{suffix}");
            if split_version_marker(&marked).stripped != "sample.txt" {
                return Err(BuildError::UnrecognisedSuffix(suffix.clone()));
            }
        }

        Ok(ArtifactResolver {
            store: self.store,
            policy: CandidatePolicy::new(self.version_suffixes),
            tie_break: self.tie_break,
            direct_fallback: self.direct_fallback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::InMemoryArtifactStore;

    fn store() -> Arc<InMemoryArtifactStore> {
        Arc::new(InMemoryArtifactStore::new())
    }

    #[test]
    fn build_with_defaults() {
        let resolver = ResolverBuilder::new(store()).build().unwrap();
        assert_eq!(resolver.tie_break(), TieBreak::FirstSeen);
        assert_eq!(resolver.candidates("a.txt").len(), 5);
    }

    #[test]
    fn config_is_applied() {
        let config = ResolverConfig {
            version_suffixes: vec!["-v2".to_string()],
            tie_break: TieBreak::HighestVersion,
            direct_fallback: false,
        };
        let resolver = ResolverBuilder::new(store()).config(&config).build().unwrap();
        assert_eq!(resolver.tie_break(), TieBreak::HighestVersion);
        assert_eq!(resolver.candidates("a.txt"), vec!["a.txt-v2", "a.txt"]);
        assert!(!resolver.direct_fallback);
    }

    #[test]
    fn empty_suffix_list_means_bare_name_only() {
        let resolver = ResolverBuilder::new(store())
            .version_suffixes(Vec::<String>::new())
            .build()
            .unwrap();
        assert_eq!(resolver.candidates("a.txt"), vec!["a.txt"]);
    }

    #[test]
    fn rejects_empty_suffix() {
        let result = ResolverBuilder::new(store()).version_suffixes([""]).build();
        assert!(matches!(result, Err(BuildError::EmptySuffix)));
    }

    #[test]
    fn rejects_suffix_that_is_not_a_marker() {
        let result = ResolverBuilder::new(store())
            .version_suffixes([" v1", ".bak"])
            .build();
        assert!(matches!(
            result,
            Err(BuildError::UnrecognisedSuffix(s)) if s == ".bak"
        ));
    }
}
