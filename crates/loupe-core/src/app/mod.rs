//! App - リゾルバと、それを組み立てるビルダー
//!
//! # 含まれるもの
//! - **ArtifactResolver**: 論理名から保存済みアーティファクトを引く
//! - **ResolverBuilder**: ストアと設定を受け取り、起動時に検証して組み立てる

pub mod builder;
pub mod resolver;

pub use self::builder::{BuildError, ResolverBuilder};
pub use self::resolver::ArtifactResolver;
