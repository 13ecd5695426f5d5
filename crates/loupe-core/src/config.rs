//! ResolverConfig - built once by the entry point and passed to the builder.
//!
//! Layering (later wins):
//! 1. compiled defaults
//! 2. `loupe.toml` in the working directory, or an explicit file
//! 3. `LOUPE_*` environment variables (`LOUPE_TIE_BREAK=highest_version`)
//!
//! Only variables naming a `ResolverConfig` field are read; other `LOUPE_*`
//! variables (`LOUPE_ROOT`, `LOUPE_LOG`) belong to someone else and are ignored.

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_VERSION_SUFFIXES;

pub const DEFAULT_CONFIG_FILE: &str = "loupe.toml";

const ENV_PREFIX: &str = "LOUPE_";
const ENV_KEYS: &[&str] = &["version_suffixes", "tie_break", "direct_fallback"];

/// Which key wins when several match during a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// First matching key in backend listing order.
    #[default]
    FirstSeen,
    /// Among keys matching the winning candidate, the highest version number.
    HighestVersion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Suffixes tried, in order, for names without a version marker.
    pub version_suffixes: Vec<String>,
    pub tie_break: TieBreak,
    /// Try `load_by_logical_name` when the scan finds nothing.
    pub direct_fallback: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            version_suffixes: DEFAULT_VERSION_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            tie_break: TieBreak::FirstSeen,
            direct_fallback: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid loupe configuration: {0}")]
pub struct ConfigError(#[from] Box<figment::Error>);

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError(Box::new(err))
    }
}

/// Defaults, then `./loupe.toml`, then `LOUPE_*`.
pub fn load_config() -> Result<ResolverConfig, ConfigError> {
    Ok(defaults()
        .merge(Toml::file(DEFAULT_CONFIG_FILE))
        .merge(env_provider())
        .extract()?)
}

/// Defaults, then `path`, then `LOUPE_*`.
pub fn load_config_from_path(path: &Path) -> Result<ResolverConfig, ConfigError> {
    Ok(defaults()
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()?)
}

/// Defaults, then the given TOML. No environment lookup.
pub fn load_config_from_str(toml: &str) -> Result<ResolverConfig, ConfigError> {
    Ok(defaults().merge(Toml::string(toml)).extract()?)
}

fn defaults() -> Figment {
    Figment::new().merge(Serialized::defaults(ResolverConfig::default()))
}

/// `LOUPE_TIE_BREAK` -> `tie_break`, restricted to known fields so
/// `deny_unknown_fields` never trips on an unrelated variable.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).only(ENV_KEYS)
}
