//! StoredKey / OwnerHint - storage key layout.
//!
//! Keys are four-level paths: `{owner}/{session}/{logical_name}/{version}`.
//! The logical name is whatever sits between the session and the version
//! segments, so a name containing `/` still parses.

use std::fmt;

/// Parsed view of a storage key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredKey {
    raw: String,
    owner: String,
    session: String,
    logical_name: String,
    version: String,
}

impl StoredKey {
    /// Parse a raw key. Returns `None` for keys that are not artifact paths.
    pub fn parse(raw: &str) -> Option<Self> {
        let segments: Vec<&str> = raw.split('/').collect();
        if segments.len() < 4 || segments.iter().any(|s| s.is_empty()) {
            return None;
        }

        let last = segments.len() - 1;
        Some(Self {
            raw: raw.to_string(),
            owner: segments[0].to_string(),
            session: segments[1].to_string(),
            logical_name: segments[2..last].join("/"),
            version: segments[last].to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Trailing integer of the version segment: `v2` -> 2, `0003` -> 3.
    pub fn version_number(&self) -> Option<u64> {
        let digits_start = self
            .version
            .rfind(|c: char| !c.is_ascii_digit())
            .map_or(0, |i| i + 1);
        self.version[digits_start..].parse().ok()
    }
}

impl fmt::Display for StoredKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Which owner scope to search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OwnerHint {
    Owner(String),
    /// Search every owner in the store.
    Any,
}

impl OwnerHint {
    /// `None`, `""` and `"*"` all mean "search all owners".
    pub fn from_option(hint: Option<&str>) -> Self {
        match hint.map(str::trim) {
            None | Some("") | Some("*") => OwnerHint::Any,
            Some(owner) => OwnerHint::Owner(owner.trim_end_matches('/').to_string()),
        }
    }

    /// Prefix passed to `ArtifactStore::list_keys`.
    pub fn scope_prefix(&self) -> String {
        match self {
            OwnerHint::Owner(owner) => format!("{owner}/"),
            OwnerHint::Any => String::new(),
        }
    }
}

impl From<Option<&str>> for OwnerHint {
    fn from(hint: Option<&str>) -> Self {
        OwnerHint::from_option(hint)
    }
}

impl From<&str> for OwnerHint {
    fn from(hint: &str) -> Self {
        OwnerHint::from_option(Some(hint))
    }
}

impl fmt::Display for OwnerHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerHint::Owner(owner) => f.write_str(owner),
            OwnerHint::Any => f.write_str("*"),
        }
    }
}
