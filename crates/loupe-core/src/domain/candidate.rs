//! Candidate generation - filename variants tried against the store.
//!
//! The listing path and the loading path of the hosting framework disagree on
//! whether a version marker is part of the name (`photo.png` vs
//! `photo.png v1` vs `photo v1.png`). The resolver copes by trying an ordered
//! list of candidates and by comparing names with markers removed.

use std::sync::LazyLock;

use regex::Regex;

/// Suffixes appended to a name that carries no version marker, in try order.
///
/// Extend this list (or override it through `ResolverConfig`) rather than
/// adding special cases to the matcher.
pub const DEFAULT_VERSION_SUFFIXES: &[&str] = &[" v1", " v2", "_v1", " (1)"];

/// Marker either at the very end of the name or right before the extension.
static VERSION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<head>.*?)(?P<marker> [vV]\d+|_[vV]\d+|-[vV]\d+| \(\d+\))(?P<ext>(?:\.[A-Za-z0-9]+)*)$")
        .expect("version marker pattern is valid")
});

/// A name split around its version marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedName<'a> {
    /// The name with the marker removed.
    pub stripped: String,
    /// The marker itself (e.g. `" v2"`), if there was one.
    pub marker: Option<&'a str>,
}

/// Split `name` into its marker-free form and the marker.
pub fn split_version_marker(name: &str) -> MarkedName<'_> {
    match VERSION_MARKER.captures(name) {
        Some(caps) => {
            let head = caps.name("head").map_or("", |m| m.as_str());
            let ext = caps.name("ext").map_or("", |m| m.as_str());
            MarkedName {
                stripped: format!("{head}{ext}"),
                marker: caps.name("marker").map(|m| m.as_str()),
            }
        }
        None => MarkedName {
            stripped: name.to_string(),
            marker: None,
        },
    }
}

pub fn has_version_marker(name: &str) -> bool {
    VERSION_MARKER.is_match(name)
}

/// Whether a stored logical-name segment refers to the same artifact as a candidate.
///
/// Exact equality always matches. Otherwise the candidate's marker-free form
/// must equal, prefix or suffix the segment's marker-free form
/// (`photo.png_copy` and `copy of photo.png` both match `photo.png`). Two
/// different explicit markers never match (`photo v1.png` vs `photo v2.png`).
pub fn segment_matches(segment: &str, candidate: &str) -> bool {
    if segment == candidate {
        return true;
    }

    let seg = split_version_marker(segment);
    let cand = split_version_marker(candidate);
    if let (Some(a), Some(b)) = (seg.marker, cand.marker)
        && a != b
    {
        return false;
    }

    let base = cand.stripped.as_str();
    !base.is_empty()
        && (seg.stripped == base || seg.stripped.starts_with(base) || seg.stripped.ends_with(base))
}

/// Ordered candidate policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePolicy {
    suffixes: Vec<String>,
}

impl CandidatePolicy {
    pub fn new(suffixes: Vec<String>) -> Self {
        Self { suffixes }
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Candidates for `logical_name`, in try order.
    ///
    /// - with a marker: `[verbatim, stripped]`
    /// - without: `[name + suffix for each suffix..., name]`
    pub fn candidates(&self, logical_name: &str) -> Vec<String> {
        let split = split_version_marker(logical_name);
        if split.marker.is_some() {
            return vec![logical_name.to_string(), split.stripped];
        }

        let mut out: Vec<String> = self
            .suffixes
            .iter()
            .map(|suffix| format!("{logical_name}{suffix}"))
            .collect();
        out.push(logical_name.to_string());
        out
    }
}

impl Default for CandidatePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_VERSION_SUFFIXES.iter().map(|s| s.to_string()).collect())
    }
}
