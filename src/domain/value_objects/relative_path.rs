//! Relative Path Value Object
//!
//! A deployment-root-relative path in forward-slash form:
//! - Backslashes are normalized to `/`
//! - Never starts with `/`
//! - The root itself is represented by `.` and has no parent

use std::fmt;
use std::path::{Component, Path};

use serde::Serialize;

/// Marker for the deployment root
pub const ROOT: &str = ".";

/// A forward-slash-normalized path relative to the deployment root
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RelativePath(String);

impl RelativePath {
    /// Create a new RelativePath, normalizing separators
    ///
    /// Leading `./` and `/` are stripped, repeated separators collapse.
    /// An empty result becomes the root marker.
    pub fn new(path: impl AsRef<str>) -> Self {
        let normalized = path.as_ref().replace('\\', "/");
        let segments: Vec<&str> = normalized
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();

        if segments.is_empty() {
            Self(ROOT.to_string())
        } else {
            Self(segments.join("/"))
        }
    }

    /// Build from a platform path (e.g. the result of `strip_prefix`)
    pub fn from_path(path: &Path) -> Self {
        let joined = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        Self::new(joined)
    }

    /// The root marker (`.`)
    pub fn root() -> Self {
        Self(ROOT.to_string())
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Immediate parent directory
    ///
    /// `a/b/c.js` -> `a/b`, `c.js` -> `.`, `.` -> None
    pub fn parent(&self) -> Option<RelativePath> {
        if self.is_root() {
            return None;
        }
        match self.0.rsplit_once('/') {
            Some((parent, _)) => Some(Self(parent.to_string())),
            None => Some(Self::root()),
        }
    }

    /// Last path segment
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Iterate path segments from the root down
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty() && *s != ROOT)
    }

    /// True if `self` is a proper ancestor of `other`
    ///
    /// Segment-aware: `d1` is an ancestor of `d1/s2` but not of `d10`.
    pub fn is_ancestor_of(&self, other: &RelativePath) -> bool {
        if self.is_root() {
            return !other.is_root();
        }
        other.0.len() > self.0.len()
            && other.0.starts_with(&self.0)
            && other.0.as_bytes()[self.0.len()] == b'/'
    }

    /// True if `self` equals `other` or is one of its ancestors
    pub fn contains(&self, other: &RelativePath) -> bool {
        self == other || self.is_ancestor_of(other)
    }

    /// Every ancestor directory, shallowest first, excluding the root
    ///
    /// `a/b/c.js` -> [`a`, `a/b`]
    pub fn ancestors(&self) -> Vec<RelativePath> {
        let mut out = Vec::new();
        let mut current = self.parent();
        while let Some(dir) = current {
            if dir.is_root() {
                break;
            }
            current = dir.parent();
            out.push(dir);
        }
        out.reverse();
        out
    }

    /// Join with another relative segment
    pub fn join(&self, child: &str) -> RelativePath {
        if self.is_root() {
            Self::new(child)
        } else {
            Self::new(format!("{}/{}", self.0, child))
        }
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RelativePath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
