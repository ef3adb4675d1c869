//! Alias paths.
//!
//! Board names are either flat (`D3`, `Led1`) or nested under a namespace
//! (`Socket9/Pin5`, `PwmChannel/TIM1/PA8`).  Both `.` and `/` separate
//! segments on input; the canonical form always uses `/`.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PathError;

/// Maximum number of segments in one path.
pub const MAX_DEPTH: usize = 6;

/// Canonical `Namespace/Sub/Name` path of one alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AliasPath {
    canonical: String,
    /// Byte offset of the last segment inside `canonical`.
    name_at: usize,
}

impl AliasPath {
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::Empty);
        }
        let mut canonical = String::with_capacity(raw.len());
        let mut name_at = 0;
        for (depth, segment) in raw.split(['.', '/']).enumerate() {
            if depth >= MAX_DEPTH {
                return Err(PathError::TooDeep);
            }
            check_segment(segment)?;
            if depth > 0 {
                canonical.push('/');
            }
            name_at = canonical.len();
            canonical.push_str(segment);
        }
        Ok(Self { canonical, name_at })
    }

    /// Join a namespace (possibly empty) and a relative path.
    pub fn join(namespace: &str, rest: &str) -> Result<Self, PathError> {
        if namespace.is_empty() {
            Self::parse(rest)
        } else {
            Self::parse(&format!("{namespace}/{rest}"))
        }
    }

    /// This path moved under `prefix` (no-op for an empty prefix).
    pub fn prefixed(&self, prefix: &str) -> Result<Self, PathError> {
        Self::join(prefix, &self.canonical)
    }

    /// This path with `namespace` stripped from the front, if it lives there.
    pub fn strip_namespace(&self, namespace: &str) -> Option<Self> {
        if namespace.is_empty() {
            return Some(self.clone());
        }
        let rest = self.canonical.strip_prefix(namespace)?.strip_prefix('/')?;
        Self::parse(rest).ok()
    }

    /// Everything before the last segment; empty for flat names.
    pub fn namespace(&self) -> &str {
        self.canonical[..self.name_at].trim_end_matches('/')
    }

    /// The last segment.
    pub fn name(&self) -> &str {
        &self.canonical[self.name_at..]
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.canonical.split('/')
    }

    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// True if this path lives in `namespace` or one of its children.
    pub fn is_within(&self, namespace: &str) -> bool {
        namespace.is_empty()
            || self
                .canonical
                .strip_prefix(namespace)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

fn check_segment(segment: &str) -> Result<(), PathError> {
    if segment.is_empty() {
        return Err(PathError::EmptySegment);
    }
    match segment
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
    {
        Some(c) => Err(PathError::InvalidChar(c)),
        None => Ok(()),
    }
}

impl core::str::FromStr for AliasPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AliasPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AliasPath> for String {
    fn from(path: AliasPath) -> Self {
        path.canonical
    }
}

impl fmt::Display for AliasPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}
