use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque change token for an object (version id, timestamp, etag...).
///
/// Only equality is meaningful: two markers either match, meaning the object
/// is unchanged, or they do not. No ordering is implied.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeMarker(String);

impl ChangeMarker {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ChangeMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChangeMarker({})", self.0)
    }
}

impl fmt::Display for ChangeMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChangeMarker {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl From<String> for ChangeMarker {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// A single object as reported by a listing.
///
/// This is the metadata handed to addition handlers alongside the content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry {
    /// Unique key of the object within the namespace.
    pub key: String,
    /// Change token; a different marker means the object changed.
    pub marker: ChangeMarker,
    /// Content length in bytes.
    pub size: u64,
    /// Entity tag, if the backend reports one.
    pub etag: Option<String>,
}

impl ObjectEntry {
    pub fn new(key: impl Into<String>, marker: impl Into<ChangeMarker>, size: u64) -> Self {
        Self {
            key: key.into(),
            marker: marker.into(),
            size,
            etag: None,
        }
    }

    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }
}

/// Parameters for one page of a listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListRequest {
    /// Only keys starting with this prefix are listed.
    pub prefix: String,
    /// Roll-up delimiter; empty disables roll-up.
    pub delimiter: String,
    /// Continuation point: only names strictly after it are listed.
    pub marker: Option<String>,
    /// Maximum number of entries plus common prefixes on the page.
    pub max_keys: usize,
}

impl ListRequest {
    /// Default page size used by bucket-style backends.
    pub const DEFAULT_MAX_KEYS: usize = 1000;

    /// A first-page request for `prefix` with no delimiter.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            delimiter: String::new(),
            marker: None,
            max_keys: Self::DEFAULT_MAX_KEYS,
        }
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    pub fn with_max_keys(mut self, max_keys: usize) -> Self {
        self.max_keys = max_keys;
        self
    }
}

/// One page of listing results.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListPage {
    /// Objects on this page, in key order.
    pub entries: Vec<ObjectEntry>,
    /// Rolled-up key prefixes (only with a delimiter).
    pub common_prefixes: Vec<String>,
    /// `true` if more results follow this page.
    pub is_truncated: bool,
    /// Explicit continuation point, if the backend supplies one.
    pub next_marker: Option<String>,
}

impl ListPage {
    /// Where the next page should start.
    ///
    /// Uses `next_marker` when present, otherwise the greatest key or common
    /// prefix on this page. `None` for an empty page without `next_marker`.
    pub fn continuation(&self) -> Option<String> {
        if let Some(ref marker) = self.next_marker {
            return Some(marker.clone());
        }
        let last_key = self.entries.last().map(|e| e.key.as_str());
        let last_prefix = self.common_prefixes.last().map(String::as_str);
        last_key.max(last_prefix).map(str::to_string)
    }
}
