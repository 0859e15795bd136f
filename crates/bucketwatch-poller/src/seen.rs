use std::collections::{HashMap, HashSet};

use bucketwatch_store::{ChangeMarker, ObjectEntry};

/// Keys the poller has successfully reconciled, with the marker seen for each.
///
/// Owned by a single [`Poller`](crate::Poller); only the poll loop mutates it,
/// and only after a handler call succeeds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeenSet {
    entries: HashMap<String, ChangeMarker>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The marker recorded for `key`, if any.
    pub fn marker(&self, key: &str) -> Option<&ChangeMarker> {
        self.entries.get(key)
    }

    /// Returns `true` if `entry` was already handled at its current marker.
    pub fn is_current(&self, entry: &ObjectEntry) -> bool {
        self.entries.get(&entry.key) == Some(&entry.marker)
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Keys recorded here but absent from `listed`, in sorted order.
    pub fn missing_from(&self, listed: &HashSet<String>) -> Vec<String> {
        let mut missing: Vec<String> = self
            .entries
            .keys()
            .filter(|key| !listed.contains(*key))
            .cloned()
            .collect();
        missing.sort_unstable();
        missing
    }

    pub(crate) fn record(&mut self, key: String, marker: ChangeMarker) {
        self.entries.insert(key, marker);
    }

    pub(crate) fn forget(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }
}
