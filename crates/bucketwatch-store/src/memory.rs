use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{StoreError, StoreResult};
use crate::object::{ChangeMarker, ListPage, ListRequest, ObjectEntry};
use crate::page::paginate;
use crate::traits::ObjectLister;

struct StoredObject {
    marker: ChangeMarker,
    data: Bytes,
}

/// In-memory, `BTreeMap`-based object namespace.
///
/// Intended for tests and embedding. Objects live behind a `RwLock` so the
/// namespace can be mutated while a poller is listing it.
pub struct InMemoryLister {
    objects: RwLock<BTreeMap<String, StoredObject>>,
}

impl InMemoryLister {
    /// Create a new empty namespace.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(BTreeMap::new()),
        }
    }

    /// Insert or replace the object at `key`.
    pub fn put(&self, key: impl Into<String>, marker: impl Into<ChangeMarker>, data: impl Into<Bytes>) {
        let object = StoredObject {
            marker: marker.into(),
            data: data.into(),
        };
        self.objects
            .write()
            .expect("lock poisoned")
            .insert(key.into(), object);
    }

    /// Remove the object at `key`. Returns `true` if it existed.
    pub fn remove(&self, key: &str) -> bool {
        self.objects
            .write()
            .expect("lock poisoned")
            .remove(key)
            .is_some()
    }

    /// Remove every object.
    pub fn clear(&self) {
        self.objects.write().expect("lock poisoned").clear();
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the namespace is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryLister {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectLister for InMemoryLister {
    async fn list(&self, request: &ListRequest) -> StoreResult<ListPage> {
        let map = self.objects.read().expect("lock poisoned");
        let entries = map.iter().map(|(key, object)| {
            ObjectEntry::new(key.clone(), object.marker.clone(), object.data.len() as u64)
        });
        paginate(entries, request)
    }

    async fn get(&self, key: &str) -> StoreResult<Bytes> {
        let map = self.objects.read().expect("lock poisoned");
        map.get(key)
            .map(|object| object.data.clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }
}

impl std::fmt::Debug for InMemoryLister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLister")
            .field("object_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> InMemoryLister {
        let store = InMemoryLister::new();
        store.put("a", "m1", "alpha");
        store.put("b", "m2", "bravo");
        store.put("c", "m3", "charlie");
        store
    }

    #[tokio::test]
    async fn list_returns_entries_in_key_order() {
        let store = populated();
        let page = store.list(&ListRequest::new("")).await.unwrap();
        let keys: Vec<_> = page.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(page.entries[1].marker, ChangeMarker::from("m2"));
        assert_eq!(page.entries[2].size, 7);
        assert!(!page.is_truncated);
    }

    #[tokio::test]
    async fn list_paginates() {
        let store = populated();
        let first = store.list(&ListRequest::new("").with_max_keys(2)).await.unwrap();
        assert!(first.is_truncated);
        let marker = first.continuation().unwrap();
        let second = store
            .list(&ListRequest::new("").with_max_keys(2).with_marker(marker))
            .await
            .unwrap();
        assert_eq!(second.entries.len(), 1);
        assert_eq!(second.entries[0].key, "c");
        assert!(!second.is_truncated);
    }

    #[tokio::test]
    async fn get_returns_contents() {
        let store = populated();
        assert_eq!(store.get("b").await.unwrap(), Bytes::from("bravo"));
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let store = populated();
        let err = store.get("zzz").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref k) if k == "zzz"));
    }

    #[tokio::test]
    async fn put_replaces_marker() {
        let store = populated();
        store.put("a", "m9", "alpha2");
        let page = store.list(&ListRequest::new("a")).await.unwrap();
        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.entries[0].marker.as_str(), "m9");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn remove_and_clear() {
        let store = populated();
        assert!(store.remove("a"));
        assert!(!store.remove("a"));
        assert_eq!(store.len(), 2);
        store.clear();
        assert!(store.is_empty());
    }
}
