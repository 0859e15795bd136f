use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreResult;
use crate::object::{ListPage, ListRequest};

/// Listing and fetch capability over one object namespace.
///
/// All implementations must satisfy these invariants:
/// - `list` returns names strictly after `request.marker`, in key order.
/// - A page never holds more than `request.max_keys` entries and common
///   prefixes combined.
/// - `is_truncated` is `true` only if a later call can return more names.
/// - Errors are returned, never swallowed into a short page.
#[async_trait]
pub trait ObjectLister: Send + Sync {
    /// Fetch one page of the listing described by `request`.
    async fn list(&self, request: &ListRequest) -> StoreResult<ListPage>;

    /// Fetch the full contents of the object at `key`.
    ///
    /// Returns `StoreError::NotFound` if no such object exists.
    async fn get(&self, key: &str) -> StoreResult<Bytes>;
}
