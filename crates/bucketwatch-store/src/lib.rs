//! Object-store listing capability for bucketwatch.
//!
//! The poller never talks to a concrete storage service. It depends only on
//! the [`ObjectLister`] trait: a paginated `list` plus a `get` for object
//! contents. Anything that can answer those two calls -- a cloud bucket
//! client, a local directory, an in-memory map -- can be reconciled.
//!
//! # Listing Semantics
//!
//! Listings follow the familiar bucket model:
//!
//! 1. Keys are returned in lexicographic order, strictly after the request's
//!    continuation marker.
//! 2. Only keys starting with the request prefix are returned.
//! 3. With a non-empty delimiter, keys containing the delimiter after the
//!    prefix are rolled up into common prefixes.
//! 4. A page holds at most `max_keys` entries and common prefixes combined;
//!    `is_truncated` reports whether more remain.
//!
//! # Backends
//!
//! - [`InMemoryLister`] -- `BTreeMap`-based store for tests and embedding
//! - [`DirectoryLister`] -- regular files under a local directory

pub mod directory;
pub mod error;
pub mod memory;
pub mod object;
pub mod page;
pub mod traits;

pub use directory::DirectoryLister;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryLister;
pub use object::{ChangeMarker, ListPage, ListRequest, ObjectEntry};
pub use page::paginate;
pub use traits::ObjectLister;
