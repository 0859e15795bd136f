//! Fixed-size batching stage for ordered item streams.
//!
//! A [`ChannelBatcher`] sits between two tokio channels. It reads items in
//! order, emits a `Vec` every time `batch_size` items have accumulated, and on
//! end of input flushes any remainder as one short batch before closing its
//! output.
//!
//! Each emitted batch is a freshly allocated buffer handed over by value; the
//! stage never touches it again.

pub mod batcher;
pub mod error;

pub use batcher::{BatchStats, ChannelBatcher};
pub use error::{BatchError, BatchResult};
