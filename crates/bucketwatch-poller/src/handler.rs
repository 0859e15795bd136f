use async_trait::async_trait;
use bucketwatch_store::ObjectEntry;
use bytes::Bytes;

/// Called for every key that is new or whose change marker moved.
///
/// May be invoked again for the same key and marker if an earlier call
/// failed, so implementations must tolerate at-least-once delivery.
#[async_trait]
pub trait AdditionHandler: Send + Sync {
    async fn on_addition(&self, content: Bytes, entry: &ObjectEntry) -> anyhow::Result<()>;
}

/// Called for every key that disappeared from the listing.
///
/// Retried on every cycle until it succeeds.
#[async_trait]
pub trait RemovalHandler: Send + Sync {
    async fn on_removal(&self, key: &str) -> anyhow::Result<()>;
}
