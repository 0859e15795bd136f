use anyhow::Context;
use async_trait::async_trait;
use bucketwatch_poller::{AdditionHandler, RemovalHandler};
use bucketwatch_store::ObjectEntry;
use bytes::Bytes;
use colored::Colorize;
use tokio::sync::mpsc;

/// Prints every change and forwards added keys to the batching stage.
pub struct ConsoleHandler {
    added_keys: mpsc::Sender<String>,
}

impl ConsoleHandler {
    pub fn new(added_keys: mpsc::Sender<String>) -> Self {
        Self { added_keys }
    }
}

#[async_trait]
impl AdditionHandler for ConsoleHandler {
    async fn on_addition(&self, content: Bytes, entry: &ObjectEntry) -> anyhow::Result<()> {
        println!(
            "{} {} ({} bytes, {})",
            "+".green().bold(),
            entry.key,
            content.len(),
            entry.marker.as_str().dimmed()
        );
        self.added_keys
            .send(entry.key.clone())
            .await
            .context("batching stage has shut down")
    }
}

#[async_trait]
impl RemovalHandler for ConsoleHandler {
    async fn on_removal(&self, key: &str) -> anyhow::Result<()> {
        println!("{} {}", "-".red().bold(), key);
        Ok(())
    }
}
