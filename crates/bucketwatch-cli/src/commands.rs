use std::sync::Arc;

use bucketwatch_batch::{BatchStats, ChannelBatcher};
use bucketwatch_log::{init_tracing, Logging, Severity};
use bucketwatch_poller::Poller;
use bucketwatch_store::{DirectoryLister, ListRequest, ObjectEntry, ObjectLister};
use colored::Colorize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::cli::*;
use crate::config::WatchConfig;
use crate::handlers::ConsoleHandler;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = WatchConfig::load(cli.config.as_deref())?;
    if cli.verbose {
        config.log.level = Severity::Debug;
    }
    init_tracing(&config.log)?;

    match cli.command {
        Command::Watch(args) => cmd_watch(config, args).await,
        Command::List(args) => cmd_list(config, args).await,
        Command::Config => cmd_config(&config),
    }
}

/// What a finished `watch` run delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct WatchSummary {
    /// Keys in the SeenSet when polling stopped.
    known: usize,
    /// Keys and batches that left the batcher.
    batches: BatchStats,
    /// Batches the printer received.
    printed: usize,
}

async fn cmd_watch(config: WatchConfig, args: WatchArgs) -> anyhow::Result<()> {
    let summary = watch(config, args).await?;
    println!(
        "Stopped: {} keys known, {} keys in {} batches",
        summary.known, summary.batches.items, summary.batches.batches
    );
    Ok(())
}

async fn watch(mut config: WatchConfig, args: WatchArgs) -> anyhow::Result<WatchSummary> {
    if let Some(prefix) = args.prefix {
        config.prefix = prefix;
    }
    if let Some(secs) = args.interval_secs {
        config.interval_secs = secs;
    }
    if let Some(size) = args.page_size {
        config.page_size = size;
    }
    if let Some(size) = args.batch_size {
        config.batch_size = size;
    }

    let logging = Logging::new(config.log.clone());
    let batcher = ChannelBatcher::new(config.batch_size, &logging)?;
    let (key_tx, key_rx) = mpsc::channel(config.batch_size);
    let (mut batches, batch_task) = batcher.spawn(key_rx, 1);

    let printer = tokio::spawn(async move {
        let mut count = 0usize;
        while let Some(batch) = batches.recv().await {
            count += 1;
            println!(
                "{} #{} ({} keys): {}",
                "batch".cyan().bold(),
                count,
                batch.len(),
                batch.join(", ")
            );
        }
        count
    });

    let handler = Arc::new(ConsoleHandler::new(key_tx));
    let lister = Arc::new(DirectoryLister::new(&args.root, &logging));
    let mut poller = Poller::new(
        config.poller_config(),
        lister,
        handler.clone(),
        handler,
        &logging,
    )?;
    println!("Watching {} (prefix {:?})", args.root.display().to_string().bold(), config.prefix);

    let known = if args.once {
        let report = poller.poll_once().await;
        println!(
            "{} {} listed, {} added, {} removed, {} failures",
            "✓".green().bold(),
            report.listed,
            report.added,
            report.removed,
            report.failures
        );
        let known = poller.seen().len();
        drop(poller);
        known
    } else {
        let cancel = CancellationToken::new();
        let on_signal = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_signal.cancel();
            }
        });
        poller.run(cancel).await.len()
    };

    // The poller is gone by now, taking the last key sender with it, so the
    // batcher flushes its remainder and closes the batch channel.
    let batches = batch_task.await??;
    let printed = printer.await?;
    Ok(WatchSummary {
        known,
        batches,
        printed,
    })
}

async fn cmd_list(config: WatchConfig, args: ListArgs) -> anyhow::Result<()> {
    let lister = DirectoryLister::new(&args.root, &Logging::new(config.log.clone()));
    let page_size = args.page_size.unwrap_or(config.page_size);
    let prefix = args.prefix.unwrap_or(config.prefix);
    let entries = list_all(&lister, &prefix, page_size).await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text => {
            for entry in &entries {
                println!("{:>10}  {}  {}", entry.size, entry.marker.as_str().dimmed(), entry.key);
            }
            println!("{} objects", entries.len().to_string().bold());
        }
    }
    Ok(())
}

/// Walk every page of the listing under `prefix`.
async fn list_all(
    lister: &dyn ObjectLister,
    prefix: &str,
    page_size: usize,
) -> anyhow::Result<Vec<ObjectEntry>> {
    let mut entries = Vec::new();
    let mut request = ListRequest::new(prefix).with_max_keys(page_size);
    loop {
        let page = lister.list(&request).await?;
        let next = page.continuation();
        entries.extend(page.entries);
        if !page.is_truncated {
            return Ok(entries);
        }
        match next {
            Some(marker) if request.marker.as_deref().map_or(true, |prev| marker.as_str() > prev) => {
                request.marker = Some(marker);
            }
            _ => anyhow::bail!("listing stopped advancing after {} objects", entries.len()),
        }
    }
}

fn cmd_config(config: &WatchConfig) -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
