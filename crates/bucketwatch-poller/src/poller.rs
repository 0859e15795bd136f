use std::collections::HashSet;
use std::sync::Arc;

use bucketwatch_log::{Logger, Logging};
use bucketwatch_store::{ListRequest, ObjectEntry, ObjectLister, StoreError};
use tokio_util::sync::CancellationToken;

use crate::config::PollerConfig;
use crate::error::{PollError, PollResult};
use crate::handler::{AdditionHandler, RemovalHandler};
use crate::report::CycleReport;
use crate::seen::SeenSet;

/// Reconciles a [`SeenSet`] against the live contents of one namespace.
///
/// A poller is a single sequential loop: listing, fetching, and handler calls
/// never overlap within one instance. Run several pollers for several
/// prefixes; they share nothing.
pub struct Poller {
    config: PollerConfig,
    lister: Arc<dyn ObjectLister>,
    additions: Arc<dyn AdditionHandler>,
    removals: Arc<dyn RemovalHandler>,
    seen: SeenSet,
    log: Logger,
}

impl Poller {
    /// Create a poller with an empty SeenSet.
    ///
    /// Fails with [`PollError::Config`] if `config` is invalid.
    pub fn new(
        config: PollerConfig,
        lister: Arc<dyn ObjectLister>,
        additions: Arc<dyn AdditionHandler>,
        removals: Arc<dyn RemovalHandler>,
        logging: &Logging,
    ) -> PollResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            lister,
            additions,
            removals,
            seen: SeenSet::new(),
            log: logging.logger("poller"),
        })
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    /// Poll until `cancel` fires, then return the final SeenSet.
    ///
    /// The token is checked before every cycle and raced against the pause
    /// between cycles. A cycle already in progress runs to completion.
    pub async fn run(mut self, cancel: CancellationToken) -> SeenSet {
        self.log.info(format_args!(
            "polling prefix {:?} every {:?}",
            self.config.prefix, self.config.interval
        ));

        while !cancel.is_cancelled() {
            let report = self.poll_once().await;
            self.log.debug(format_args!(
                "cycle: {} pages, {} listed, {} added, {} unchanged, {} removed, {} failures",
                report.pages,
                report.listed,
                report.added,
                report.unchanged,
                report.removed,
                report.failures
            ));

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }

        self.log.info(format_args!("stopped with {} known keys", self.seen.len()));
        self.seen
    }

    /// Run exactly one reconciliation cycle.
    ///
    /// Additions are dispatched page by page while the listing is walked.
    /// Removals are dispatched only if every page was fetched; a partial
    /// listing cannot distinguish "deleted" from "not fetched yet".
    pub async fn poll_once(&mut self) -> CycleReport {
        let mut report = CycleReport::default();
        let mut listed: HashSet<String> = HashSet::new();
        let mut marker: Option<String> = None;

        report.listing_complete = loop {
            let request = ListRequest {
                prefix: self.config.prefix.clone(),
                delimiter: self.config.delimiter.clone(),
                marker: marker.clone(),
                max_keys: self.config.page_size,
            };
            let page = match self.lister.list(&request).await {
                Ok(page) => page,
                Err(e) => {
                    self.fail(&mut report, e.into());
                    break false;
                }
            };

            report.pages += 1;
            report.listed += page.entries.len();
            let continuation = page.continuation();

            for entry in page.entries {
                listed.insert(entry.key.clone());
                self.reconcile(entry, &mut report).await;
            }

            if !page.is_truncated {
                break true;
            }
            match continuation {
                Some(next) if marker.as_deref().map_or(true, |prev| next.as_str() > prev) => {
                    marker = Some(next);
                }
                _ => {
                    let marker = marker.unwrap_or_default();
                    self.fail(&mut report, StoreError::IncompletePage { marker }.into());
                    break false;
                }
            }
        };

        if report.listing_complete {
            self.dispatch_removals(&listed, &mut report).await;
        } else {
            self.log.warn(format_args!(
                "listing of prefix {:?} incomplete, removal detection skipped this cycle",
                self.config.prefix
            ));
        }
        report
    }

    async fn reconcile(&mut self, entry: ObjectEntry, report: &mut CycleReport) {
        if self.seen.is_current(&entry) {
            report.unchanged += 1;
            return;
        }

        let content = match self.lister.get(&entry.key).await {
            Ok(content) => content,
            Err(e) => {
                self.fail(report, e.into());
                return;
            }
        };

        let outcome = self.additions.on_addition(content, &entry).await;
        match outcome {
            Ok(()) => {
                report.added += 1;
                self.seen.record(entry.key, entry.marker);
            }
            Err(source) => {
                let key = entry.key;
                self.fail(report, PollError::Addition { key, source });
            }
        }
    }

    async fn dispatch_removals(&mut self, listed: &HashSet<String>, report: &mut CycleReport) {
        for key in self.seen.missing_from(listed) {
            let outcome = self.removals.on_removal(&key).await;
            match outcome {
                Ok(()) => {
                    self.seen.forget(&key);
                    report.removed += 1;
                }
                Err(source) => self.fail(report, PollError::Removal { key, source }),
            }
        }
    }

    fn fail(&self, report: &mut CycleReport, error: PollError) {
        report.failures += 1;
        self.log.error(error);
    }
}

impl std::fmt::Debug for Poller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller")
            .field("config", &self.config)
            .field("seen", &self.seen.len())
            .finish()
    }
}
