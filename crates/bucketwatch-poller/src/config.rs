use std::time::Duration;

use crate::error::{PollError, PollResult};

/// Settings for one [`Poller`](crate::Poller) instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollerConfig {
    /// Only keys under this prefix are reconciled.
    pub prefix: String,
    /// Listing delimiter. Empty lists the whole subtree.
    pub delimiter: String,
    /// Pause between the end of one cycle and the start of the next.
    pub interval: Duration,
    /// Entries requested per listing page.
    pub page_size: usize,
}

impl PollerConfig {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
    pub const DEFAULT_PAGE_SIZE: usize = 1000;

    /// Default settings for the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Reject settings that would make the loop degenerate.
    pub fn validate(&self) -> PollResult<()> {
        if self.page_size == 0 {
            return Err(PollError::Config("page size must be positive".into()));
        }
        if self.interval.is_zero() {
            return Err(PollError::Config("polling interval must be positive".into()));
        }
        Ok(())
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            delimiter: String::new(),
            interval: Self::DEFAULT_INTERVAL,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}
