use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// Logging configuration shared by every subsystem.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Messages below this severity are dropped.
    pub level: Severity,
    /// Subsystems allowed to emit below `Warn`. Empty means all of them.
    pub filter: Vec<String>,
}

impl LogConfig {
    /// Returns `true` if `subsystem` may emit a message at `severity`.
    pub fn allows(&self, subsystem: &str, severity: Severity) -> bool {
        if severity < self.level {
            return false;
        }
        if self.filter.is_empty() || severity >= Severity::Warn {
            return true;
        }
        let subsystem = subsystem.trim();
        self.filter
            .iter()
            .any(|name| name.trim().eq_ignore_ascii_case(subsystem))
    }
}

/// Snapshot of emitted message counts, by severity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogStats {
    pub debugs: u64,
    pub infos: u64,
    pub warnings: u64,
    pub errors: u64,
}

impl LogStats {
    /// Total number of emitted messages.
    pub fn total(&self) -> u64 {
        self.debugs + self.infos + self.warnings + self.errors
    }
}

#[derive(Default)]
struct Counters {
    debugs: AtomicU64,
    infos: AtomicU64,
    warnings: AtomicU64,
    errors: AtomicU64,
}

impl Counters {
    fn bump(&self, severity: Severity) {
        let counter = match severity {
            Severity::Debug => &self.debugs,
            Severity::Info => &self.infos,
            Severity::Warn => &self.warnings,
            Severity::Error => &self.errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> LogStats {
        LogStats {
            debugs: self.debugs.load(Ordering::Relaxed),
            infos: self.infos.load(Ordering::Relaxed),
            warnings: self.warnings.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

struct Shared {
    config: LogConfig,
    counters: Counters,
}

/// Logging context, built once and passed to every component.
///
/// Cloning is cheap; all clones share the same configuration and counters.
#[derive(Clone)]
pub struct Logging {
    shared: Arc<Shared>,
}

impl Logging {
    /// Create a new context from the given configuration.
    pub fn new(config: LogConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                counters: Counters::default(),
            }),
        }
    }

    /// A logger bound to the given subsystem name.
    pub fn logger(&self, subsystem: impl Into<String>) -> Logger {
        Logger {
            subsystem: Arc::from(subsystem.into()),
            shared: Arc::clone(&self.shared),
        }
    }

    /// The configuration this context was built from.
    pub fn config(&self) -> &LogConfig {
        &self.shared.config
    }

    /// Counts of messages emitted so far across all subsystems.
    pub fn stats(&self) -> LogStats {
        self.shared.counters.snapshot()
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self::new(LogConfig::default())
    }
}

impl fmt::Debug for Logging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logging")
            .field("config", &self.shared.config)
            .field("stats", &self.stats())
            .finish()
    }
}

/// Subsystem-scoped logging handle.
#[derive(Clone)]
pub struct Logger {
    subsystem: Arc<str>,
    shared: Arc<Shared>,
}

impl Logger {
    /// The subsystem name attached to every message.
    pub fn subsystem(&self) -> &str {
        &self.subsystem
    }

    /// Returns `true` if a message at `severity` would be emitted.
    pub fn enabled(&self, severity: Severity) -> bool {
        self.shared.config.allows(&self.subsystem, severity)
    }

    /// Emit a message at the given severity.
    pub fn log(&self, severity: Severity, message: impl fmt::Display) {
        if !self.enabled(severity) {
            return;
        }
        self.shared.counters.bump(severity);

        let subsystem = &*self.subsystem;
        match severity {
            Severity::Debug => tracing::debug!(subsystem, "{message}"),
            Severity::Info => tracing::info!(subsystem, "{message}"),
            Severity::Warn => tracing::warn!(subsystem, "{message}"),
            Severity::Error => tracing::error!(subsystem, "{message}"),
        }
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Severity::Debug, message);
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.log(Severity::Info, message);
    }

    pub fn warn(&self, message: impl fmt::Display) {
        self.log(Severity::Warn, message);
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.log(Severity::Error, message);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("subsystem", &self.subsystem)
            .finish()
    }
}
