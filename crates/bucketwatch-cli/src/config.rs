use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use bucketwatch_log::{LogConfig, Severity};
use bucketwatch_poller::PollerConfig;
use serde::{Deserialize, Serialize};

/// Configuration file contents; every field is optional in the file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub prefix: String,
    pub interval_secs: u64,
    pub page_size: usize,
    pub batch_size: usize,
    pub log: LogConfig,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            interval_secs: PollerConfig::DEFAULT_INTERVAL.as_secs(),
            page_size: PollerConfig::DEFAULT_PAGE_SIZE,
            batch_size: 100,
            log: LogConfig {
                level: Severity::Info,
                filter: Vec::new(),
            },
        }
    }
}

impl WatchConfig {
    /// Load from `path`, or fall back to defaults when no file is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig::new(self.prefix.clone())
            .with_interval(Duration::from_secs(self.interval_secs))
            .with_page_size(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = WatchConfig::default();
        assert_eq!(c.interval_secs, 5);
        assert_eq!(c.page_size, 1000);
        assert_eq!(c.batch_size, 100);
        assert_eq!(c.log.level, Severity::Info);
        assert_eq!(c.poller_config().interval, Duration::from_secs(5));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let c: WatchConfig = toml::from_str(
            "prefix = \"logs/\"\npage_size = 50\n\n[log]\nlevel = \"error\"\n",
        )
        .unwrap();
        assert_eq!(c.prefix, "logs/");
        assert_eq!(c.page_size, 50);
        assert_eq!(c.interval_secs, 5);
        assert_eq!(c.log.level, Severity::Error);

        let p = c.poller_config();
        assert_eq!(p.prefix, "logs/");
        assert_eq!(p.page_size, 50);
    }

    #[test]
    fn load_without_path_is_default() {
        assert_eq!(WatchConfig::load(None).unwrap(), WatchConfig::default());
    }

    #[test]
    fn load_reads_file_and_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.toml");
        std::fs::write(&good, "batch_size = 7").unwrap();
        assert_eq!(WatchConfig::load(Some(&good)).unwrap().batch_size, 7);

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "batch_size = \"seven\"").unwrap();
        let err = WatchConfig::load(Some(&bad)).unwrap_err();
        assert!(err.to_string().contains("parsing config"));
    }

    #[test]
    fn round_trips_through_toml() {
        let c = WatchConfig::default();
        let text = toml::to_string_pretty(&c).unwrap();
        assert!(text.contains("level = \"INFO\""));
        assert_eq!(toml::from_str::<WatchConfig>(&text).unwrap(), c);
    }
}
