use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LogError;

/// Message severity, ordered from least to most severe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Severity {
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl Severity {
    /// Upper-case name as it appears in log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    /// The equivalent `tracing` level.
    pub fn to_level(self) -> tracing::Level {
        match self {
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(LogError::UnknownSeverity(s.to_string())),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = LogError;

    fn try_from(value: String) -> Result<Self, LogError> {
        value.parse()
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_severity() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("ERROR".parse::<Severity>().unwrap(), Severity::Error);
        assert_eq!(" info ".parse::<Severity>().unwrap(), Severity::Info);
        assert_eq!("Warning".parse::<Severity>().unwrap(), Severity::Warn);
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "verbose".parse::<Severity>().unwrap_err();
        assert!(matches!(err, LogError::UnknownSeverity(ref s) if s == "verbose"));
    }

    #[test]
    fn try_from_string_parses() {
        assert_eq!(Severity::try_from("warn".to_string()).unwrap(), Severity::Warn);
        assert!(matches!(
            Severity::try_from(String::from("loud")),
            Err(LogError::UnknownSeverity(_))
        ));
    }

    #[test]
    fn display_is_upper_case() {
        assert_eq!(Severity::Warn.to_string(), "WARN");
        assert_eq!(String::from(Severity::Debug), "DEBUG");
    }

    #[test]
    fn maps_to_tracing_level() {
        assert_eq!(Severity::Error.to_level(), tracing::Level::ERROR);
        assert_eq!(Severity::Debug.to_level(), tracing::Level::DEBUG);
    }
}
