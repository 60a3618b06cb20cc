//! Runtime settings sourced from the environment.
//!
//! | Variable                        | Default     |
//! |---------------------------------|-------------|
//! | `RISK_ARTIFACTS_DIR`            | `artifacts` |
//! | `RISK_ALLOW_UNSEALED_ARTIFACTS` | `false`     |
//! | `RISK_LOG_MODE`                 | `stderr`    |
//! | `RISK_LOG_FILE`                 | `insurance-risk.log` |

use std::path::PathBuf;

pub const ARTIFACTS_DIR_ENV: &str = "RISK_ARTIFACTS_DIR";
pub const ALLOW_UNSEALED_ENV: &str = "RISK_ALLOW_UNSEALED_ARTIFACTS";
pub const LOG_MODE_ENV: &str = "RISK_LOG_MODE";
pub const LOG_FILE_ENV: &str = "RISK_LOG_FILE";

const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";
const DEFAULT_LOG_FILE: &str = "insurance-risk.log";

/// Where log output goes. Stdout is reserved for prediction output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub artifacts_dir: PathBuf,
    pub allow_unsealed: bool,
    pub log_sink: LogSink,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            allow_unsealed: false,
            log_sink: LogSink::Stderr,
        }
    }
}

/// Accepts `1`, `true`, `yes` in the usual casings.
#[must_use]
pub fn parse_bool(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE" | "yes" | "YES")
}

impl Settings {
    /// Read settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let artifacts_dir = lookup(ARTIFACTS_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map_or(defaults.artifacts_dir, PathBuf::from);

        let allow_unsealed = lookup(ALLOW_UNSEALED_ENV).is_some_and(|v| parse_bool(&v));

        let log_sink = match lookup(LOG_MODE_ENV).as_deref() {
            Some("file") => LogSink::File(
                lookup(LOG_FILE_ENV)
                    .filter(|v| !v.is_empty())
                    .map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from),
            ),
            _ => LogSink::Stderr,
        };

        Self {
            artifacts_dir,
            allow_unsealed,
            log_sink,
        }
    }
}
