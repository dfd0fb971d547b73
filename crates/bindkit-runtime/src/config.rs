#![forbid(unsafe_code)]

//! Main-loop configuration with environment overrides.
//!
//! | Variable                | Field       | Format                      |
//! |-------------------------|-------------|-----------------------------|
//! | `BINDKIT_POLL_SLICE_MS` | `poll_slice`| positive integer (ms)       |
//! | `BINDKIT_MAX_RUN_MS`    | `max_run`   | integer ms, `0` = unlimited |
//!
//! Invalid values are reported as [`ConfigError`] diagnostics and the field
//! keeps its default.

use std::env;
use std::fmt;
use std::time::Duration;

pub const ENV_POLL_SLICE_MS: &str = "BINDKIT_POLL_SLICE_MS";
pub const ENV_MAX_RUN_MS: &str = "BINDKIT_MAX_RUN_MS";

/// Configuration for [`MainLoop`](crate::MainLoop).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Longest single sleep while waiting for the next deadline.
    pub poll_slice: Duration,
    /// Give up on `run_until_idle` after this long (`None` = never).
    pub max_run: Option<Duration>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            poll_slice: Duration::from_millis(100),
            max_run: None,
        }
    }
}

impl RuntimeConfig {
    #[must_use]
    pub fn with_poll_slice(mut self, slice: Duration) -> Self {
        self.poll_slice = slice;
        self
    }

    #[must_use]
    pub fn with_max_run(mut self, max_run: Option<Duration>) -> Self {
        self.max_run = max_run;
        self
    }

    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> RuntimeConfigParse {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Parse config through an arbitrary variable lookup.
    pub fn from_env_with<F>(mut get: F) -> RuntimeConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let mut errors = Vec::new();

        if let Some(value) = get(ENV_POLL_SLICE_MS) {
            match parse_u64(&value) {
                Some(ms) if ms > 0 => config.poll_slice = Duration::from_millis(ms),
                _ => errors.push(ConfigError::new(
                    "poll_slice",
                    value,
                    "expected positive integer milliseconds",
                )),
            }
        }

        if let Some(value) = get(ENV_MAX_RUN_MS) {
            match parse_u64(&value) {
                Some(0) => config.max_run = None,
                Some(ms) => config.max_run = Some(Duration::from_millis(ms)),
                None => errors.push(ConfigError::new(
                    "max_run",
                    value,
                    "expected integer milliseconds (0 = unlimited)",
                )),
            }
        }

        RuntimeConfigParse { config, errors }
    }
}

/// Result of parsing [`RuntimeConfig`] with diagnostics.
#[derive(Debug, Clone)]
pub struct RuntimeConfigParse {
    pub config: RuntimeConfig,
    pub errors: Vec<ConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    pub fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

#[inline]
fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}
