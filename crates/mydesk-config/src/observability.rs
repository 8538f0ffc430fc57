//! Logging and metrics switches.
//!
//! # Environment Variables
//!
//! - `OBSERVABILITY_ENABLED`: enables the Prometheus recorder and `/metrics` (default `true`)
//! - `LOG_FORMAT`: `pretty` (default) or `json`
//! - `LOG_DIR`: when set, logs are also written to a daily-rolling file there

use crate::parse_flag;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone, Debug)]
pub struct ObservabilityConfig {
    pub enabled: bool,
    pub log_format: LogFormat,
    pub log_dir: Option<String>,
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            enabled: lookup("OBSERVABILITY_ENABLED")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            log_dir: lookup("LOG_DIR").filter(|dir| !dir.is_empty()),
        }
    }
}
