//! Configuration loading and representation.
//!
//! Values come from `STOCKDESK_*` environment variables with defaults for
//! anything unset. A value that is set but malformed is an error.

use thiserror::Error;

use stockdesk_inventory::SeverityThresholds;
use stockdesk_query::Pagination;

pub const LOG_FORMAT: &str = "STOCKDESK_LOG_FORMAT";
pub const PAGE_SIZE: &str = "STOCKDESK_PAGE_SIZE";
pub const ALERT_CRITICAL_RATIO: &str = "STOCKDESK_ALERT_CRITICAL_RATIO";
pub const ALERT_LOW_RATIO: &str = "STOCKDESK_ALERT_LOW_RATIO";
pub const RECENT_REPORTS_CAP: &str = "STOCKDESK_RECENT_REPORTS_CAP";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub log_format: LogFormat,
    pub page_size: usize,
    pub thresholds: SeverityThresholds,
    pub recent_reports_cap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Json,
            page_size: 10,
            thresholds: SeverityThresholds::default(),
            recent_reports_cap: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map here).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let log_format = match get(LOG_FORMAT) {
            None => defaults.log_format,
            Some(v) => match v.to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                _ => return Err(invalid(LOG_FORMAT, v, "expected json or pretty")),
            },
        };

        let page_size = match get(PAGE_SIZE) {
            None => defaults.page_size,
            Some(v) => parse::<usize>(PAGE_SIZE, v)?.clamp(1, Pagination::MAX_PAGE_SIZE),
        };

        let critical = match get(ALERT_CRITICAL_RATIO) {
            None => defaults.thresholds.critical_ratio(),
            Some(v) => parse::<f64>(ALERT_CRITICAL_RATIO, v)?,
        };
        let low = match get(ALERT_LOW_RATIO) {
            None => defaults.thresholds.low_ratio(),
            Some(v) => parse::<f64>(ALERT_LOW_RATIO, v)?,
        };
        let thresholds = SeverityThresholds::new(critical, low).map_err(|e| {
            invalid(ALERT_CRITICAL_RATIO, format!("{critical}/{low}"), e.to_string())
        })?;

        let recent_reports_cap = match get(RECENT_REPORTS_CAP) {
            None => defaults.recent_reports_cap,
            Some(v) => {
                let cap = parse::<usize>(RECENT_REPORTS_CAP, v.clone())?;
                if cap == 0 {
                    return Err(invalid(RECENT_REPORTS_CAP, v, "must be at least 1"));
                }
                cap
            }
        };

        Ok(Self {
            log_format,
            page_size,
            thresholds,
            recent_reports_cap,
        })
    }
}

fn invalid(key: &'static str, value: String, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        value,
        reason: reason.into(),
    }
}

fn parse<V>(key: &'static str, value: String) -> Result<V, ConfigError>
where
    V: core::str::FromStr,
    V::Err: core::fmt::Display,
{
    value.parse::<V>().map_err(|e| {
        let reason = e.to_string();
        invalid(key, value, reason)
    })
}
