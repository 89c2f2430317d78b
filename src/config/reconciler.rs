//! # Reconciler Configuration
//!
//! Reconciler-level settings loaded from environment variables.

use std::time::Duration;

/// Reconciler-level configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerConfig {
    /// Budget for retrying transient client errors on the initial add (seconds)
    pub create_retry_timeout_secs: u64,
    /// Retry backoff starting value (milliseconds)
    pub backoff_start_ms: u64,
    /// Retry backoff maximum value (milliseconds)
    pub backoff_max_ms: u64,
    /// Maximum number of targets in a single desired set
    /// Prevents a single request from exceeding the registry's batch limit
    pub max_targets_per_request: usize,
    /// Global log level (ERROR, WARN, INFO, DEBUG, TRACE)
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: String,
    /// Enable color in text format logs
    pub log_enable_color: bool,
    /// Enable metrics collection
    pub enable_metrics: bool,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        use crate::constants::*;
        Self {
            create_retry_timeout_secs: DEFAULT_CREATE_RETRY_TIMEOUT_SECS,
            backoff_start_ms: DEFAULT_BACKOFF_START_MS,
            backoff_max_ms: DEFAULT_BACKOFF_MAX_MS,
            max_targets_per_request: DEFAULT_MAX_TARGETS_PER_REQUEST,
            log_level: "INFO".to_string(),
            log_format: "text".to_string(),
            log_enable_color: true,
            enable_metrics: true,
        }
    }
}

impl ReconcilerConfig {
    /// Load configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup with defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        use crate::constants::*;
        Self {
            create_retry_timeout_secs: var_or_default(
                &lookup,
                "CREATE_RETRY_TIMEOUT_SECS",
                DEFAULT_CREATE_RETRY_TIMEOUT_SECS,
            ),
            backoff_start_ms: var_or_default(&lookup, "BACKOFF_START_MS", DEFAULT_BACKOFF_START_MS),
            backoff_max_ms: var_or_default(&lookup, "BACKOFF_MAX_MS", DEFAULT_BACKOFF_MAX_MS),
            max_targets_per_request: var_or_default(
                &lookup,
                "MAX_TARGETS_PER_REQUEST",
                DEFAULT_MAX_TARGETS_PER_REQUEST,
            ),
            log_level: var_or_default_str(&lookup, "LOG_LEVEL", "INFO"),
            log_format: var_or_default_str(&lookup, "LOG_FORMAT", "text"),
            log_enable_color: var_or_default_bool(&lookup, "LOG_ENABLE_COLOR", true),
            enable_metrics: var_or_default_bool(&lookup, "ENABLE_METRICS", true),
        }
    }

    /// Get create retry budget duration
    #[must_use]
    pub fn create_retry_timeout(&self) -> Duration {
        Duration::from_secs(self.create_retry_timeout_secs)
    }

    /// Get backoff start duration
    #[must_use]
    pub fn backoff_start_duration(&self) -> Duration {
        Duration::from_millis(self.backoff_start_ms)
    }

    /// Get backoff max duration
    #[must_use]
    pub fn backoff_max_duration(&self) -> Duration {
        Duration::from_millis(self.backoff_max_ms)
    }
}

/// Read variable or return default value
fn var_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Read variable as boolean or return default
fn var_or_default_bool<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map_or(default, |v| {
        let v_lower = v.to_lowercase();
        v_lower == "true" || v_lower == "1" || v_lower == "yes" || v_lower == "on"
    })
}

/// Read variable as string or return default
fn var_or_default_str<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = ReconcilerConfig::from_lookup(|_| None);
        assert_eq!(config, ReconcilerConfig::default());
        assert_eq!(config.create_retry_timeout(), Duration::from_secs(240));
        assert_eq!(config.backoff_start_duration(), Duration::from_secs(1));
        assert_eq!(config.backoff_max_duration(), Duration::from_secs(30));
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = ReconcilerConfig::from_lookup(lookup_from(&[
            ("CREATE_RETRY_TIMEOUT_SECS", "30"),
            ("BACKOFF_START_MS", "250"),
            ("LOG_FORMAT", "json"),
            ("ENABLE_METRICS", "off"),
            ("LOG_ENABLE_COLOR", "YES"),
        ]));
        assert_eq!(config.create_retry_timeout_secs, 30);
        assert_eq!(config.backoff_start_ms, 250);
        assert_eq!(config.log_format, "json");
        assert!(!config.enable_metrics);
        assert!(config.log_enable_color);
    }

    #[test]
    fn test_unparseable_number_falls_back_to_default() {
        let config =
            ReconcilerConfig::from_lookup(lookup_from(&[("BACKOFF_MAX_MS", "thirty seconds")]));
        assert_eq!(config.backoff_max_ms, crate::constants::DEFAULT_BACKOFF_MAX_MS);
    }
}
