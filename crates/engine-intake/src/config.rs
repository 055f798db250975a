//! Configuration for the intake queue.
//!
//! Defaults can be overridden with environment variables:
//!
//! - `ENGINE_PRUNE_EMPTY_LEVELS` (default: `true`)
//! - `ENGINE_IDLE_WAIT_MS`       (default: `50`)
//! - `ENGINE_TRACE_EVENTS`       (default: `false`)

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use engine_core::BookConfig;

use crate::error::IntakeError;

/// Intake queue configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeConfig {
    /// Policy of the book owned by the queue.
    pub book: BookConfig,

    /// Longest the continuous worker sleeps between drains when nothing
    /// is submitted. Cancellation and new submissions wake it earlier.
    pub idle_wait: Duration,

    /// Attach a `TracingObserver` so fills and status changes are logged.
    pub trace_events: bool,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        IntakeConfig {
            book: BookConfig::default(),
            idle_wait: Duration::from_millis(50),
            trace_events: false,
        }
    }
}

impl IntakeConfig {
    /// Construct an `IntakeConfig` from environment variables, falling back
    /// to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
            .context("loading intake configuration from environment")
    }

    /// Same as [`from_env`](Self::from_env) but reading values through
    /// `lookup`, so callers (and tests) can supply their own source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IntakeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = IntakeConfig::default();

        let prune_empty_levels = read_flag_or_default(
            &lookup,
            "ENGINE_PRUNE_EMPTY_LEVELS",
            defaults.book.prune_empty_levels,
        )?;
        let idle_wait_ms = read_or_default(
            &lookup,
            "ENGINE_IDLE_WAIT_MS",
            defaults.idle_wait.as_millis() as u64,
        )?;
        let trace_events =
            read_flag_or_default(&lookup, "ENGINE_TRACE_EVENTS", defaults.trace_events)?;

        Ok(IntakeConfig {
            book: BookConfig { prune_empty_levels },
            idle_wait: Duration::from_millis(idle_wait_ms),
            trace_events,
        })
    }
}

fn read_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T, IntakeError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(val) => val.trim().parse::<T>().map_err(|e| IntakeError::Config {
            key: key.to_string(),
            reason: format!("{val:?}: {e}"),
        }),
        None => Ok(default),
    }
}

fn read_flag_or_default<F>(lookup: &F, key: &str, default: bool) -> Result<bool, IntakeError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(val) = lookup(key) else {
        return Ok(default);
    };
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(IntakeError::Config {
            key: key.to_string(),
            reason: format!("{val:?} is not a boolean"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = IntakeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, IntakeConfig::default());
        assert!(config.book.prune_empty_levels);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = IntakeConfig::from_lookup(lookup(&[
            ("ENGINE_PRUNE_EMPTY_LEVELS", "no"),
            ("ENGINE_IDLE_WAIT_MS", " 5 "),
            ("ENGINE_TRACE_EVENTS", "TRUE"),
        ]))
        .unwrap();

        assert!(!config.book.prune_empty_levels);
        assert_eq!(config.idle_wait, Duration::from_millis(5));
        assert!(config.trace_events);
    }

    #[test]
    fn bad_values_name_the_key() {
        let err =
            IntakeConfig::from_lookup(lookup(&[("ENGINE_IDLE_WAIT_MS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("ENGINE_IDLE_WAIT_MS"));

        let err =
            IntakeConfig::from_lookup(lookup(&[("ENGINE_TRACE_EVENTS", "maybe")])).unwrap_err();
        assert!(matches!(err, IntakeError::Config { .. }));
    }
}
