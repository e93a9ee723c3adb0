use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::CoreError;

/// Tunables for one analysis run.
///
/// Defaults reproduce the fixed behavior of the budget tool: one year of
/// training history, a 30-day valuation window, at least 11 closes per
/// ticker, and an 80/20 split seeded with 42.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub training_lookback_days: i64,
    pub valuation_window_days: i64,
    pub min_series_points: usize,
    pub test_fraction: f64,
    pub split_seed: u64,
    pub fetch_timeout_secs: u64,

    /// Provider API keys, e.g. `"alphavantage"`.
    pub api_keys: HashMap<String, String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            training_lookback_days: 365,
            valuation_window_days: 30,
            min_series_points: 11,
            test_fraction: 0.2,
            split_seed: 42,
            fetch_timeout_secs: 10,
            api_keys: HashMap::new(),
        }
    }
}

impl AnalysisConfig {
    /// Read overrides from `HOUSEHOLD_*` environment variables.
    /// Unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let mut api_keys = HashMap::new();
        if let Some(key) = lookup("ALPHAVANTAGE_API_KEY").filter(|k| !k.trim().is_empty()) {
            api_keys.insert("alphavantage".to_string(), key);
        }

        Self {
            training_lookback_days: parse_or(
                &lookup,
                "HOUSEHOLD_TRAINING_LOOKBACK_DAYS",
                defaults.training_lookback_days,
            ),
            valuation_window_days: parse_or(
                &lookup,
                "HOUSEHOLD_VALUATION_WINDOW_DAYS",
                defaults.valuation_window_days,
            ),
            min_series_points: parse_or(
                &lookup,
                "HOUSEHOLD_MIN_SERIES_POINTS",
                defaults.min_series_points,
            ),
            test_fraction: parse_or(&lookup, "HOUSEHOLD_TEST_FRACTION", defaults.test_fraction),
            split_seed: parse_or(&lookup, "HOUSEHOLD_SPLIT_SEED", defaults.split_seed),
            fetch_timeout_secs: parse_or(
                &lookup,
                "HOUSEHOLD_FETCH_TIMEOUT_SECS",
                defaults.fetch_timeout_secs,
            ),
            api_keys,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.training_lookback_days <= 0 || self.valuation_window_days <= 0 {
            return Err(CoreError::Config(
                "lookback and valuation windows must be positive".into(),
            ));
        }
        if self.min_series_points < 2 {
            return Err(CoreError::Config(format!(
                "min_series_points must be at least 2, got {}",
                self.min_series_points
            )));
        }
        if !(0.0..1.0).contains(&self.test_fraction) {
            return Err(CoreError::Config(format!(
                "test_fraction must be in [0, 1), got {}",
                self.test_fraction
            )));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(CoreError::Config("fetch_timeout_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("ignoring unparsable {key}={raw:?}, using default");
            default
        }),
        None => default,
    }
}
