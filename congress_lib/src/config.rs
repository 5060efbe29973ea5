//! Runtime configuration, read from the environment once at startup.

use std::fmt;

use crate::error::CongressError;
use crate::rate_limiter::RetryPolicy;

pub const DEFAULT_CONGRESS_RATE: f64 = 1.3;
pub const DEFAULT_MAX_CONCURRENCY: u32 = 5;

/// Settings injected into [`crate::CongressClient`].
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    /// Sustained requests per second against Congress.gov.
    pub congress_rate: f64,
    /// XML feed documents fetched per second (and burst size).
    pub max_concurrency: u32,
    pub api_base_url: Option<String>,
    pub house_feed_url: Option<String>,
    pub senate_feed_url: Option<String>,
    pub retry: RetryPolicy,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("congress_rate", &self.congress_rate)
            .field("max_concurrency", &self.max_concurrency)
            .field("api_base_url", &self.api_base_url)
            .field("house_feed_url", &self.house_feed_url)
            .field("senate_feed_url", &self.senate_feed_url)
            .field("retry", &self.retry)
            .finish()
    }
}

impl Config {
    /// Defaults for everything except the API key.
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            congress_rate: DEFAULT_CONGRESS_RATE,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            api_base_url: None,
            house_feed_url: None,
            senate_feed_url: None,
            retry: RetryPolicy::default(),
        }
    }

    /// Reads `CONGRESS_API_KEY`, `CONGRESS_RATE`, `MAX_CONCURRENCY` and the
    /// optional base URL overrides from the process environment.
    pub fn from_env() -> Result<Self, CongressError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Config::from_env`] but reads through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CongressError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("CONGRESS_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| CongressError::Config("CONGRESS_API_KEY is not set".to_string()))?;

        let mut config = Self::new(&api_key);
        config.congress_rate = positive_or_default(
            &lookup,
            "CONGRESS_RATE",
            DEFAULT_CONGRESS_RATE,
            |v| v.parse::<f64>().ok().filter(|r| r.is_finite() && *r > 0.0),
        );
        config.max_concurrency = positive_or_default(
            &lookup,
            "MAX_CONCURRENCY",
            DEFAULT_MAX_CONCURRENCY,
            |v| v.parse::<u32>().ok().filter(|n| *n > 0),
        );
        config.api_base_url = non_empty(&lookup, "CONGRESS_API_BASE_URL");
        config.house_feed_url = non_empty(&lookup, "HOUSE_VOTES_BASE_URL");
        config.senate_feed_url = non_empty(&lookup, "SENATE_VOTES_BASE_URL");
        Ok(config)
    }
}

fn positive_or_default<F, T, P>(lookup: &F, key: &str, default: T, parse: P) -> T
where
    F: Fn(&str) -> Option<String>,
    T: fmt::Display + Copy,
    P: Fn(&str) -> Option<T>,
{
    match lookup(key) {
        None => default,
        Some(raw) => parse(raw.trim()).unwrap_or_else(|| {
            tracing::warn!("Invalid {} '{}' in environment, using default {}", key, raw, default);
            default
        }),
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
