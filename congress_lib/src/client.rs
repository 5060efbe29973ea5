//! The core client: upstream clients, their limiters, and the retry policy.

use std::sync::Arc;

use congress_api::{Client, FeedClient, HOUSE_BASE_URL, SENATE_BASE_URL};
use serde_json::Value;

use crate::config::Config;
use crate::error::CongressError;
use crate::rate_limiter::{with_retry, RetryPolicy, TokenBucket, TrackerSummary};

/// Entry point for every core operation.
///
/// Holds one limiter per upstream class: Congress.gov calls share
/// `api_limiter`, House and Senate feed documents share `feed_limiter`.
/// Cloning is cheap and clones share the limiters.
#[derive(Clone)]
pub struct CongressClient {
    pub(crate) api: Client,
    pub(crate) feeds: FeedClient,
    pub(crate) api_limiter: Arc<TokenBucket>,
    pub(crate) feed_limiter: Arc<TokenBucket>,
    pub(crate) retry: RetryPolicy,
}

impl CongressClient {
    /// Builds clients and limiters from `config`.
    pub fn from_config(config: &Config) -> Result<Self, CongressError> {
        let api = match &config.api_base_url {
            Some(url) => Client::with_base_url(url, &config.api_key)?,
            None => Client::new(&config.api_key)?,
        };
        let feeds = match (&config.house_feed_url, &config.senate_feed_url) {
            (None, None) => FeedClient::new()?,
            (house, senate) => FeedClient::with_base_urls(
                house.as_deref().unwrap_or(HOUSE_BASE_URL),
                senate.as_deref().unwrap_or(SENATE_BASE_URL),
            )?,
        };
        let api_limiter = Arc::new(TokenBucket::for_congress_api(config.congress_rate)?);
        let feed_limiter = Arc::new(TokenBucket::for_xml_feeds(config.max_concurrency)?);
        tracing::info!(
            "Rate limiters initialized: Congress API rate={}/s, XML feeds concurrency={}",
            config.congress_rate,
            config.max_concurrency
        );
        Ok(Self::with_parts(api, feeds, api_limiter, feed_limiter, config.retry.clone()))
    }

    /// Assembles a client from pre-built parts.
    pub fn with_parts(
        api: Client,
        feeds: FeedClient,
        api_limiter: Arc<TokenBucket>,
        feed_limiter: Arc<TokenBucket>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            api,
            feeds,
            api_limiter,
            feed_limiter,
            retry,
        }
    }

    /// Request outcome counters for the Congress.gov limiter.
    pub fn api_stats(&self) -> TrackerSummary {
        self.api_limiter.tracker().summary()
    }

    /// Request outcome counters for the XML feed limiter.
    pub fn feed_stats(&self) -> TrackerSummary {
        self.feed_limiter.tracker().summary()
    }

    /// GET a Congress.gov envelope through the API limiter with retries.
    pub(crate) async fn get_envelope(
        &self,
        path: &str,
        params: Vec<(String, String)>,
    ) -> Result<Value, CongressError> {
        let call = format!("GET {}", path);
        with_retry(&self.api_limiter, &self.retry, &call, || {
            self.api.get_json(path, &params)
        })
        .await
    }
}
