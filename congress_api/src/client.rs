//! HTTP client for the Congress.gov v3 JSON API.

use std::fmt;
use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::errors::{truncate_body, Error};

/// Request timeout for Congress.gov calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

const DEFAULT_BASE_URL: &str = "https://api.congress.gov/v3";

/// Congress.gov JSON API client.
///
/// Every request carries the API key and `format=json`. Responses are
/// returned as the raw JSON envelope; locating the payload inside it is
/// left to [`crate::unwrap_payload`].
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Client {
    /// Creates a client pointing at the production Congress.gov API.
    pub fn new(api_key: &str) -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: &str, api_key: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::network(base_url, e))?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> Result<Url, Error> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|e| {
            tracing::error!("Invalid URL constructed: {} ({})", joined, e);
            Error::InvalidUrl(joined)
        })
    }

    /// Performs a GET against `path` and decodes the JSON envelope.
    ///
    /// Non-success statuses become [`Error::HttpStatus`] carrying a body
    /// snippet; undecodable bodies become [`Error::Decode`].
    pub async fn get_json(&self, path: &str, params: &[(String, String)]) -> Result<Value, Error> {
        let url = self.url_for(path)?;
        let display_url = url.to_string();
        tracing::info!("Requesting Congress API: {} with params: {:?}", path, params);

        let resp = self
            .http
            .get(url)
            .query(params)
            .query(&[("api_key", self.api_key.as_str()), ("format", "json")])
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::network(&display_url, e))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::network(&display_url, e))?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::debug!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                url: display_url,
                status: status.as_u16(),
                body: snippet,
            });
        }

        serde_json::from_str::<Value>(&body).map_err(|e| Error::Decode {
            url: display_url,
            message: format!("{} | body: {}", e, truncate_body(&body)),
        })
    }
}
