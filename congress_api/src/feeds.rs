//! Client for the per-chamber roll-call XML feeds.
//!
//! House votes are published by the Clerk keyed by (year, roll number);
//! Senate votes by the LIS keyed by (congress, session, vote number).

use std::time::Duration;

use crate::errors::{truncate_body, Error};
use crate::xml::XmlElement;

/// Request timeout for feed documents.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Production root of the House Clerk's roll-call documents.
pub const HOUSE_BASE_URL: &str = "https://clerk.house.gov/evs";
/// Production root of the Senate LIS roll-call documents.
pub const SENATE_BASE_URL: &str = "https://www.senate.gov/legislative/LIS/roll_call_votes";

/// Fetches and parses roll-call vote documents.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    house_base_url: String,
    senate_base_url: String,
}

impl FeedClient {
    /// Creates a client pointing at the production House and Senate feeds.
    pub fn new() -> Result<Self, Error> {
        Self::with_base_urls(HOUSE_BASE_URL, SENATE_BASE_URL)
    }

    /// Creates a client with custom feed roots (for testing with wiremock).
    pub fn with_base_urls(house_base_url: &str, senate_base_url: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| Error::network(house_base_url, e))?;
        Ok(Self {
            http,
            house_base_url: house_base_url.trim_end_matches('/').to_string(),
            senate_base_url: senate_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of a House roll call, e.g. `.../2024/roll042.xml`.
    pub fn house_vote_url(&self, year: i32, roll: u32) -> String {
        format!("{}/{}/roll{:03}.xml", self.house_base_url, year, roll)
    }

    /// URL of a Senate vote, e.g. `.../vote1181/vote_118_1_00042.xml`.
    pub fn senate_vote_url(&self, congress: u32, session: u32, number: u32) -> String {
        format!(
            "{}/vote{}{}/vote_{}_{}_{:05}.xml",
            self.senate_base_url, congress, session, congress, session, number
        )
    }

    /// Downloads `url` and parses it into an element tree.
    ///
    /// A body that is not well-formed XML becomes [`Error::Decode`].
    pub async fn fetch_document(&self, url: &str) -> Result<XmlElement, Error> {
        tracing::info!("Fetching XML from: {}", url);
        let resp = self
            .http
            .get(url)
            .header("accept", "application/xml, text/xml, */*")
            .send()
            .await
            .map_err(|e| Error::network(url, e))?;

        let status = resp.status();
        let bytes = resp.bytes().await.map_err(|e| Error::network(url, e))?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let root = XmlElement::parse(&bytes).map_err(|e| {
            tracing::error!("XML parsing error for {}: {}", url, e);
            Error::Decode {
                url: url.to_string(),
                message: e.to_string(),
            }
        })?;
        tracing::debug!("Successfully parsed XML from {}", url);
        Ok(root)
    }
}
