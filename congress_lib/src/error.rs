//! Error types for the core layer.

use thiserror::Error;

/// Errors surfaced by core operations.
///
/// Every variant names the upstream call it came from. Item-level problems
/// (one bad cosponsor, one malformed legislator entry) are logged and
/// skipped instead and never appear here.
#[derive(Error, Debug)]
pub enum CongressError {
    /// A retryable failure (HTTP 5xx/429, network fault, undecodable body)
    /// that persisted through every attempt.
    #[error("{call} failed after {attempts} attempt(s): {source}")]
    Transient {
        call: String,
        attempts: u32,
        #[source]
        source: congress_api::Error,
    },
    /// A non-retryable upstream rejection (HTTP 4xx other than 429).
    #[error("{call} was rejected by upstream: {source}")]
    Permanent {
        call: String,
        attempts: u32,
        #[source]
        source: congress_api::Error,
    },
    /// A required section of a response was missing or had the wrong shape.
    #[error("{call}: invalid document structure at {url} (missing {section})")]
    Structure {
        call: String,
        url: String,
        section: String,
    },
    /// Caller-supplied parameters were rejected before any request.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A rate limiter was configured with a non-positive rate or capacity.
    #[error("Invalid rate limiter configuration: {0}")]
    Limiter(String),
    /// Required configuration was missing.
    #[error("Configuration error: {0}")]
    Config(String),
    /// A concurrent fetch task panicked or was cancelled.
    #[error("{call}: task did not complete: {message}")]
    Task { call: String, message: String },
    /// An upstream client could not be constructed.
    #[error("Failed to build upstream client: {0}")]
    Client(#[from] congress_api::Error),
}

impl CongressError {
    /// HTTP status from the upstream, when the failure carried one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Transient { source, .. } | Self::Permanent { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Number of calls made before giving up, for request-level failures.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::Transient { attempts, .. } | Self::Permanent { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }

    /// URL of the failed request or document.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Transient { source, .. } | Self::Permanent { source, .. } => Some(source.url()),
            Self::Structure { url, .. } => Some(url),
            _ => None,
        }
    }

    pub(crate) fn structure(call: &str, url: &str, section: &str) -> Self {
        Self::Structure {
            call: call.to_string(),
            url: url.to_string(),
            section: section.to_string(),
        }
    }
}
