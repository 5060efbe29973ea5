//! Error types for upstream requests.

/// How a failed upstream call should be treated by a retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    /// HTTP 5xx or 429. Retry with backoff.
    Http,
    /// Connection reset, timeout, DNS failure. Retry with backoff.
    Network,
    /// The call completed but the body could not be decoded. Retried, but
    /// reported separately from HTTP failures.
    Unexpected,
    /// HTTP 4xx other than 429, or a request that could never succeed.
    Fatal,
}

impl RetryClass {
    pub fn is_retryable(self) -> bool {
        !matches!(self, RetryClass::Fatal)
    }
}

/// Errors that can occur when calling an upstream source.
///
/// URLs carried here never include the API key; it is attached as a query
/// parameter only when the request is sent.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The upstream answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16, body: String },
    /// The request never produced a response.
    #[error("network error calling {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The response body was not valid JSON or XML.
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
    /// A request URL could not be constructed.
    #[error("invalid request URL {0}")]
    InvalidUrl(String),
}

impl Error {
    pub(crate) fn network(url: &str, source: reqwest::Error) -> Self {
        Error::Network {
            url: url.to_string(),
            source: source.without_url(),
        }
    }

    /// The URL of the failed request, without credentials.
    pub fn url(&self) -> &str {
        match self {
            Error::HttpStatus { url, .. }
            | Error::Network { url, .. }
            | Error::Decode { url, .. }
            | Error::InvalidUrl(url) => url,
        }
    }

    /// The upstream HTTP status, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn retry_class(&self) -> RetryClass {
        match self {
            Error::HttpStatus { status, .. } if *status == 429 || *status >= 500 => {
                RetryClass::Http
            }
            Error::HttpStatus { .. } => RetryClass::Fatal,
            Error::Network { .. } => RetryClass::Network,
            Error::Decode { .. } => RetryClass::Unexpected,
            Error::InvalidUrl(_) => RetryClass::Fatal,
        }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 500;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
