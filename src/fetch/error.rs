//! Error types for the fetch module.
//!
//! Structured errors for page-fetch operations, carrying the endpoint and
//! enough context for retry classification and user-facing diagnostics.

use thiserror::Error;

/// Errors that can occur while fetching a page of transaction records.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error calling {url}: {source}")]
    Network {
        /// The endpoint that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout calling {url}")]
    Timeout {
        /// The endpoint that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// The endpoint that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response body could not be decoded as JSON.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        /// The endpoint whose body failed to decode.
        url: String,
        /// The underlying decode error.
        #[source]
        source: reqwest::Error,
    },

    /// The body decoded but has no `results` key.
    ///
    /// Distinct from an empty result list: an empty list is legitimate
    /// end-of-data, a missing key is an unexpected response shape.
    #[error("response from {url} is missing the `results` key")]
    MissingResults {
        /// The endpoint that returned the malformed body.
        url: String,
    },

    /// All retry attempts for one page request were exhausted.
    #[error("request to {url} failed after {attempts} attempts")]
    RetriesExhausted {
        /// The endpoint that kept failing.
        url: String,
        /// How many attempts were made.
        attempts: u32,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a decode error.
    pub fn decode(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }

    /// Creates a missing-results error.
    pub fn missing_results(url: impl Into<String>) -> Self {
        Self::MissingResults { url: url.into() }
    }

    /// Creates a retries-exhausted error.
    pub fn retries_exhausted(url: impl Into<String>, attempts: u32) -> Self {
        Self::RetriesExhausted {
            url: url.into(),
            attempts,
        }
    }
}

// Note on From trait implementations: we intentionally do NOT implement
// `From<reqwest::Error>` because the variants require context (url) that the
// source error does not provide. The helper constructors are the pattern here.
