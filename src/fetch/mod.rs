//! Page fetching with classified retry and exponential backoff.
//!
//! The [`Fetcher`] trait is the seam between the pipeline driver and the
//! network: production uses [`SpendingClient`], tests use scripted fakes.
//!
//! # Example
//!
//! ```no_run
//! use spendpull_core::{PageRequest, PullConfig, SpendingClient};
//! use spendpull_core::fetch::Fetcher;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PullConfig::default();
//! let client = SpendingClient::new(&config)?;
//! let request = PageRequest::new(&config, "336411", 1);
//! let page = client.fetch_page(&request).await?;
//! println!("fetched {} records", page.records.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod retry;

use async_trait::async_trait;

use crate::api::{PageRequest, TransactionPage};

pub use client::SpendingClient;
pub use error::FetchError;
pub use retry::{DEFAULT_MAX_DELAY, FailureType, RetryDecision, RetryPolicy, classify_error};

/// Fetches one page of transaction records for one filter category.
///
/// Implementations own their retry behavior: a returned error is final for
/// that request and halts the pull.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the page described by `request`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the request fails fatally (retry budget
    /// exhausted, non-retryable response, or malformed body).
    async fn fetch_page(&self, request: &PageRequest) -> Result<TransactionPage, FetchError>;
}
