//! HTTP client for the transaction search endpoint.
//!
//! [`SpendingClient`] wraps a pooled `reqwest::Client` configured with the
//! project timeouts and User-Agent, and implements [`Fetcher`] by posting one
//! page request per call with classified retry and exponential backoff.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::api::{PageRequest, PageResponse, TransactionPage};
use crate::config::PullConfig;
use crate::user_agent;

use super::retry::{DEFAULT_MAX_DELAY, FailureType, RetryDecision, RetryPolicy, classify_error};
use super::{FetchError, Fetcher};

/// HTTP fetcher for pages of transaction records.
///
/// Created once per pull and reused for every request, taking advantage of
/// connection pooling. The endpoint comes from [`PullConfig`], so tests point
/// it at a mock server.
#[derive(Debug)]
pub struct SpendingClient {
    client: Client,
    endpoint: String,
    policy: RetryPolicy,
}

impl SpendingClient {
    /// Creates a client from the pull configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if HTTP client construction fails.
    #[instrument(skip_all, fields(endpoint = %config.endpoint))]
    pub fn new(config: &PullConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.read_timeout_secs))
            .user_agent(user_agent::default_api_user_agent())
            .gzip(true)
            .build()
            .map_err(|source| FetchError::ClientBuild { source })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            policy: RetryPolicy::new(config.max_retries, config.backoff_base, DEFAULT_MAX_DELAY),
        })
    }

    /// Returns the retry policy in effect.
    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Issues one POST for the page, without retry.
    async fn post_page(&self, request: &PageRequest) -> Result<TransactionPage, FetchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::timeout(&self.endpoint)
                } else {
                    FetchError::network(&self.endpoint, e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(&self.endpoint, status.as_u16()));
        }

        let body: PageResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(&self.endpoint)
            } else {
                FetchError::decode(&self.endpoint, e)
            }
        })?;

        // A decoded body without `results` is an unexpected shape, not
        // end-of-data; surface it instead of defaulting to an empty list.
        let Some(records) = body.results else {
            return Err(FetchError::missing_results(&self.endpoint));
        };

        let has_next = body.page_metadata.and_then(|m| m.has_next);
        if let Some(has_next) = has_next {
            debug!(page = request.page, has_next, "page metadata");
        }

        Ok(TransactionPage { records, has_next })
    }
}

#[async_trait]
impl Fetcher for SpendingClient {
    #[instrument(skip(self, request), fields(naics = request.naics_code(), page = request.page))]
    async fn fetch_page(&self, request: &PageRequest) -> Result<TransactionPage, FetchError> {
        let mut attempt = 1u32;
        loop {
            let error = match self.post_page(request).await {
                Ok(page) => return Ok(page),
                Err(error) => error,
            };

            let failure_type = classify_error(&error);
            match self.policy.should_retry(failure_type, attempt) {
                RetryDecision::Retry {
                    delay,
                    attempt: next_attempt,
                } => {
                    warn!(
                        attempt,
                        max_attempts = self.policy.max_attempts(),
                        wait_ms = delay.as_millis() as u64,
                        error = %error,
                        "transient fetch failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt = next_attempt;
                }
                RetryDecision::DoNotRetry { reason } => {
                    warn!(attempt, %reason, error = %error, "fetch failed fatally");
                    // Retryable failures that ran out of budget become a
                    // retries-exhausted error; everything else propagates as-is.
                    if matches!(
                        failure_type,
                        FailureType::Transient | FailureType::RateLimited
                    ) {
                        return Err(FetchError::retries_exhausted(
                            &self.endpoint,
                            self.policy.max_attempts(),
                        ));
                    }
                    return Err(error);
                }
            }
        }
    }
}
