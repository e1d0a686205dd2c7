//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building the shared HTTP client with browser-like headers
//! - GET requests returning the full document body
//! - Bounded retries with exponential backoff
//!
//! A fetch never raises: after the last attempt it reports
//! [`FetchResult::Exhausted`] and the caller skips the document.

use crate::config::Config;
use crate::crawler::throttle::Sleeper;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;
use url::Url;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml";
const ACCEPT_LANGUAGE_EN: &str = "en-US,en;q=0.9";

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the document
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Document body
        body: String,
    },

    /// Every attempt failed
    Exhausted {
        /// Number of attempts made
        attempts: u32,
        /// Description of the last failure
        error: String,
    },
}

impl FetchResult {
    /// The document body, if the fetch succeeded
    pub fn into_body(self) -> Option<String> {
        match self {
            FetchResult::Success { body, .. } => Some(body),
            FetchResult::Exhausted { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success { .. })
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The harvester configuration (user agent and timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_EN));

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(config.timeout())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Backoff before retrying after the given 0-based attempt: 1s, 2s, 4s, ...
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt))
}

/// Issues GET requests with bounded retries
#[derive(Debug, Clone)]
pub struct Fetcher<S> {
    client: Client,
    sleeper: S,
    max_attempts: u32,
}

impl<S: Sleeper> Fetcher<S> {
    /// Creates a fetcher making at most `max_attempts` attempts per URL
    pub fn new(client: Client, sleeper: S, max_attempts: u32) -> Self {
        Self {
            client,
            sleeper,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Fetches a URL, retrying transport errors and non-2xx responses
    ///
    /// # Retry Logic
    ///
    /// | Attempt | On failure |
    /// |---------|------------|
    /// | 0 | warn, sleep 1s |
    /// | 1 | warn, sleep 2s |
    /// | n < max - 1 | warn, sleep 2^n s |
    /// | max - 1 | warn, then error and give up |
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    ///
    /// # Returns
    ///
    /// A FetchResult holding either the body or the last failure
    pub async fn fetch(&self, url: &Url) -> FetchResult {
        let mut last_error = String::new();

        for attempt in 0..self.max_attempts {
            match self.try_fetch(url).await {
                Ok(result) => return result,
                Err(e) => {
                    tracing::warn!(
                        "Attempt {}/{} failed for {}: {}",
                        attempt + 1,
                        self.max_attempts,
                        url,
                        e
                    );
                    last_error = e.to_string();
                }
            }

            if attempt + 1 < self.max_attempts {
                self.sleeper.sleep(backoff_delay(attempt)).await;
            }
        }

        tracing::error!(
            "Failed to fetch {} after {} attempts",
            url,
            self.max_attempts
        );
        FetchResult::Exhausted {
            attempts: self.max_attempts,
            error: last_error,
        }
    }

    async fn try_fetch(&self, url: &Url) -> Result<FetchResult, reqwest::Error> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await?
            .error_for_status()?;

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.text().await?;

        tracing::debug!("Fetched {} ({} bytes)", final_url, body.len());
        Ok(FetchResult::Success {
            final_url,
            status_code,
            body,
        })
    }
}
