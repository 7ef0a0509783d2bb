//! Authenticated HTTP client for the inventory API
//!
//! Every call goes through [`InventoryClient::request`], which:
//! - builds the URL from the base URL, an endpoint path and query parameters
//! - attaches the bearer token
//! - retries transport failures and 429 responses on an exponential schedule
//! - decodes a 200 body into the caller's type

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the inventory API
#[derive(Debug, Clone)]
pub struct InventoryClient {
    client: Client,
    base_url: String,
    token: String,
    retry: RetryPolicy,
}

impl InventoryClient {
    /// Create a client for `base_url`, authenticating with `token`
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self> {
        Url::parse(base_url).map_err(|source| Error::InvalidUrl {
            path: base_url.to_string(),
            source,
        })?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| Error::Transport {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            retry: RetryPolicy::default(),
        })
    }

    /// Replace the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Compose the full URL for an endpoint path and its query parameters
    pub fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, path);
        let mut url = Url::parse(&raw).map_err(|source| Error::InvalidUrl {
            path: path.to_string(),
            source,
        })?;

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Perform one logical call, retrying as the policy allows
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.url(path, query)?;
        let started = Instant::now();
        let mut backoff = self.retry.backoff();
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            let failure = match self
                .client
                .request(method.clone(), url.clone())
                .bearer_auth(&self.token)
                .send()
                .await
            {
                Ok(response) => match response.status() {
                    StatusCode::OK => {
                        debug!(url = %url, attempt, "Inventory API call succeeded");
                        let body = response.bytes().await.map_err(|source| Error::Transport {
                            url: url.to_string(),
                            source,
                        })?;
                        return serde_json::from_slice(&body).map_err(|source| Error::Decode {
                            url: url.to_string(),
                            source,
                        });
                    }
                    StatusCode::TOO_MANY_REQUESTS => Error::RateLimited {
                        url: url.to_string(),
                        attempts: attempt,
                    },
                    status => {
                        return Err(Error::Api {
                            url: url.to_string(),
                            status: status.as_u16(),
                        });
                    }
                },
                Err(source) => Error::Transport {
                    url: url.to_string(),
                    source,
                },
            };

            let delay = backoff.next_delay();
            if !self.retry.allows_retry(attempt, started.elapsed(), delay) {
                return Err(failure);
            }

            warn!(
                url = %url,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %failure,
                "Inventory API call failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// GET shorthand
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        self.request(Method::GET, path, query).await
    }
}
