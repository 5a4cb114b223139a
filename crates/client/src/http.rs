//! HTTP transport with bounded retry
//!
//! Thin wrapper over `reqwest` that retries transient failures (connect
//! errors, timeouts, 5xx responses) with exponential backoff. Client
//! errors such as 404 are returned to the caller untouched so the endpoint
//! layer can map them onto the domain taxonomy.

use std::time::Duration;

use aspace_domain::{AspaceError, Result};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::TransportError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_ATTEMPTS: usize = 3;
const DEFAULT_BACKOFF: Duration = Duration::from_millis(250);

/// HTTP client shared by every endpoint method.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    #[must_use]
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Begin a request against an absolute URL.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.inner.request(method, url)
    }

    /// Execute a request, retrying transient failures.
    ///
    /// # Errors
    /// Returns [`AspaceError::Network`] once transport-level retries are
    /// exhausted. Responses with error statuses are returned as `Ok`;
    /// status handling belongs to the caller.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build().map_err(|err| AspaceError::from(TransportError::from(err)))?;

        let mut attempt = 1;
        loop {
            let request = request.try_clone().ok_or_else(|| {
                AspaceError::Internal(
                    "request body is not cloneable; buffer it to enable retries".into(),
                )
            })?;

            let method = request.method().clone();
            let url = request.url().clone();
            debug!(attempt, %method, %url, "sending request");

            match self.inner.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, %url, %status, "received response");
                    if status.is_server_error() && attempt < self.max_attempts {
                        self.pause_before_retry(attempt).await;
                        attempt += 1;
                        continue;
                    }
                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt, %method, %url, error = %err, "request failed");
                    if attempt < self.max_attempts && is_transient(&err) {
                        self.pause_before_retry(attempt).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(TransportError::from(err).into());
                }
            }
        }
    }

    async fn pause_before_retry(&self, finished_attempt: usize) {
        // Doubles per retry, capped so the shift cannot overflow.
        let exponent = u32::try_from(finished_attempt.saturating_sub(1).min(8)).unwrap_or(8);
        let delay = self.base_backoff.saturating_mul(1 << exponent);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_attempts: DEFAULT_ATTEMPTS,
            base_backoff: DEFAULT_BACKOFF,
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total number of attempts (initial try plus retries), minimum 1.
    #[must_use]
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Base delay before the first retry.
    #[must_use]
    pub const fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    /// User-agent string sent with every request.
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    ///
    /// # Errors
    /// Returns [`AspaceError::InvalidInput`] when the underlying reqwest
    /// client cannot be constructed.
    pub fn build(self) -> Result<HttpClient> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout);
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        let inner =
            builder.build().map_err(|err| AspaceError::from(TransportError::from(err)))?;

        Ok(HttpClient {
            inner,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
        })
    }
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}
