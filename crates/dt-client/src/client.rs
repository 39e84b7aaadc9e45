//! Core HTTP client with envelope handling and bounded retry.

use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{AccessToken, RequestBody, RequestBuilder, RequestMethod};
use crate::response::{Response, ResponseExt};
use crate::retry::{RetryConfig, RetryPolicy};
use crate::ACCESS_TOKEN_HEADER;

/// HTTP client for DingTalk APIs.
///
/// A single call is one attempt. Only [`HttpClient::execute_with_retry`]
/// repeats a request, and only for retryable failures.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        url::Url::parse(&config.oapi_url)?;
        url::Url::parse(&config.api_url)?;

        let accept_compressed = config.compression.accept_compressed;
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .gzip(accept_compressed)
            .deflate(accept_compressed)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Create a new HTTP client with default configuration.
    pub fn default_client() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Full URL of an `oapi` endpoint path such as `/gettoken`.
    pub fn oapi_url(&self, path: &str) -> String {
        join(&self.config.oapi_url, path)
    }

    /// Full URL of a v1.0 endpoint path such as `/v1.0/robot/oToMessages/batchSend`.
    pub fn api_url(&self, path: &str) -> String {
        join(&self.config.api_url, path)
    }

    /// Create a GET request builder.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Get, url)
    }

    /// Create a POST request builder.
    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Post, url)
    }

    /// Execute a single request, converting non-success statuses into errors.
    #[instrument(skip(self, request), fields(method = ?request.method, url = %request.url))]
    pub async fn execute(&self, request: &RequestBuilder) -> Result<Response> {
        let mut req = self
            .inner
            .request(request.method.to_reqwest(), request.build_url()?);

        if let Some(AccessToken::Header(ref token)) = request.access_token {
            req = req.header(ACCESS_TOKEN_HEADER, token.as_str());
        }

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(RequestBody::Json(ref value)) = request.body {
            req = req.json(value);
        }

        if self.config.enable_tracing {
            debug!(method = ?request.method, url = %request.url, "Sending request");
        }

        let response = req.send().await?;

        if self.config.enable_tracing {
            let status = response.status().as_u16();
            let content_length = response.content_length();

            if response.status().is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        Response::new(response).check_status().await
    }

    /// Execute a request and deserialize the JSON response.
    pub async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = self.execute(&request).await?;
        response.json().await
    }

    /// Execute a request, retrying retryable failures with backoff.
    ///
    /// Performs at most `1 + retry.max_retries` attempts. Each failed
    /// attempt is logged; the final error reports the number of retries
    /// and carries the last failure as its source. Non-retryable failures
    /// are returned immediately.
    ///
    /// Dropping the returned future cancels the loop, including a pending
    /// backoff sleep.
    #[instrument(skip(self, request, retry), fields(url = %request.url, max_retries = retry.max_retries))]
    pub async fn execute_with_retry(
        &self,
        request: &RequestBuilder,
        retry: &RetryConfig,
    ) -> Result<Response> {
        let mut policy = RetryPolicy::new(retry.clone());

        loop {
            let err = match self.execute(request).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_retryable() => err,
                Err(err) => return Err(err),
            };

            let Some(delay) = next_delay(&mut policy, &err) else {
                if policy.retries() == 0 {
                    return Err(err);
                }
                return Err(Error::with_source(
                    ErrorKind::RetriesExhausted {
                        retries: policy.retries(),
                        message: err.to_string(),
                    },
                    err,
                ));
            };

            warn!(
                attempt = policy.retries(),
                delay_ms = delay.as_millis(),
                error = %err,
                "Request failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Like [`HttpClient::execute_with_retry`], decoding the final response as JSON.
    pub async fn send_json_with_retry<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
        retry: &RetryConfig,
    ) -> Result<T> {
        let response = self.execute_with_retry(&request, retry).await?;
        response.json().await
    }
}

/// Honor a server-provided Retry-After when it is longer than the backoff.
fn next_delay(policy: &mut RetryPolicy, err: &Error) -> Option<Duration> {
    let delay = policy.next_delay()?;
    Some(match err.retry_after() {
        Some(retry_after) if retry_after > delay => retry_after,
        _ => delay,
    })
}

fn join(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}
