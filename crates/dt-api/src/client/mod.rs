//! DingTalk open API client.
//!
//! Wraps an [`HttpClient`] and a shared [`AccessTokenCache`] and provides
//! typed methods for the directory, approval, robot and SNS endpoints.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use dingtalk_auth::{AccessToken, AccessTokenCache, AppCredentials};
use dingtalk_client::{ApiResponse, ClientConfig, HttpClient, RequestBuilder};

use crate::error::{Error, Result};

mod approval;
mod department;
mod robot;
mod sns;
mod user;

/// DingTalk open API client.
///
/// Every call first obtains an access token from the shared cache, so one
/// token fetch serves any number of clones of this client.
///
/// # Example
///
/// ```rust,ignore
/// use dingtalk_api::{DingTalkClient, Language};
/// use dingtalk_auth::AppCredentials;
///
/// let client = DingTalkClient::new(AppCredentials::from_env()?)?;
///
/// let departments = client.departments(1, Language::Chinese).await?;
/// let users = client.simple_users_in_departments(&[1]).await?;
/// ```
#[derive(Debug, Clone)]
pub struct DingTalkClient {
    http: HttpClient,
    tokens: Arc<AccessTokenCache>,
}

impl DingTalkClient {
    /// Create a client against the production endpoints.
    pub fn new(credentials: AppCredentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::default())
    }

    /// Create a client with custom HTTP configuration.
    pub fn with_config(credentials: AppCredentials, config: ClientConfig) -> Result<Self> {
        credentials.validate()?;
        let http = HttpClient::new(config)?;
        let tokens = Arc::new(AccessTokenCache::new(http.clone(), credentials));
        Ok(Self { http, tokens })
    }

    /// Create a client around an existing token cache.
    ///
    /// Requests use the cache's HTTP client.
    pub fn from_token_cache(tokens: Arc<AccessTokenCache>) -> Self {
        Self {
            http: tokens.http().clone(),
            tokens,
        }
    }

    /// Get the underlying HTTP client.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Get the shared token cache.
    pub fn token_cache(&self) -> &Arc<AccessTokenCache> {
        &self.tokens
    }

    pub fn credentials(&self) -> &AppCredentials {
        self.tokens.credentials()
    }

    /// A valid access token, fetched only when the cached one has expired.
    pub async fn access_token(&self) -> Result<AccessToken> {
        Ok(self.tokens.acquire().await?)
    }

    /// POST `body` to an `oapi` endpoint and unwrap the envelope.
    ///
    /// Failures after the token was obtained are reported as
    /// "Failed to {context}".
    pub(crate) async fn post_oapi<B, T>(
        &self,
        path: &str,
        body: &B,
        context: impl FnOnce() -> String,
    ) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let token = self.access_token().await?;
        let result = match self
            .http
            .post(self.http.oapi_url(path))
            .access_token_query(token.as_str())
            .json(body)
        {
            Ok(request) => self.send_enveloped(request).await,
            Err(err) => Err(err),
        };
        result.map_err(|err| Error::request(context(), err))
    }

    /// Send a request whose response carries the `errcode` envelope.
    pub(crate) async fn send_enveloped<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> dingtalk_client::Result<T> {
        let response: ApiResponse<T> = self.http.send_json(request).await?;
        response.into_result()
    }
}

/// Payload of endpoints that answer `{"errcode":0,"result":...}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ResultPayload<R> {
    #[serde(default = "Option::default")]
    pub result: Option<R>,
}
