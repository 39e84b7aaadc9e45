//! Lazily refreshed access-token cache.
//!
//! DingTalk access tokens live for two hours and the token endpoint is
//! rate limited, so every API call goes through one shared cache that only
//! refreshes once the current token has expired.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use dingtalk_client::{ApiResponse, HttpClient};

use crate::clock::{Clock, SystemClock};
use crate::credentials::AppCredentials;
use crate::error::{Error, ErrorKind, Result};

const TOKEN_PATH: &str = "/gettoken";

/// A bearer token and the instant it stops being valid.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl AccessToken {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// The raw token to put on requests.
    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// A token is usable strictly before its expiry instant.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty() && now < self.expires_at
    }
}

/// Payload of the `/gettoken` response beyond the envelope.
///
/// Example: `{"errcode":0,"access_token":"7122c6...","errmsg":"ok","expires_in":7200}`
#[derive(Debug, Deserialize)]
struct TokenPayload {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    expires_in: i64,
}

/// Holder of the application's access token.
///
/// [`AccessTokenCache::acquire`] holds one async lock across the whole
/// check-then-refresh sequence, so concurrent callers never trigger more
/// than one fetch at a time. A slow token endpoint therefore delays every
/// waiting caller; wrap `acquire` in `tokio::time::timeout` when latency
/// must be bounded tighter than the HTTP client's request timeout.
///
/// Share it between clients with `Arc`.
pub struct AccessTokenCache {
    http: HttpClient,
    credentials: AppCredentials,
    clock: Arc<dyn Clock>,
    state: Mutex<Option<AccessToken>>,
}

impl std::fmt::Debug for AccessTokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenCache")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl AccessTokenCache {
    /// Create an empty cache using wall-clock time.
    pub fn new(http: HttpClient, credentials: AppCredentials) -> Self {
        Self::with_clock(http, credentials, Arc::new(SystemClock))
    }

    /// Create an empty cache with a custom time source.
    pub fn with_clock(http: HttpClient, credentials: AppCredentials, clock: Arc<dyn Clock>) -> Self {
        Self {
            http,
            credentials,
            clock,
            state: Mutex::new(None),
        }
    }

    pub fn credentials(&self) -> &AppCredentials {
        &self.credentials
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// The currently cached token, valid or not, without fetching.
    pub async fn cached(&self) -> Option<AccessToken> {
        self.state.lock().await.clone()
    }

    /// Return a valid access token, fetching a new one if needed.
    ///
    /// - A cached token with `now < expires_at` is returned without I/O.
    /// - Transport and decode failures leave the cached state untouched,
    ///   so the next caller simply tries again.
    /// - A response with a non-zero `errcode` clears the cache.
    #[instrument(skip(self), fields(app_key = %self.credentials.app_key()))]
    pub async fn acquire(&self) -> Result<AccessToken> {
        let mut state = self.state.lock().await;

        if let Some(token) = state.as_ref() {
            if token.is_valid_at(self.clock.now()) {
                return Ok(token.clone());
            }
        }

        debug!("Access token missing or expired, requesting a new one");

        let request = self
            .http
            .get(self.http.oapi_url(TOKEN_PATH))
            .query("appkey", self.credentials.app_key())
            .query("appsecret", self.credentials.app_secret());

        let response: ApiResponse<TokenPayload> = self.http.send_json(request).await?;

        if !response.envelope.is_success() {
            *state = None;
            warn!(
                errcode = response.envelope.errcode,
                errmsg = %response.envelope.errmsg,
                "Access token request rejected"
            );
            return Err(Error::new(ErrorKind::TokenRejected {
                code: response.envelope.errcode,
                message: response.envelope.errmsg,
            }));
        }

        let payload = response.data;
        let expires_at = Duration::try_seconds(payload.expires_in)
            .and_then(|ttl| self.clock.now().checked_add_signed(ttl))
            .ok_or_else(|| {
                Error::new(ErrorKind::Json(format!(
                    "expires_in out of range: {}",
                    payload.expires_in
                )))
            })?;
        let token = AccessToken::new(payload.access_token, expires_at);
        info!(expires_in = payload.expires_in, "Access token refreshed");

        *state = Some(token.clone());
        Ok(token)
    }
}
