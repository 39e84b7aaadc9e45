//! HTTP response handling and the DingTalk response envelope.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;

use crate::error::{Error, ErrorKind, Result};

/// Wrapper around HTTP response with additional functionality.
#[derive(Debug)]
pub struct Response {
    inner: reqwest::Response,
}

impl Response {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        let status = self.status();
        (200..300).contains(&status)
    }

    /// Get a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name)?.to_str().ok()
    }

    /// Get the Retry-After header as a Duration.
    pub fn retry_after(&self) -> Option<Duration> {
        let value = self.header("retry-after")?;
        value.parse::<u64>().ok().map(Duration::from_secs)
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Get the response body as text.
    pub async fn text(self) -> Result<String> {
        self.inner.text().await.map_err(Into::into)
    }

    /// Deserialize the response body as JSON.
    ///
    /// The body is read as text first so that shape mismatches surface as
    /// [`ErrorKind::Json`] rather than as transport errors.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.text().await?;
        serde_json::from_str(&body).map_err(Into::into)
    }

    /// Get access to the inner reqwest::Response.
    pub fn into_inner(self) -> reqwest::Response {
        self.inner
    }
}

/// Common header of every `oapi` response.
///
/// `errcode == 0` signals success; any other value is an application-level
/// failure described by `errmsg`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: String,
    #[serde(default)]
    pub request_id: Option<String>,
}

impl Envelope {
    /// Returns true if the envelope reports success.
    pub fn is_success(&self) -> bool {
        self.errcode == 0
    }

    /// Convert a non-zero `errcode` into an [`ErrorKind::Api`] error.
    pub fn check(&self) -> Result<()> {
        if self.is_success() {
            return Ok(());
        }

        Err(Error::new(ErrorKind::Api {
            code: self.errcode,
            message: sanitize_error_message(&self.errmsg),
            request_id: self.request_id.clone(),
        }))
    }
}

/// An enveloped response body.
///
/// `T` receives every field the envelope does not claim.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(flatten)]
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Returns the payload, or the envelope error.
    pub fn into_result(self) -> Result<T> {
        self.envelope.check()?;
        Ok(self.data)
    }
}

/// Extension trait for processing DingTalk API responses.
pub trait ResponseExt {
    /// Convert non-success statuses into errors.
    fn check_status(self) -> impl std::future::Future<Output = Result<Response>> + Send;
}

impl ResponseExt for Response {
    async fn check_status(self) -> Result<Response> {
        let status = self.status();

        if self.is_success() {
            return Ok(self);
        }

        let retry_after = self.retry_after();
        let body = self.text().await.unwrap_or_default();
        Err(parse_error_response(status, retry_after, &body))
    }
}

/// Parse an error response body and convert it to an error kind.
fn parse_error_response(status: u16, retry_after: Option<Duration>, body: &str) -> Error {
    if status == 429 {
        return Error::new(ErrorKind::RateLimited { retry_after });
    }

    // Server errors stay transport errors even when they carry a JSON body.
    if matches!(status, 500 | 502 | 503 | 504) {
        return Error::new(ErrorKind::Http {
            status,
            message: sanitize_error_message(body),
        });
    }

    if let Ok(err) = serde_json::from_str::<ApiErrorBody>(body) {
        return Error::new(ErrorKind::Robot {
            code: err.code,
            message: sanitize_error_message(&err.message),
        });
    }

    Error::new(ErrorKind::Http {
        status,
        message: sanitize_error_message(body),
    })
}

static TOKEN_PATTERN: LazyLock<regex_lite::Regex> = LazyLock::new(|| {
    regex_lite::Regex::new(r"(access_token|appsecret|signature)=[^&\s)]+")
        .expect("token pattern is valid")
});

/// Sanitize an error message to prevent exposing credentials.
///
/// Redacts query-string credentials (`access_token`, `appsecret`,
/// `signature`) and truncates messages longer than 500 characters.
pub(crate) fn sanitize_error_message(message: &str) -> String {
    const MAX_LENGTH: usize = 500;

    let mut sanitized = TOKEN_PATTERN
        .replace_all(message, "$1=[REDACTED]")
        .to_string();

    if sanitized.len() > MAX_LENGTH {
        let mut cut = MAX_LENGTH;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str("...[truncated]");
    }

    sanitized
}

/// Error body returned by the v1.0 endpoints on non-success statuses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    message: String,
}
