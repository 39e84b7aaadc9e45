//! Error types for dt-client.
//!
//! Errors fall into three families: transport (network failures and
//! non-success HTTP statuses), application (a well-formed response that
//! carries a non-zero error code) and decode (a body that does not match
//! the expected shape).

use std::time::Duration;

/// Result type alias for dt-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for dt-client operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// Returns true if the request never produced a usable response.
    pub fn is_transport(&self) -> bool {
        self.kind.is_transport()
    }

    /// Returns true if the remote service answered with an error code.
    pub fn is_application(&self) -> bool {
        matches!(self.kind, ErrorKind::Api { .. } | ErrorKind::Robot { .. })
    }

    /// Returns true if the response body could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self.kind, ErrorKind::Json(_))
    }

    /// Returns true if this is a rate limit error.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.kind, ErrorKind::RateLimited { .. })
    }

    /// Returns the envelope error code, if the service returned one.
    pub fn api_code(&self) -> Option<i64> {
        match &self.kind {
            ErrorKind::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns the retry-after duration if this is a rate limit error.
    pub fn retry_after(&self) -> Option<Duration> {
        match &self.kind {
            ErrorKind::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// HTTP request failed with a non-success status.
    #[error("HTTP error: {status} {message}")]
    Http { status: u16, message: String },

    /// Rate limit exceeded (HTTP 429).
    #[error("Rate limited{}", retry_after.map(|d| format!(", retry after {:?}", d)).unwrap_or_default())]
    RateLimited { retry_after: Option<Duration> },

    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Envelope carried a non-zero `errcode`.
    #[error("DingTalk API error: {message}({code})")]
    Api {
        code: i64,
        message: String,
        request_id: Option<String>,
    },

    /// Error body returned by the v1.0 endpoints.
    #[error("DingTalk API error: {code} - {message}")]
    Robot { code: String, message: String },

    /// All retries exhausted.
    #[error("Request failed after {retries} retries: {message}")]
    RetriesExhausted { retries: u32, message: String },

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl ErrorKind {
    /// Returns true if this error kind is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ErrorKind::RateLimited { .. } => true,
            ErrorKind::Timeout => true,
            ErrorKind::Connection(_) => true,
            ErrorKind::Http { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Returns true for network failures and non-success statuses.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ErrorKind::Http { .. }
                | ErrorKind::RateLimited { .. }
                | ErrorKind::Timeout
                | ErrorKind::Connection(_)
        )
    }
}

/// Check if an HTTP status code is typically retryable.
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // reqwest embeds the request URL, which may carry the access token
        let message = crate::response::sanitize_error_message(&err.to_string());
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(message)
        } else if let Some(status) = err.status() {
            ErrorKind::Http {
                status: status.as_u16(),
                message,
            }
        } else if err.is_decode() {
            ErrorKind::Json(message)
        } else {
            ErrorKind::Other(message)
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidUrl(err.to_string()), err)
    }
}
