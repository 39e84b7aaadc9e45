//! Error types for dt-auth.
//!
//! Error messages are designed to avoid exposing the app secret or
//! access tokens.

/// Result type alias for dt-auth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for dt-auth operations.
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

    /// Returns true if the token endpoint explicitly rejected the app.
    pub fn is_rejected(&self) -> bool {
        matches!(self.kind, ErrorKind::TokenRejected { .. })
    }

    /// Returns true if the token endpoint could not be reached.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, ErrorKind::Http(_))
    }
}

/// The kind of error that occurred.
///
/// Error messages avoid including credential values.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The token endpoint answered with a non-zero `errcode`.
    #[error("Access token request rejected: {message}({code}), check the app's API permissions")]
    TokenRejected { code: i64, message: String },

    /// Network failure or non-success status from the token endpoint.
    #[error("Access token request failed: {0}")]
    Http(String),

    /// Token response could not be decoded.
    #[error("Failed to read access token response: {0}")]
    Json(String),

    /// Invalid credentials configuration.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Environment variable not set.
    #[error("Environment variable not set: {0}")]
    EnvVar(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<dingtalk_client::Error> for Error {
    fn from(err: dingtalk_client::Error) -> Self {
        // dt-client already redacts query-string credentials
        let message = err.to_string();
        let kind = if err.is_decode() {
            ErrorKind::Json(message)
        } else if err.is_transport() {
            ErrorKind::Http(message)
        } else {
            match &err.kind {
                dingtalk_client::ErrorKind::Config(_) | dingtalk_client::ErrorKind::InvalidUrl(_) => {
                    ErrorKind::Config(message)
                }
                _ => ErrorKind::Other(message),
            }
        };
        Error::with_source(kind, err)
    }
}
