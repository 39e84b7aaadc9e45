//! Error types for dt-api.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Wrap a transport-layer failure with the operation that caused it.
    pub(crate) fn request(context: impl Into<String>, err: dingtalk_client::Error) -> Self {
        Self::with_source(
            ErrorKind::Request {
                context: context.into(),
                message: err.to_string(),
            },
            err,
        )
    }

    /// The underlying HTTP client error, if this error wraps one.
    pub fn client_error(&self) -> Option<&dingtalk_client::Error> {
        self.source.as_deref()?.downcast_ref()
    }

    /// The DingTalk `errcode` of a rejected request.
    pub fn api_code(&self) -> Option<i64> {
        self.client_error()?.api_code()
    }

    /// Returns true if no access token could be obtained.
    pub fn is_auth(&self) -> bool {
        matches!(self.kind, ErrorKind::Auth(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("Client error: {0}")]
    Client(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A request failed; `context` names the operation and its identifier.
    #[error("Failed to {context}: {message}")]
    Request { context: String, message: String },

    #[error("No result returned: {0}")]
    EmptyResult(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

impl From<dingtalk_client::Error> for Error {
    fn from(err: dingtalk_client::Error) -> Self {
        Error::with_source(ErrorKind::Client(err.to_string()), err)
    }
}

impl From<dingtalk_auth::Error> for Error {
    fn from(err: dingtalk_auth::Error) -> Self {
        Error::with_source(ErrorKind::Auth(err.to_string()), err)
    }
}
