//! Application credentials.
//!
//! The app secret is redacted in Debug output.

use crate::error::{Error, ErrorKind, Result};

/// Identity of an internal DingTalk application.
///
/// Immutable once built; the secret is only handed to the token endpoint
/// and to SNS signatures.
#[derive(Clone)]
pub struct AppCredentials {
    agent_id: String,
    app_key: String,
    app_secret: String,
}

impl std::fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppCredentials")
            .field("agent_id", &self.agent_id)
            .field("app_key", &self.app_key)
            .field("app_secret", &"[REDACTED]")
            .finish()
    }
}

impl AppCredentials {
    /// Create credentials from explicit values.
    pub fn new(
        agent_id: impl Into<String>,
        app_key: impl Into<String>,
        app_secret: impl Into<String>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            app_key: app_key.into(),
            app_secret: app_secret.into(),
        }
    }

    /// Load credentials from environment variables.
    ///
    /// Required environment variables:
    /// - `DINGTALK_APP_KEY`
    /// - `DINGTALK_APP_SECRET`
    ///
    /// Optional:
    /// - `DINGTALK_AGENT_ID` (only needed for work notifications)
    pub fn from_env() -> Result<Self> {
        let app_key = std::env::var("DINGTALK_APP_KEY")
            .map_err(|_| Error::new(ErrorKind::EnvVar("DINGTALK_APP_KEY".to_string())))?;

        let app_secret = std::env::var("DINGTALK_APP_SECRET")
            .map_err(|_| Error::new(ErrorKind::EnvVar("DINGTALK_APP_SECRET".to_string())))?;

        let agent_id = std::env::var("DINGTALK_AGENT_ID").unwrap_or_default();

        let creds = Self::new(agent_id, app_key, app_secret);
        creds.validate()?;
        Ok(creds)
    }

    /// Reject credentials with an empty key or secret.
    pub fn validate(&self) -> Result<()> {
        if self.app_key.trim().is_empty() {
            return Err(Error::new(ErrorKind::InvalidCredentials(
                "app key is empty".to_string(),
            )));
        }
        if self.app_secret.trim().is_empty() {
            return Err(Error::new(ErrorKind::InvalidCredentials(
                "app secret is empty".to_string(),
            )));
        }
        Ok(())
    }

    /// The agent id of the application, empty when not configured.
    ///
    /// Not used by any request made here. Kept for callers that address
    /// work notifications, which are keyed by agent id rather than app key.
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn app_key(&self) -> &str {
        &self.app_key
    }

    pub(crate) fn app_secret(&self) -> &str {
        &self.app_secret
    }
}
