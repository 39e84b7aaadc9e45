//! # dt-auth
//!
//! Authentication for DingTalk internal applications.
//!
//! ## Security
//!
//! - The app secret and access tokens are redacted in Debug output
//! - Tracing spans record the app key only
//! - Error messages never include the secret or the token
//!
//! ## What it provides
//!
//! - **[`AppCredentials`]** - agent id, app key and app secret
//! - **[`AccessTokenCache`]** - a shared, lazily refreshed access token
//! - **[`SnsSignature`]** - HMAC-SHA256 signatures for the SNS login endpoints
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use dingtalk_auth::{AccessTokenCache, AppCredentials};
//! use dingtalk_client::HttpClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dingtalk_auth::Error> {
//!     let creds = AppCredentials::from_env()?;
//!     let http = HttpClient::default_client()?;
//!     let tokens = Arc::new(AccessTokenCache::new(http, creds));
//!
//!     // Fetches on first use, then served from cache until expiry.
//!     let token = tokens.acquire().await?;
//!     println!("token valid until {}", token.expires_at());
//!     Ok(())
//! }
//! ```

mod clock;
mod credentials;
mod error;
mod sns;
mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use credentials::AppCredentials;
pub use error::{Error, ErrorKind, Result};
pub use sns::{sign, SnsSignature};
pub use token::{AccessToken, AccessTokenCache};
