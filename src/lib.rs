//! # dingtalk-sdk
//!
//! A DingTalk open API client library for Rust.
//!
//! Authenticates an internal application once, caches the short-lived
//! access token and exposes typed operations over the directory, approval,
//! robot messaging and QR-code login endpoints.
//!
//! ## Security
//!
//! - The app secret and access tokens are redacted in Debug output
//! - Tracing spans never record credentials
//! - Error messages redact `access_token`, `appsecret` and `signature` query values
//!
//! ## Crates
//!
//! - **dingtalk-client** - HTTP transport, response envelope, backoff and bounded retry
//! - **dingtalk-auth** - App credentials, access-token cache, SNS request signing
//! - **dingtalk-api** - Departments, users, approvals, robot messages, QR-code login
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dingtalk_sdk::{AppCredentials, DingTalkClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DingTalkClient::new(AppCredentials::from_env()?)?;
//!
//!     let ids = client.descendant_department_ids(&[1]).await?;
//!     for user in client.simple_users_in_departments(&ids).await? {
//!         println!("{} {}", user.userid, user.name);
//!     }
//!
//!     Ok(())
//! }
//! ```

#[cfg(feature = "api")]
pub use dingtalk_api as api;
#[cfg(feature = "auth")]
pub use dingtalk_auth as auth;
#[cfg(feature = "client")]
pub use dingtalk_client as client;

#[cfg(feature = "api")]
pub use dingtalk_api::DingTalkClient;
#[cfg(feature = "auth")]
pub use dingtalk_auth::{AccessTokenCache, AppCredentials};
#[cfg(feature = "client")]
pub use dingtalk_client::{ClientConfig, HttpClient, RetryConfig};
