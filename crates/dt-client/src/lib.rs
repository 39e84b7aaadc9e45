//! # dt-client
//!
//! Core HTTP client infrastructure for DingTalk open APIs.
//!
//! This crate provides the foundational HTTP client with:
//! - Decoding of the `{errcode, errmsg, request_id}` response envelope
//! - Capped exponential backoff with jitter
//! - A bounded retry loop for at-least-once delivery endpoints
//! - Rate limit detection
//! - Connection pooling
//! - Request/response tracing
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │  (dt-api: departments, users, approvals, robot messages)    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   AccessTokenCache (dt-auth)                │
//! │  - Lazily refreshed, lock-guarded access token              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    HttpClient                               │
//! │  - Raw HTTP with rate limit detection                       │
//! │  - Envelope decoding, optional retry with backoff           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use dingtalk_client::{ApiResponse, ClientConfig, HttpClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dingtalk_client::Error> {
//!     let client = HttpClient::new(ClientConfig::default())?;
//!
//!     let url = client.oapi_url("/topapi/v2/department/listsubid");
//!     let request = client
//!         .post(url)
//!         .access_token_query(&token)
//!         .json(&serde_json::json!({ "dept_id": 1 }))?;
//!
//!     let response: ApiResponse<serde_json::Value> = client.send_json(request).await?;
//!     let ids = response.into_result()?;
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;
mod retry;

pub use client::HttpClient;
pub use config::{ClientConfig, ClientConfigBuilder, CompressionConfig};
pub use error::{Error, ErrorKind, Result};
pub use request::{RequestBody, RequestBuilder, RequestMethod};
pub use response::{ApiResponse, Envelope, Response, ResponseExt};
pub use retry::{Backoff, RetryConfig, RetryPolicy};

/// Base URL of the legacy `oapi` endpoints (token, directory, approvals).
pub const DEFAULT_OAPI_URL: &str = "https://oapi.dingtalk.com";

/// Base URL of the v1.0 endpoints (robot messaging).
pub const DEFAULT_API_URL: &str = "https://api.dingtalk.com";

/// Header carrying the access token on v1.0 endpoints.
pub const ACCESS_TOKEN_HEADER: &str = "x-acs-dingtalk-access-token";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("dingtalk-sdk/", env!("CARGO_PKG_VERSION"));
