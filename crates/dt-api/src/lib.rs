//! # dt-api
//!
//! Typed client for the DingTalk open API.
//!
//! ## Features
//!
//! - **Departments** - sub-department listings, recursive id walks, full trees
//! - **Users** - member listings with automatic cursor pagination and de-duplication
//! - **Approvals** - instance id listings, instance details, process codes
//! - **Robot messages** - markdown batch send with bounded retry
//! - **QR-code login** - signed SNS code exchange and union id resolution
//!
//! ## Example
//!
//! ```rust,ignore
//! use dingtalk_api::{DingTalkClient, Language};
//! use dingtalk_auth::AppCredentials;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dingtalk_api::Error> {
//!     let client = DingTalkClient::new(AppCredentials::from_env()?)?;
//!
//!     let tree = client.department_tree(1, Language::Chinese).await?;
//!     let users = client.simple_users_in_departments(&tree.dept_ids()).await?;
//!
//!     let to: Vec<String> = users.iter().map(|u| u.userid.clone()).collect();
//!     client
//!         .send_robot_markdown("dingxxxx", "Weekly report", "**All done**", &to)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

mod approval;
mod client;
mod department;
mod error;
mod robot;
mod sns;
mod user;

// Main client
pub use client::DingTalkClient;

// Approval types
pub use approval::{
    ApprovalInstance, ApprovalInstanceIdPage, ApprovalInstanceIdsRequest, FormComponentValue,
};

// Department types
pub use department::{Department, DepartmentNode, Language};

// Error types
pub use error::{Error, ErrorKind, Result};

// Robot messaging
pub use robot::{BatchSendRequest, BatchSendResult, MAX_ROBOT_RECIPIENTS, OFFICIAL_MARKDOWN_MSG};

// QR-code login
pub use sns::SnsUserInfo;

// User types
pub use user::{OrderField, SimpleUser, UserDetail, UserListRequest, UserPage};

// Re-export types that users might need
pub use dingtalk_auth::AppCredentials;
pub use dingtalk_client::{ClientConfig, ClientConfigBuilder, RetryConfig};
