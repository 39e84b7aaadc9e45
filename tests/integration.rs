//! End-to-end scenarios against a local mock of the DingTalk endpoints.
//!
//! Run with:
//!   cargo test --test integration

#[path = "integration/common.rs"]
mod common;
#[path = "integration/directory.rs"]
mod directory;
#[path = "integration/robot.rs"]
mod robot;
#[path = "integration/token.rs"]
mod token;
