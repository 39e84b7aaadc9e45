//! Dump the members of a department subtree as JSON.
//!
//! ```sh
//! export DINGTALK_APP_KEY=dingxxxx
//! export DINGTALK_APP_SECRET=...
//! RUST_LOG=dingtalk_api=debug cargo run --bin dingtalk-directory -- 1
//! ```
//!
//! The optional argument is the root department id (default `1`, the
//! whole organization).

use dingtalk_api::{AppCredentials, DingTalkClient, Language};
use tracing_subscriber::EnvFilter;

const ROOT_DEPARTMENT: u64 = 1;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let root = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u64>().unwrap_or_else(|_| {
            eprintln!("Error: department id must be a positive integer, got {arg:?}");
            std::process::exit(2);
        }),
        None => ROOT_DEPARTMENT,
    };

    let credentials = AppCredentials::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!();
        eprintln!("  export DINGTALK_APP_KEY=...");
        eprintln!("  export DINGTALK_APP_SECRET=...");
        std::process::exit(1);
    });

    let client = DingTalkClient::new(credentials).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let tree = client
        .department_tree(root, Language::Chinese)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });

    let users = client
        .users_in_departments(&tree.dept_ids())
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });

    eprintln!("{} departments, {} users", tree.len(), users.len());

    match serde_json::to_string_pretty(&users) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: failed to encode users: {e}");
            std::process::exit(1);
        }
    }
}
