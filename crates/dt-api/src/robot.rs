//! Robot messaging types.

use serde::{Deserialize, Serialize};

/// Most recipients a single batch send accepts.
pub const MAX_ROBOT_RECIPIENTS: usize = 20;

/// Message template key of official markdown messages.
pub const OFFICIAL_MARKDOWN_MSG: &str = "officialMarkdownMsg";

/// Body of a robot one-to-one batch send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSendRequest {
    pub robot_code: String,
    pub user_ids: Vec<String>,
    pub msg_key: String,
    /// JSON-encoded template parameters.
    pub msg_param: String,
}

/// Parameters of the `officialMarkdownMsg` template.
#[derive(Debug, Serialize)]
pub(crate) struct MarkdownParam<'a> {
    pub title: &'a str,
    pub text: &'a str,
}

/// Outcome of a batch send.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatchSendResult {
    /// Id used to query read status of the sent message.
    pub process_query_key: String,
    /// Recipients that are not valid user ids.
    pub invalid_staff_id_list: Vec<String>,
    /// Recipients skipped because of flow control.
    pub flow_controlled_staff_id_list: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "requestid", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BatchSendResult {
    /// Recipients that did not receive the message.
    pub fn undelivered(&self) -> impl Iterator<Item = &str> {
        self.invalid_staff_id_list
            .iter()
            .chain(&self.flow_controlled_staff_id_list)
            .map(String::as_str)
    }
}
