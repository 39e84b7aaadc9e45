//! Approval workflow types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Query for the ids of approval instances of one process.
///
/// Times are Unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalInstanceIdsRequest {
    pub process_code: String,
    pub start_time: i64,
    pub end_time: i64,
    pub size: u32,
    pub cursor: i64,
    /// Comma-separated originator user ids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub userid_list: Option<String>,
}

impl ApprovalInstanceIdsRequest {
    /// Largest page size the endpoint accepts.
    pub const MAX_PAGE_SIZE: u32 = 20;

    pub fn new(process_code: impl Into<String>, start_time: i64, end_time: i64) -> Self {
        Self {
            process_code: process_code.into(),
            start_time,
            end_time,
            size: Self::MAX_PAGE_SIZE,
            cursor: 0,
            userid_list: None,
        }
    }

    /// Instances started within `[start, end]`.
    pub fn between(
        process_code: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self::new(process_code, start.timestamp_millis(), end.timestamp_millis())
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size.min(Self::MAX_PAGE_SIZE);
        self
    }

    pub fn with_cursor(mut self, cursor: i64) -> Self {
        self.cursor = cursor;
        self
    }

    /// Only instances started by these users.
    pub fn with_originators<S: AsRef<str>>(mut self, user_ids: &[S]) -> Self {
        let joined = user_ids
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");
        self.userid_list = (!joined.is_empty()).then_some(joined);
        self
    }
}

/// One page of approval instance ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApprovalInstanceIdPage {
    pub list: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<i64>,
}

/// Details of one approval instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApprovalInstance {
    pub title: String,
    pub create_time: String,
    pub finish_time: String,
    pub originator_userid: String,
    pub originator_dept_id: String,
    /// `NEW`, `RUNNING`, `TERMINATED`, `COMPLETED` or `CANCELED`.
    pub status: String,
    pub business_id: String,
    /// `agree` or `refuse` once completed.
    pub result: String,
    pub form_component_values: Vec<FormComponentValue>,
}

impl ApprovalInstance {
    pub fn is_completed(&self) -> bool {
        self.status == "COMPLETED"
    }

    pub fn is_approved(&self) -> bool {
        self.is_completed() && self.result == "agree"
    }

    /// Value of the first form field with the given label.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form_component_values
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }
}

/// A filled-in form field of an approval instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FormComponentValue {
    pub id: String,
    pub component_type: String,
    pub name: String,
    pub value: String,
    pub ext_value: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ApprovalInstanceRequest<'a> {
    pub process_instance_id: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApprovalInstancePayload {
    #[serde(default)]
    pub process_instance: Option<ApprovalInstance>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProcessCodeRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProcessCodePayload {
    #[serde(default)]
    pub process_code: String,
}
