//! Directory user types.

use serde::{Deserialize, Serialize};

use crate::department::Language;

/// Sort order of department member listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderField {
    /// By time of joining the department, oldest first.
    #[default]
    EntryAsc,
    EntryDesc,
    /// By time the department info was last modified.
    ModifyAsc,
    ModifyDesc,
    /// User-defined order, pinyin when undefined.
    Custom,
}

/// One page request against a department member listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserListRequest {
    pub dept_id: u64,
    pub cursor: i64,
    pub size: u32,
    pub order_field: OrderField,
    pub contain_access_limit: bool,
    pub language: Language,
}

impl UserListRequest {
    /// Largest page size the listing endpoints accept.
    pub const MAX_PAGE_SIZE: u32 = 100;

    /// First page of `dept_id`, full page size, in joining order.
    pub fn new(dept_id: u64) -> Self {
        Self {
            dept_id,
            cursor: 0,
            size: Self::MAX_PAGE_SIZE,
            order_field: OrderField::EntryAsc,
            contain_access_limit: false,
            language: Language::Chinese,
        }
    }

    pub fn with_cursor(mut self, cursor: i64) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size.min(Self::MAX_PAGE_SIZE);
        self
    }

    pub fn with_order(mut self, order: OrderField) -> Self {
        self.order_field = order;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Include members hidden by access restrictions.
    pub fn with_access_limited(mut self, include: bool) -> Self {
        self.contain_access_limit = include;
        self
    }
}

/// One page of a department member listing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserPage<U> {
    #[serde(default)]
    pub has_more: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<i64>,
    #[serde(default = "Vec::new")]
    pub list: Vec<U>,
}

impl<U> Default for UserPage<U> {
    fn default() -> Self {
        Self {
            has_more: false,
            next_cursor: None,
            list: Vec::new(),
        }
    }
}

impl<U> UserPage<U> {
    /// Cursor of the following page, if there is one.
    pub fn next(&self) -> Option<i64> {
        if self.has_more {
            self.next_cursor
        } else {
            None
        }
    }
}

/// A user id and display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimpleUser {
    pub userid: String,
    pub name: String,
    /// Ids of the departments the user belongs to.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pids: Vec<u64>,
}

/// Full directory profile of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct UserDetail {
    pub userid: String,
    pub name: String,
    pub unionid: String,
    pub avatar: String,
    pub mobile: String,
    pub hide_mobile: bool,
    pub title: String,
    pub email: String,
    pub org_email: String,
    pub dept_id_list: Vec<u64>,
}

/// Result of resolving a union id.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct UnionIdUser {
    pub userid: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct UnionIdRequest<'a> {
    pub unionid: &'a str,
}

/// Users that can be de-duplicated across department listings.
pub(crate) trait DirectoryUser {
    fn user_id(&self) -> &str;
}

impl DirectoryUser for SimpleUser {
    fn user_id(&self) -> &str {
        &self.userid
    }
}

impl DirectoryUser for UserDetail {
    fn user_id(&self) -> &str {
        &self.userid
    }
}
