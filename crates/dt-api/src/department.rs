//! Department types.

use serde::{Deserialize, Serialize};

/// Language of department names in responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum Language {
    #[default]
    #[serde(rename = "zh_CN")]
    Chinese,
    #[serde(rename = "en_US")]
    English,
}

/// A department as returned by the directory endpoints.
///
/// Example: `{"auto_add_user":true,"create_dept_group":true,"dept_id":574367388,"name":"总经办","parent_id":1}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Department {
    pub dept_id: u64,
    pub name: String,
    pub parent_id: u64,
    pub auto_add_user: bool,
    pub create_dept_group: bool,
}

/// A department and everything below it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DepartmentNode {
    pub info: Department,
    pub children: Vec<DepartmentNode>,
}

impl DepartmentNode {
    /// Ids of this node and all of its descendants, parents first.
    pub fn dept_ids(&self) -> Vec<u64> {
        let mut ids = vec![self.info.dept_id];
        for child in &self.children {
            ids.extend(child.dept_ids());
        }
        ids
    }

    /// Number of departments in this subtree, including the root.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(DepartmentNode::len).sum::<usize>()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct DepartmentRequest {
    pub dept_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DeptIdList {
    #[serde(default)]
    pub dept_id_list: Vec<u64>,
}
