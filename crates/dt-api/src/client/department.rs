use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, instrument};

use super::ResultPayload;
use crate::department::{Department, DepartmentNode, DepartmentRequest, DeptIdList, Language};
use crate::error::{Error, ErrorKind, Result};

const GET_DEPARTMENT: &str = "/topapi/v2/department/get";
const LIST_SUB_DEPARTMENTS: &str = "/topapi/v2/department/listsub";
const LIST_SUB_DEPARTMENT_IDS: &str = "/topapi/v2/department/listsubid";

impl super::DingTalkClient {
    /// Get a single department.
    #[instrument(skip(self))]
    pub async fn department(&self, dept_id: u64, language: Language) -> Result<Department> {
        let request = DepartmentRequest {
            dept_id,
            language: Some(language),
        };
        let payload: ResultPayload<Department> = self
            .post_oapi(GET_DEPARTMENT, &request, || format!("get department {dept_id}"))
            .await?;
        payload.result.ok_or_else(|| {
            Error::new(ErrorKind::EmptyResult(format!("department {dept_id}")))
        })
    }

    /// List the direct sub-departments of a department.
    #[instrument(skip(self))]
    pub async fn departments(&self, dept_id: u64, language: Language) -> Result<Vec<Department>> {
        let request = DepartmentRequest {
            dept_id,
            language: Some(language),
        };
        let payload: ResultPayload<Vec<Department>> = self
            .post_oapi(LIST_SUB_DEPARTMENTS, &request, || {
                format!("list sub-departments of {dept_id}")
            })
            .await?;
        Ok(payload.result.unwrap_or_default())
    }

    /// List the ids of the direct sub-departments of a department.
    ///
    /// A response without a result is treated as "no children".
    #[instrument(skip(self))]
    pub async fn child_department_ids(&self, dept_id: u64) -> Result<Vec<u64>> {
        let request = DepartmentRequest {
            dept_id,
            language: None,
        };
        let payload: ResultPayload<DeptIdList> = self
            .post_oapi(LIST_SUB_DEPARTMENT_IDS, &request, || {
                format!("list sub-department ids of {dept_id}")
            })
            .await?;
        Ok(payload.result.unwrap_or_default().dept_id_list)
    }

    /// Ids of every department below `dept_ids`, excluding `dept_ids` themselves.
    ///
    /// Depth first: for each department, the descendants of its children
    /// come before the children.
    pub fn descendant_department_ids<'a>(
        &'a self,
        dept_ids: &'a [u64],
    ) -> BoxFuture<'a, Result<Vec<u64>>> {
        async move {
            let mut ids = Vec::new();
            for &dept_id in dept_ids {
                let children = self.child_department_ids(dept_id).await?;
                if !children.is_empty() {
                    ids.extend(self.descendant_department_ids(&children).await?);
                }
                ids.extend(children);
            }
            Ok(ids)
        }
        .boxed()
    }

    /// A department together with every department below it.
    #[instrument(skip(self))]
    pub async fn department_tree(&self, dept_id: u64, language: Language) -> Result<DepartmentNode> {
        let info = self.department(dept_id, language).await?;
        let children = self.subtrees(dept_id, language).await?;
        let tree = DepartmentNode { info, children };
        debug!(departments = tree.len(), "Department tree loaded");
        Ok(tree)
    }

    fn subtrees(&self, dept_id: u64, language: Language) -> BoxFuture<'_, Result<Vec<DepartmentNode>>> {
        async move {
            let mut nodes = Vec::new();
            for info in self.departments(dept_id, language).await? {
                let children = self.subtrees(info.dept_id, language).await?;
                nodes.push(DepartmentNode { info, children });
            }
            Ok(nodes)
        }
        .boxed()
    }
}
