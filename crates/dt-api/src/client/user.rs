use std::collections::HashSet;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::ResultPayload;
use crate::error::{Error, ErrorKind, Result};
use crate::user::{
    DirectoryUser, SimpleUser, UnionIdRequest, UnionIdUser, UserDetail, UserListRequest, UserPage,
};

const LIST_SIMPLE_USERS: &str = "/topapi/user/listsimple";
const LIST_USERS: &str = "/topapi/v2/user/list";
const USER_BY_UNION_ID: &str = "/topapi/user/getbyunionid";

impl super::DingTalkClient {
    /// Fetch one page of user ids and names in a department.
    ///
    /// Returns a single page. Use `simple_users_in_departments` to follow
    /// the cursor.
    #[instrument(skip(self))]
    pub async fn list_simple_users(&self, request: &UserListRequest) -> Result<UserPage<SimpleUser>> {
        self.user_page(LIST_SIMPLE_USERS, request).await
    }

    /// Fetch one page of detailed user profiles in a department.
    #[instrument(skip(self))]
    pub async fn list_users(&self, request: &UserListRequest) -> Result<UserPage<UserDetail>> {
        self.user_page(LIST_USERS, request).await
    }

    /// All members of the given departments (automatic pagination).
    ///
    /// Users in more than one department are returned once, in the order
    /// they were first seen.
    #[instrument(skip(self))]
    pub async fn simple_users_in_departments(&self, dept_ids: &[u64]) -> Result<Vec<SimpleUser>> {
        self.collect_users(LIST_SIMPLE_USERS, dept_ids).await
    }

    /// Detailed profiles of all members of the given departments.
    #[instrument(skip(self))]
    pub async fn users_in_departments(&self, dept_ids: &[u64]) -> Result<Vec<UserDetail>> {
        self.collect_users(LIST_USERS, dept_ids).await
    }

    /// Resolve a union id to the user id inside this organization.
    #[instrument(skip(self))]
    pub async fn user_id_by_union_id(&self, union_id: &str) -> Result<String> {
        let payload: ResultPayload<UnionIdUser> = self
            .post_oapi(
                USER_BY_UNION_ID,
                &UnionIdRequest { unionid: union_id },
                || format!("look up user by union id {union_id}"),
            )
            .await?;

        match payload.result {
            Some(user) if !user.userid.is_empty() => Ok(user.userid),
            _ => Err(Error::new(ErrorKind::EmptyResult(format!(
                "no user for union id {union_id}"
            )))),
        }
    }

    async fn user_page<U: DeserializeOwned>(
        &self,
        path: &str,
        request: &UserListRequest,
    ) -> Result<UserPage<U>> {
        let payload: ResultPayload<UserPage<U>> = self
            .post_oapi(path, request, || {
                format!("list users of department {}", request.dept_id)
            })
            .await?;
        Ok(payload.result.unwrap_or_default())
    }

    async fn collect_users<U>(&self, path: &str, dept_ids: &[u64]) -> Result<Vec<U>>
    where
        U: DeserializeOwned + DirectoryUser,
    {
        let mut seen = HashSet::new();
        let mut users = Vec::new();

        for &dept_id in dept_ids {
            let mut request = UserListRequest::new(dept_id);
            loop {
                let page: UserPage<U> = self.user_page(path, &request).await?;
                let next = page.next();

                for user in page.list {
                    if seen.insert(user.user_id().to_string()) {
                        users.push(user);
                    }
                }

                match next {
                    Some(cursor) if cursor != request.cursor => request.cursor = cursor,
                    Some(cursor) => {
                        warn!(dept_id, cursor, "User listing returned the same cursor, stopping");
                        break;
                    }
                    None => break,
                }
            }
        }

        debug!(departments = dept_ids.len(), users = users.len(), "Collected department members");
        Ok(users)
    }
}
