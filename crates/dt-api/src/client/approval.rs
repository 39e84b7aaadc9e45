use tracing::{instrument, warn};

use super::ResultPayload;
use crate::approval::{
    ApprovalInstance, ApprovalInstanceIdPage, ApprovalInstanceIdsRequest,
    ApprovalInstancePayload, ApprovalInstanceRequest, ProcessCodePayload, ProcessCodeRequest,
};
use crate::error::{Error, ErrorKind, Result};

const LIST_INSTANCE_IDS: &str = "/topapi/processinstance/listids";
const GET_INSTANCE: &str = "/topapi/processinstance/get";
const PROCESS_CODE_BY_NAME: &str = "/topapi/process/get_by_name";

impl super::DingTalkClient {
    /// Fetch one page of approval instance ids.
    #[instrument(skip(self))]
    pub async fn approval_instance_ids(
        &self,
        request: &ApprovalInstanceIdsRequest,
    ) -> Result<ApprovalInstanceIdPage> {
        let payload: ResultPayload<ApprovalInstanceIdPage> = self
            .post_oapi(LIST_INSTANCE_IDS, request, || {
                format!("list approval instances of process {}", request.process_code)
            })
            .await?;
        Ok(payload.result.unwrap_or_default())
    }

    /// All approval instance ids matching `request` (automatic pagination).
    ///
    /// Starts at `request.cursor` and follows `next_cursor` until the
    /// service stops returning one.
    #[instrument(skip(self))]
    pub async fn all_approval_instance_ids(
        &self,
        request: &ApprovalInstanceIdsRequest,
    ) -> Result<Vec<String>> {
        let mut request = request.clone();
        let mut ids = Vec::new();

        loop {
            let page = self.approval_instance_ids(&request).await?;
            ids.extend(page.list);

            match page.next_cursor {
                Some(cursor) if cursor != request.cursor => request.cursor = cursor,
                Some(cursor) => {
                    warn!(cursor, "Approval listing returned the same cursor, stopping");
                    break;
                }
                None => break,
            }
        }

        Ok(ids)
    }

    /// Get the details of one approval instance.
    #[instrument(skip(self))]
    pub async fn approval_instance(&self, process_instance_id: &str) -> Result<ApprovalInstance> {
        let payload: ApprovalInstancePayload = self
            .post_oapi(
                GET_INSTANCE,
                &ApprovalInstanceRequest {
                    process_instance_id,
                },
                || format!("get approval instance {process_instance_id}"),
            )
            .await?;

        payload.process_instance.ok_or_else(|| {
            Error::new(ErrorKind::EmptyResult(format!(
                "approval instance {process_instance_id}"
            )))
        })
    }

    /// Look up the process code of an approval template by its name.
    #[instrument(skip(self))]
    pub async fn process_code_by_name(&self, name: &str) -> Result<String> {
        let payload: ProcessCodePayload = self
            .post_oapi(PROCESS_CODE_BY_NAME, &ProcessCodeRequest { name }, || {
                format!("look up process code of template {name}")
            })
            .await?;

        if payload.process_code.is_empty() {
            return Err(Error::new(ErrorKind::EmptyResult(format!(
                "process code of template {name}"
            ))));
        }
        Ok(payload.process_code)
    }
}
