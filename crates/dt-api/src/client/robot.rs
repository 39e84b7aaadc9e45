use tracing::{debug, info, instrument, warn};

use crate::error::{Error, ErrorKind, Result};
use crate::robot::{
    BatchSendRequest, BatchSendResult, MarkdownParam, MAX_ROBOT_RECIPIENTS, OFFICIAL_MARKDOWN_MSG,
};

const BATCH_SEND: &str = "/v1.0/robot/oToMessages/batchSend";

impl super::DingTalkClient {
    /// Send a markdown message from a robot to up to 20 users.
    ///
    /// Returns `Ok(None)` without contacting DingTalk when `recipients` is
    /// empty. Only the first 20 recipients are addressed; the rest are
    /// dropped with a warning.
    ///
    /// Transient failures are retried with backoff according to
    /// `ClientConfig::retry`, so a message may be delivered more than once.
    #[instrument(skip(self, text, recipients), fields(recipients = recipients.len()))]
    pub async fn send_robot_markdown(
        &self,
        robot_code: &str,
        title: &str,
        text: &str,
        recipients: &[String],
    ) -> Result<Option<BatchSendResult>> {
        if recipients.is_empty() {
            debug!("No recipients, nothing to send");
            return Ok(None);
        }

        let user_ids = if recipients.len() > MAX_ROBOT_RECIPIENTS {
            warn!(
                dropped = recipients.len() - MAX_ROBOT_RECIPIENTS,
                "Too many recipients for one batch, truncating"
            );
            recipients[..MAX_ROBOT_RECIPIENTS].to_vec()
        } else {
            recipients.to_vec()
        };

        let msg_param = serde_json::to_string(&MarkdownParam { title, text }).map_err(|e| {
            Error::with_source(ErrorKind::InvalidInput(format!("message: {e}")), e)
        })?;

        let body = BatchSendRequest {
            robot_code: robot_code.to_string(),
            user_ids,
            msg_key: OFFICIAL_MARKDOWN_MSG.to_string(),
            msg_param,
        };

        let token = self.access_token().await?;
        let context = || format!("send robot message via {robot_code}");

        let request = self
            .http
            .post(self.http.api_url(BATCH_SEND))
            .access_token_header(token.as_str())
            .json(&body)
            .map_err(|e| Error::request(context(), e))?;

        let result: BatchSendResult = self
            .http
            .send_json_with_retry(request, &self.http.config().retry)
            .await
            .map_err(|e| Error::request(context(), e))?;

        info!(
            process_query_key = %result.process_query_key,
            invalid = result.invalid_staff_id_list.len(),
            flow_controlled = result.flow_controlled_staff_id_list.len(),
            "Robot message sent"
        );
        Ok(Some(result))
    }
}
