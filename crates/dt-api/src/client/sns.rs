use tracing::instrument;

use crate::error::{Error, ErrorKind, Result};
use crate::sns::{SnsCodeRequest, SnsUserInfo, SnsUserPayload};

const SNS_USER_BY_CODE: &str = "/sns/getuserinfo_bycode";

impl super::DingTalkClient {
    /// Exchange a temporary QR-code login code for the user's identity.
    ///
    /// Authenticated with an app-secret signature instead of an access
    /// token.
    #[instrument(skip(self, tmp_auth_code))]
    pub async fn sns_user_by_code(&self, tmp_auth_code: &str) -> Result<SnsUserInfo> {
        let signature = self.credentials().sns_signature();
        let request = signature.query_pairs().into_iter().fold(
            self.http.post(self.http.oapi_url(SNS_USER_BY_CODE)),
            |request, (name, value)| request.query(name, value),
        );

        let result = match request.json(&SnsCodeRequest { tmp_auth_code }) {
            Ok(request) => self.send_enveloped::<SnsUserPayload>(request).await,
            Err(err) => Err(err),
        };
        let payload = result.map_err(|e| Error::request("exchange login code", e))?;

        payload
            .user_info
            .ok_or_else(|| Error::new(ErrorKind::EmptyResult("SNS user info".to_string())))
    }

    /// Resolve a QR-code login to the user id inside this organization.
    #[instrument(skip(self, tmp_auth_code))]
    pub async fn user_id_from_qr_code(&self, tmp_auth_code: &str) -> Result<String> {
        let info = self.sns_user_by_code(tmp_auth_code).await?;
        if info.unionid.is_empty() {
            return Err(Error::new(ErrorKind::InvalidInput(
                "login code resolved to a user without union id".to_string(),
            )));
        }
        self.user_id_by_union_id(&info.unionid).await
    }
}
