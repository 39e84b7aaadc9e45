//! QR-code login (SNS) types.

use serde::{Deserialize, Serialize};

/// Identity of a user who scanned a login QR code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SnsUserInfo {
    pub nick: String,
    pub unionid: String,
    pub openid: String,
    pub main_org_auth_high_level: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct SnsCodeRequest<'a> {
    pub tmp_auth_code: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SnsUserPayload {
    #[serde(default)]
    pub user_info: Option<SnsUserInfo>,
}
