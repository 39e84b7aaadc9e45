//! Request signing for the SNS (QR-code login) endpoints.
//!
//! SNS calls are not authorized with an access token. Instead each request
//! carries the app key, a millisecond timestamp and
//! `base64(HMAC-SHA256(app_secret, timestamp))`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use ring::hmac;

use crate::credentials::AppCredentials;

/// Query parameters that authenticate one SNS request.
///
/// The signature is only valid for a short window around `timestamp`, so
/// build a fresh one per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnsSignature {
    pub access_key: String,
    pub timestamp: String,
    pub signature: String,
}

impl SnsSignature {
    /// The `(name, value)` pairs to append to the request URL.
    ///
    /// Values are raw; URL encoding happens when the URL is built.
    pub fn query_pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("accessKey", self.access_key.as_str()),
            ("timestamp", self.timestamp.as_str()),
            ("signature", self.signature.as_str()),
        ]
    }
}

impl AppCredentials {
    /// Sign an SNS request for the current instant.
    pub fn sns_signature(&self) -> SnsSignature {
        self.sns_signature_at(Utc::now())
    }

    /// Sign an SNS request for a given instant.
    pub fn sns_signature_at(&self, at: DateTime<Utc>) -> SnsSignature {
        let timestamp = at.timestamp_millis().to_string();
        SnsSignature {
            access_key: self.app_key().to_string(),
            signature: sign(self.app_secret(), &timestamp),
            timestamp,
        }
    }
}

/// HMAC-SHA256 `message` with `secret`, base64 encoded (standard alphabet, padded).
pub fn sign(secret: &str, message: &str) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let tag = hmac::sign(&key, message.as_bytes());
    STANDARD.encode(tag.as_ref())
}
