//! HTTP request building with DingTalk-specific token placement.

use serde::Serialize;
use std::collections::HashMap;

use crate::error::Result;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
}

impl RequestMethod {
    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
        }
    }
}

/// Where the access token travels.
///
/// The legacy `oapi` endpoints read it from the `access_token` query
/// parameter, the v1.0 endpoints from a custom header.
#[derive(Clone, PartialEq, Eq)]
pub(crate) enum AccessToken {
    Query(String),
    Header(String),
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessToken::Query(_) => f.write_str("Query([REDACTED])"),
            AccessToken::Header(_) => f.write_str("Header([REDACTED])"),
        }
    }
}

/// Builder for HTTP requests.
///
/// Cloneable so the retry loop can replay the same request.
#[derive(Clone)]
pub struct RequestBuilder {
    pub(crate) method: RequestMethod,
    pub(crate) url: String,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) query_params: Vec<(String, String)>,
    pub(crate) body: Option<RequestBody>,
    pub(crate) access_token: Option<AccessToken>,
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field(
                "query_params",
                &self.query_params.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .field("body", &self.body)
            .field("access_token", &self.access_token)
            .finish()
    }
}

/// Request body content.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(serde_json::Value),
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(method: RequestMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            query_params: Vec::new(),
            body: None,
            access_token: None,
        }
    }

    /// Pass the access token as the `access_token` query parameter.
    pub fn access_token_query(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(AccessToken::Query(token.into()));
        self
    }

    /// Pass the access token in the `x-acs-dingtalk-access-token` header.
    pub fn access_token_header(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(AccessToken::Header(token.into()));
        self
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add a query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((name.into(), value.into()));
        self
    }

    /// Set JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body)?;
        self.body = Some(RequestBody::Json(value));
        self.headers.insert(
            "Content-Type".to_string(),
            "application/json; charset=utf-8".to_string(),
        );
        Ok(self)
    }

    /// Set raw JSON body.
    pub fn json_value(mut self, body: serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self.headers.insert(
            "Content-Type".to_string(),
            "application/json; charset=utf-8".to_string(),
        );
        self
    }

    /// Resolve the final URL with query parameters and a query-placed token.
    pub(crate) fn build_url(&self) -> Result<url::Url> {
        let mut url = url::Url::parse(&self.url)?;
        let token = match &self.access_token {
            Some(AccessToken::Query(token)) => Some(token.as_str()),
            _ => None,
        };

        if !self.query_params.is_empty() || token.is_some() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &self.query_params {
                pairs.append_pair(name, value);
            }
            if let Some(token) = token {
                pairs.append_pair("access_token", token);
            }
        }

        Ok(url)
    }
}
