//! Transport-neutral request and response descriptions.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::endpoints::ErrorEnvelope;
use crate::tokens::BearerToken;

/// Header carrying the bearer token.
pub const AUTHORIZATION: &str = "authorization";

/// HTTP methods used by the clinic backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outgoing request: method, path relative to the API base, headers and
/// an optional JSON body.
///
/// Header names are stored lowercase, so a header is set at most once.
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    headers: BTreeMap<String, String>,
    body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, path).with_body(body)
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Patch, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set a header, replacing any previous value under the same name.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Attach `Authorization: Bearer <token>`.
    pub fn with_bearer(self, token: &BearerToken) -> Self {
        self.with_header(AUTHORIZATION, token.authorization())
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Look up a header by name, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

// Keep the bearer token out of logs.
impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: BTreeMap<&str, &str> = self
            .headers
            .iter()
            .map(|(k, v)| {
                if k == AUTHORIZATION {
                    (k.as_str(), "[REDACTED]")
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect();
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("headers", &headers)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// A response as received from the transport: status plus raw body text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    status: u16,
    body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A response with a JSON body.
    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    /// Decode the body as JSON. An empty body decodes to `null`.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&self.body)
    }

    /// Decode the `{message?, errors?}` error envelope, if the body is one.
    pub fn envelope(&self) -> Option<ErrorEnvelope> {
        serde_json::from_str(&self.body).ok()
    }

    /// Best human-readable message in the body: the envelope's `message`,
    /// otherwise a non-JSON, non-empty plain-text body.
    pub fn server_message(&self) -> Option<String> {
        match serde_json::from_str::<Value>(&self.body) {
            Ok(Value::Object(map)) => map
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.trim().is_empty())
                .map(str::to_string),
            Ok(Value::String(s)) if !s.trim().is_empty() => Some(s),
            Ok(_) => None,
            Err(_) => {
                let text = self.body.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
        }
    }
}
