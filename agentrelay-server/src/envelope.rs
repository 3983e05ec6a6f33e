//! Serverless invocation envelope and response shapes.
//!
//! The host hands the adapter a JSON event describing the HTTP request and
//! expects a JSON response record back. [`InvocationEvent`] and [`HttpResponse`]
//! are those two records. [`HttpResponse`] also renders as an axum response so
//! the same value can be served over plain HTTP.

use std::collections::BTreeMap;

use axum::http::{header::HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::ServerError;

/// Body used when the event carries none.
pub const DEFAULT_BODY: &str = "{}";

/// Method assumed when the event carries none.
pub const DEFAULT_METHOD: &str = "POST";

/// Incoming serverless event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEvent {
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl InvocationEvent {
    /// A POST event with a plain-text body.
    pub fn post(body: impl Into<String>) -> Self {
        Self {
            http_method: Some(DEFAULT_METHOD.to_string()),
            body: Some(body.into()),
            is_base64_encoded: false,
        }
    }

    /// A POST event whose body is base64-encoded.
    pub fn post_base64(body: impl AsRef<[u8]>) -> Self {
        Self {
            http_method: Some(DEFAULT_METHOD.to_string()),
            body: Some(BASE64.encode(body)),
            is_base64_encoded: true,
        }
    }

    /// An event with the given method and body.
    pub fn with_method(method: impl Into<String>, body: Option<String>) -> Self {
        Self {
            http_method: Some(method.into()),
            body,
            is_base64_encoded: false,
        }
    }

    pub fn method(&self) -> &str {
        self.http_method.as_deref().unwrap_or(DEFAULT_METHOD)
    }

    pub fn is_post(&self) -> bool {
        self.method() == "POST"
    }

    /// The body as text, base64-decoded when flagged.
    ///
    /// A missing body is [`DEFAULT_BODY`] and is never decoded.
    pub fn decoded_body(&self) -> Result<String, ServerError> {
        let Some(body) = &self.body else {
            return Ok(DEFAULT_BODY.to_string());
        };

        if !self.is_base64_encoded {
            return Ok(body.clone());
        }

        let bytes = BASE64
            .decode(body.trim())
            .map_err(|e| ServerError::InvalidRequest(format!("invalid base64: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| ServerError::InvalidRequest(format!("body is not valid UTF-8: {}", e)))
    }
}

/// Response record handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    /// Absent on error responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_base64_encoded: Option<bool>,
}

impl HttpResponse {
    /// 200 response carrying buffered SSE frames.
    pub fn event_stream(body: String) -> Self {
        let headers = [
            ("Content-Type", "text/event-stream"),
            ("Cache-Control", "no-cache"),
            ("Connection", "keep-alive"),
            ("Access-Control-Allow-Origin", "*"),
            ("Access-Control-Allow-Headers", "Content-Type"),
            ("Access-Control-Allow-Methods", "POST, OPTIONS"),
        ];

        Self {
            status_code: 200,
            headers: to_map(&headers),
            body,
            is_base64_encoded: Some(false),
        }
    }

    /// JSON error response with body `{"error": message}`.
    pub fn error(status_code: u16, message: &str) -> Self {
        let headers = [
            ("Content-Type", "application/json"),
            ("Access-Control-Allow-Origin", "*"),
        ];

        Self {
            status_code,
            headers: to_map(&headers),
            body: serde_json::json!({ "error": message }).to_string(),
            is_base64_encoded: None,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Decode the JSON error body, if this is an error response.
    pub fn error_message(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(&self.body).ok()?;
        value.get("error")?.as_str().map(String::from)
    }
}

fn to_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();

        let headers = response.headers_mut();
        for (key, value) in &self.headers {
            match (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!(header = %key, "dropping invalid response header"),
            }
        }

        response
    }
}
