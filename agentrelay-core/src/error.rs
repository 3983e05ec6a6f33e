//! Error types for agent runs
//!
//! [`AgentError`] flattens runtime failures into the categories callers act on.
//! Every variant renders to a human-readable message, which is what ends up in
//! the `error` event of a streamed response.

use thiserror::Error;

use crate::tool::ToolError;

/// Errors that can occur while running an agent
///
/// - [`AgentError::Authentication`] - Fix credentials
/// - [`AgentError::RateLimited`] - Back off
/// - [`AgentError::Network`] - Check connectivity
/// - [`AgentError::ServiceUnavailable`] - Backend is down
/// - [`AgentError::Model`] - Model-side issues (bad request, too many tool rounds)
/// - [`AgentError::Stream`] - The streamed response was malformed or cut short
/// - [`AgentError::Configuration`] - Fix configuration (bad URL, missing parameters)
/// - [`AgentError::Tool`] - A tool could not be dispatched
#[derive(Debug, Error)]
pub enum AgentError {
    /// Authentication failed (invalid or missing API key)
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Rate limited by the backend
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Network connectivity issue
    #[error("network error: {0}")]
    Network(String),

    /// Backend temporarily unavailable
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Model error (rejected request, runaway tool loop, etc.)
    #[error("model error: {0}")]
    Model(String),

    /// Streaming protocol error
    #[error("stream error: {0}")]
    Stream(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Tool dispatch failed
    #[error("tool error: {0}")]
    Tool(#[from] ToolError),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl AgentError {
    /// Returns true if this is an authentication error
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// Returns true if this is a rate limiting error
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }

    /// Returns true if this is a streaming protocol error
    pub fn is_stream(&self) -> bool {
        matches!(self, Self::Stream(_))
    }

    /// Map an HTTP status from the model backend to an error category
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Authentication(message),
            429 => Self::RateLimited(message),
            500..=599 => Self::ServiceUnavailable(message),
            _ => Self::Model(message),
        }
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Configuration(err.to_string())
        } else if let Some(status) = err.status() {
            Self::from_status(status.as_u16(), err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        Self::Stream(err.to_string())
    }
}

/// Result type for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(AgentError::from_status(401, "bad key").is_auth());
        assert!(AgentError::from_status(403, "forbidden").is_auth());
        assert!(AgentError::from_status(429, "slow down").is_rate_limited());
        assert!(matches!(
            AgentError::from_status(503, "down"),
            AgentError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            AgentError::from_status(400, "bad request"),
            AgentError::Model(_)
        ));
    }

    #[test]
    fn test_display_messages() {
        let cases = [
            (
                AgentError::Authentication("expired".into()),
                "authentication failed: expired",
            ),
            (AgentError::Stream("cut".into()), "stream error: cut"),
            (AgentError::Other("boom".into()), "boom"),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_from_tool_error() {
        let err: AgentError = ToolError::NotFound("calculator".into()).into();
        assert_eq!(err.to_string(), "tool error: tool not found: calculator");
    }

    #[test]
    fn test_from_json_error_is_stream() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: AgentError = json_err.into();
        assert!(err.is_stream());
    }
}
