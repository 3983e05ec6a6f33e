//! Error types for the agentrelay server.

use axum::response::{IntoResponse, Response};

use crate::envelope::HttpResponse;

/// Errors that can occur when building a router.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// No endpoints were configured.
    #[error("No endpoints configured. Call .with_agent() before .build()")]
    NoEndpoints,

    /// Two endpoints share a path, or an agent uses a reserved path.
    #[error("Path already in use: {0}")]
    DuplicatePath(String),
}

/// Errors that reject a request before the agent runs.
///
/// Failures during a run are not `ServerError`s: they are reported in-stream as
/// an `error` event with a 200 status.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The request used a method other than POST.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The body could not be decoded, parsed or validated.
    #[error("Invalid request body: {0}")]
    InvalidRequest(String),

    /// The invocation itself could not be read.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServerError::MethodNotAllowed => 405,
            ServerError::InvalidRequest(_) => 400,
            ServerError::Internal(_) => 500,
        }
    }

    /// Render as the host's JSON error response.
    pub fn into_http_response(self) -> HttpResponse {
        HttpResponse::error(self.status_code(), &self.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        self.into_http_response().into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
