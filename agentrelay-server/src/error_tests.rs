//! Tests for error handling and IntoResponse implementation.

use crate::error::*;
use axum::{http::StatusCode, response::IntoResponse};

#[test]
fn test_status_code_correctness() {
    let test_cases = [
        (
            ServerError::MethodNotAllowed,
            StatusCode::METHOD_NOT_ALLOWED,
            405,
        ),
        (
            ServerError::InvalidRequest("".to_string()),
            StatusCode::BAD_REQUEST,
            400,
        ),
        (
            ServerError::Internal("".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
            500,
        ),
    ];

    for (error, expected_status, expected_code) in test_cases {
        assert_eq!(error.status_code(), expected_code);

        let response = error.into_response();
        let (parts, _body) = response.into_parts();
        assert_eq!(parts.status, expected_status);
    }
}

#[test]
fn test_server_error_display() {
    let cases = [
        (ServerError::MethodNotAllowed, "Method not allowed"),
        (
            ServerError::InvalidRequest("expected value at line 1 column 1".to_string()),
            "Invalid request body: expected value at line 1 column 1",
        ),
        (
            ServerError::Internal("oops".to_string()),
            "Internal server error: oops",
        ),
    ];

    for (error, expected) in cases {
        assert_eq!(error.to_string(), expected);
    }
}

#[test]
fn test_http_response_carries_message() {
    let response = ServerError::InvalidRequest("missing field `messages`".to_string())
        .into_http_response();

    assert_eq!(response.status_code, 400);
    assert_eq!(
        response.body,
        r#"{"error":"Invalid request body: missing field `messages`"}"#
    );
    assert_eq!(response.is_base64_encoded, None);
}

#[test]
fn test_error_nested_quotes_are_escaped() {
    let error = ServerError::InvalidRequest(r#"Field "role" has invalid value "robot""#.to_string());
    let response = error.into_http_response();

    let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(
        body["error"],
        r#"Invalid request body: Field "role" has invalid value "robot""#
    );
}

#[test]
fn test_error_types_are_send_sync() {
    fn is_send<T: Send>() {}
    fn is_sync<T: Sync>() {}

    is_send::<ServerError>();
    is_sync::<ServerError>();
    is_send::<BuildError>();
}

#[test]
fn test_build_error_display() {
    assert_eq!(
        BuildError::DuplicatePath("/health".into()).to_string(),
        "Path already in use: /health"
    );
    assert!(BuildError::NoEndpoints.to_string().contains(".with_agent()"));
}
