// ABOUTME: Unified error type with standard error codes and HTTP response formatting
// ABOUTME: Every module converts its local errors into AppError at API boundaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

//! # Unified Error Handling System
//!
//! Defines the standard error codes, the `AppError` type and the JSON error envelope
//! returned by the HTTP API. Component-specific errors (flow failures, write
//! rejections, token validation) live next to their components and convert into
//! `AppError` where they cross an API boundary.
//!
//! Every error response has the same shape:
//!
//! ```json
//! { "error": { "code": "INVALID_INPUT", "message": "...", "details": { "violations": [] } } }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Machine-readable error codes, serialized in the response envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No bearer token was supplied
    AuthRequired,
    /// Token signature, issuer or audience did not check out
    AuthInvalid,
    /// Token has expired
    AuthExpired,
    /// Token cannot be parsed
    AuthMalformed,
    /// Caller may not touch another user's collection
    PermissionDenied,
    /// Submitted record failed schema validation
    InvalidInput,
    /// Text generation returned an error or unusable output
    ExternalServiceError,
    /// Text generation could not be reached
    ExternalServiceUnavailable,
    /// Text generation quota is exhausted
    ExternalRateLimited,
    /// Environment configuration is missing or malformed
    ConfigError,
    /// Unexpected failure inside the server
    InternalError,
    /// Workout store failure
    DatabaseError,
    /// Stored record could not be encoded or decoded
    SerializationError,
}

impl ErrorCode {
    /// HTTP status returned for this code
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput => 400,
            Self::AuthRequired | Self::AuthInvalid | Self::AuthExpired | Self::AuthMalformed => {
                401
            }
            Self::PermissionDenied => 403,
            Self::ExternalRateLimited => 429,
            Self::ExternalServiceError => 502,
            Self::ExternalServiceUnavailable => 503,
            Self::ConfigError
            | Self::InternalError
            | Self::DatabaseError
            | Self::SerializationError => 500,
        }
    }

    /// Short description used as the `Display` prefix
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication required",
            Self::AuthInvalid => "Invalid credentials",
            Self::AuthExpired => "Token expired",
            Self::AuthMalformed => "Malformed token",
            Self::PermissionDenied => "Permission denied",
            Self::InvalidInput => "Invalid input",
            Self::ExternalServiceError => "Text generation failed",
            Self::ExternalServiceUnavailable => "Text generation unavailable",
            Self::ExternalRateLimited => "Text generation quota exceeded",
            Self::ConfigError => "Configuration error",
            Self::InternalError => "Internal error",
            Self::DatabaseError => "Workout store error",
            Self::SerializationError => "Record encoding error",
        }
    }
}

/// Extra information carried alongside an error
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Collection path the failing operation targeted
    pub resource_id: Option<String>,
    /// Structured details such as field violations
    pub details: serde_json::Value,
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
}

impl AppError {
    /// Create an error with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Attach the collection path the operation targeted
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Attach structured details
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = details;
        self
    }

    /// HTTP status for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Missing bearer token
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Authentication required")
    }

    /// Rejected bearer token
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Expired bearer token
    #[must_use]
    pub fn auth_expired() -> Self {
        Self::new(ErrorCode::AuthExpired, "Authentication token has expired")
    }

    /// Access to a collection the caller does not own
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Rejected input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Unexpected internal failure
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Workout store failure
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Bad or missing configuration
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Failure reported by a named external service
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// JSON error envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Body of an [`ErrorResponse`]
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Structured details (field violations and the like)
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                details: error.context.details,
            },
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let details = serde_json::json!({ "violations": errors.violations() });
        Self::invalid_input(errors.to_string()).with_details(details)
    }
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        Self::database(error.to_string())
    }
}

#[cfg(feature = "http-response")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = http::StatusCode::from_u16(self.http_status())
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(code = ?self.code, message = %self.message, "Request failed");
        } else {
            tracing::debug!(code = ?self.code, message = %self.message, "Request rejected");
        }

        (status, axum::Json(ErrorResponse::from(self))).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_serialize_as_screaming_names() {
        let json = serde_json::to_value([
            ErrorCode::AuthRequired,
            ErrorCode::InvalidInput,
            ErrorCode::ExternalRateLimited,
        ])
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!(["AUTH_REQUIRED", "INVALID_INPUT", "EXTERNAL_RATE_LIMITED"])
        );
    }

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::AuthRequired.http_status(), 401);
        assert_eq!(ErrorCode::PermissionDenied.http_status(), 403);
        assert_eq!(ErrorCode::InvalidInput.http_status(), 400);
        assert_eq!(ErrorCode::ExternalServiceError.http_status(), 502);
        assert_eq!(ErrorCode::DatabaseError.http_status(), 500);
    }

    #[test]
    fn test_error_response_serialization() {
        let error = AppError::permission_denied("Not your collection")
            .with_resource_id("users/a/workouts")
            .with_details(serde_json::json!({ "path": "users/a/workouts" }));
        assert_eq!(error.context.resource_id.as_deref(), Some("users/a/workouts"));

        let json = serde_json::to_string(&ErrorResponse::from(error)).unwrap();
        assert!(json.contains("PERMISSION_DENIED"));
        assert!(json.contains("users/a/workouts"));
    }

    #[test]
    fn test_null_details_are_omitted() {
        let response = ErrorResponse::from(AppError::database("disk full"));
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["error"].get("details").is_none());
        assert_eq!(json["error"]["message"], "disk full");
    }
}
