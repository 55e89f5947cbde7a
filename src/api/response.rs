//! Response types for the payslip engine API.
//!
//! This module defines the recompute response body, the error response
//! structures and the mapping from [`EngineError`] to HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::calculation::Recomputation;
use crate::error::{EngineError, FieldError};
use crate::models::{AuditTrace, PayslipState};

/// Response body for the `/recompute` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RecomputeResponse {
    /// The reconciled state.
    pub state: PayslipState,
    /// How each derived value was reached.
    pub audit_trace: AuditTrace,
}

impl From<Recomputation> for RecomputeResponse {
    fn from(result: Recomputation) -> Self {
        Self {
            state: result.state,
            audit_trace: result.audit_trace,
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Per-field validation failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            fields: Vec::new(),
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
                }
            }
            EngineError::ProtectedLineItem { .. } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "PROTECTED_LINE_ITEM",
                    message,
                    "Professional Fee, LOP and Taxes drive derived amounts and must stay in place",
                ),
            },
            EngineError::LineItemNotFound { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("LINE_ITEM_NOT_FOUND", message),
            },
            EngineError::InvalidField { field, message: reason } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError {
                    fields: vec![FieldError::new(field, reason)],
                    ..ApiError::new("INVALID_FIELD", message)
                },
            },
            EngineError::ValidationFailed { errors } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError {
                    fields: errors,
                    ..ApiError::new("VALIDATION_ERROR", message)
                },
            },
        }
    }
}
