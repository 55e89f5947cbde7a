//! HTTP request handlers for the payslip engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::recompute;
use crate::email::compose_draft;
use crate::models::{LineItemKind, PayslipData};
use crate::preview::build_preview;

use super::request::{EmailDraftRequest, RecomputeRequest};
use super::response::{ApiError, ApiErrorResponse, RecomputeResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/defaults", get(defaults_handler))
        .route("/recompute", post(recompute_handler))
        .route("/preview", post(preview_handler))
        .route("/email/draft", post(email_draft_handler))
        .with_state(state)
}

/// Handler for GET /defaults.
///
/// Returns a fresh, reconciled editing state built from configuration.
async fn defaults_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    let initial = state.config().initial_state();
    info!(
        correlation_id = %correlation_id,
        per_day_salary = %initial.per_day_salary,
        "Serving default payslip state"
    );
    json_response(StatusCode::OK, &initial)
}

/// Handler for POST /recompute.
///
/// Applies one field change to the posted state and returns the reconciled
/// state with its audit trace.
async fn recompute_handler(
    State(state): State<AppState>,
    payload: Result<Json<RecomputeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing recompute request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let config = state.config();
    let mut current = request.state;
    current.data.tag_anchors(config.anchors());

    match recompute(&current, &request.change, config.derivation()) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                change = request.change.name(),
                per_day_salary = %result.state.per_day_salary,
                lop_amount = %result.state.data.anchor_amount(LineItemKind::Lop),
                taxes_amount = %result.state.data.anchor_amount(LineItemKind::Taxes),
                warnings = result.audit_trace.warnings.len(),
                duration_us = result.audit_trace.duration_us,
                "Recompute completed successfully"
            );
            json_response(StatusCode::OK, &RecomputeResponse::from(result))
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                change = request.change.name(),
                error = %err,
                "Recompute rejected"
            );
            error_response(err.into())
        }
    }
}

/// Handler for POST /preview.
async fn preview_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayslipData>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing preview request");

    let mut data = match payload {
        Ok(Json(data)) => data,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    data.tag_anchors(state.config().anchors());

    match build_preview(&data) {
        Ok(preview) => {
            info!(
                correlation_id = %correlation_id,
                preview_id = %preview.preview_id,
                rows = preview.rows.len(),
                net_payable = %preview.totals.net_payable,
                "Preview built"
            );
            json_response(StatusCode::OK, &preview)
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Preview rejected");
            error_response(err.into())
        }
    }
}

/// Handler for POST /email/draft.
///
/// Fills in the default subject and message, validates the addresses, and
/// reports how the client should deliver the email.
async fn email_draft_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmailDraftRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing email draft request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match compose_draft(
        &request.employee_name,
        &request.pay_period,
        request.email,
        state.config().email(),
    ) {
        Ok(draft) => {
            info!(
                correlation_id = %correlation_id,
                delivery_mode = ?draft.delivery_mode,
                "Email draft composed"
            );
            json_response(StatusCode::OK, &draft)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Email draft failed validation"
            );
            error_response(err.into())
        }
    }
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(api_error: ApiErrorResponse) -> Response {
    json_response(api_error.status, &api_error.error)
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's description of the failure.
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, &error)
}
