//! HTTP API module for the payslip engine.
//!
//! This module provides the REST endpoints a thin front-end calls to load
//! defaults, reconcile edits, build previews and draft payslip emails.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{EmailDraftRequest, RecomputeRequest};
pub use response::{ApiError, RecomputeResponse};
pub use state::AppState;
