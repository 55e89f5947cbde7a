//! Request types for the payslip engine API.

use serde::Deserialize;

use crate::calculation::FieldChange;
use crate::email::EmailForm;
use crate::models::PayslipState;

/// Request body for the `/recompute` endpoint.
///
/// The client round-trips the whole editing state with every edit.
#[derive(Debug, Clone, Deserialize)]
pub struct RecomputeRequest {
    /// The current editing state.
    pub state: PayslipState,
    /// The edit to apply.
    pub change: FieldChange,
}

/// Request body for the `/email/draft` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailDraftRequest {
    /// Employee name used in the default subject and greeting.
    pub employee_name: String,
    /// Pay period used in the default subject and greeting.
    pub pay_period: String,
    /// The email fields as entered.
    #[serde(flatten)]
    pub email: EmailForm,
}
