//! Audit trace models for derivation runs.
//!
//! Every rule the derivation engine applies is recorded as an [`AuditStep`],
//! so a caller can see why a derived amount changed (or why it did not).

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a derivation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
///
/// # Example
///
/// ```
/// use payslip_engine::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "per_day_salary".to_string(),
///     rule_name: "Per-Day Salary".to_string(),
///     field: "per_day_salary".to_string(),
///     input: serde_json::json!({ "professional_fee": "45000", "total_working_days": 31 }),
///     output: serde_json::json!({ "per_day_salary": "1452" }),
///     reasoning: "round($45000 / 31) = $1452".to_string(),
/// };
/// assert_eq!(step.rule_id, "per_day_salary");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The payslip field the rule wrote (or declined to write).
    pub field: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during derivation.
///
/// Warnings flag skipped work (a missing anchor, zero working days) that is
/// not an error but may surprise the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a derivation run.
///
/// # Example
///
/// ```
/// use payslip_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 12,
/// };
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of derivation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during derivation.
    pub warnings: Vec<AuditWarning>,
    /// The total derivation duration in microseconds.
    pub duration_us: u64,
}

impl AuditTrace {
    /// Returns true if any step was produced by `rule_id`.
    pub fn has_rule(&self, rule_id: &str) -> bool {
        self.steps.iter().any(|step| step.rule_id == rule_id)
    }

    /// Returns true if a warning with `code` was raised.
    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|warning| warning.code == code)
    }
}
