//! Core data models for the payslip engine.
//!
//! This module contains the line items, payslip state, override flags and
//! audit trace types used throughout the engine.

mod audit;
mod line_item;
mod payslip;

pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use line_item::{LineItem, LineItemKind, LineItemSide, find_anchor, tag_by_label};
pub use payslip::{Attendance, EmployeeDetails, OverrideFlags, PayslipData, PayslipState};
