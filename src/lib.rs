//! Payslip derivation engine
//!
//! This crate reconciles the derived amounts of a payslip (per-day salary,
//! loss-of-pay deduction and taxes) while respecting manual overrides, and
//! builds the totals, preview and email draft for a payslip.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod email;
pub mod error;
pub mod models;
pub mod preview;
