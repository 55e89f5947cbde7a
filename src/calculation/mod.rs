//! Calculation logic for the payslip engine.
//!
//! This module contains the derivation of per-day salary, LOP and Taxes with
//! manual-override tracking, whole-number rounding, totals, currency
//! formatting with Indian digit grouping, and amounts in words.

mod currency;
mod derivation;
mod number_to_words;
mod rounding;
mod totals;

pub use currency::{format_amount, format_inr};
pub use derivation::{FieldChange, MAX_AMOUNT, Recomputation, recompute, reconcile};
pub use number_to_words::{amount_to_words, number_to_words};
pub use rounding::round_amount;
pub use totals::{PayslipTotals, calculate_totals};
