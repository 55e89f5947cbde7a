//! Earnings, deductions and net payable totals.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{LineItem, PayslipData};

/// Totals of a payslip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PayslipTotals {
    /// Sum of all earnings.
    pub total_earnings: Decimal,
    /// Sum of all deductions.
    pub total_deductions: Decimal,
    /// Earnings less deductions. May be negative.
    pub net_payable: Decimal,
}

/// Sums both line item lists and derives the net payable.
///
/// # Errors
///
/// Returns `InvalidField` if a total leaves the range of `Decimal`.
pub fn calculate_totals(data: &PayslipData) -> EngineResult<PayslipTotals> {
    let total_earnings = sum("earnings", &data.earnings)?;
    let total_deductions = sum("deductions", &data.deductions)?;
    let net_payable = total_earnings
        .checked_sub(total_deductions)
        .ok_or_else(|| out_of_range("net_payable"))?;

    Ok(PayslipTotals {
        total_earnings,
        total_deductions,
        net_payable,
    })
}

fn sum(field: &str, items: &[LineItem]) -> EngineResult<Decimal> {
    items.iter().try_fold(Decimal::ZERO, |total, item| {
        total
            .checked_add(item.amount)
            .ok_or_else(|| out_of_range(field))
    })
}

fn out_of_range(field: &str) -> EngineError {
    EngineError::InvalidField {
        field: field.to_string(),
        message: "total is out of range".to_string(),
    }
}
