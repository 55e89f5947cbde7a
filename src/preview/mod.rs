//! The preview model consumed by a payslip renderer.
//!
//! [`build_preview`] turns reconciled [`PayslipData`] into everything a
//! renderer prints: header fields, the earnings and deductions table paired
//! row by row, formatted totals, and the net payable in words.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::calculation::{
    PayslipTotals, amount_to_words, calculate_totals, format_amount, format_inr,
};
use crate::error::EngineResult;
use crate::models::{LineItem, PayslipData};

/// A fully formatted payslip, ready to render.
#[derive(Debug, Clone, Serialize)]
pub struct PayslipPreview {
    /// Unique identifier for this preview.
    pub preview_id: Uuid,
    /// When the preview was generated.
    pub generated_at: DateTime<Utc>,
    /// Version of the engine that built it.
    pub engine_version: String,
    /// Heading line, e.g. "Payslip for the month of July 2025".
    pub title: String,
    /// Header fields.
    pub header: PreviewHeader,
    /// Earnings and deductions paired by position.
    pub rows: Vec<PreviewRow>,
    /// Raw totals.
    pub totals: PayslipTotals,
    /// Formatted totals.
    pub display: PreviewTotals,
}

/// Header fields printed above the table.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewHeader {
    /// The employer's name.
    pub company_name: String,
    /// The pay period label.
    pub pay_period: String,
    /// The employee's name.
    pub employee_name: String,
    /// The employee number.
    pub employee_no: String,
    /// The designation.
    pub designation: String,
    /// The bank account.
    pub bank_account: String,
    /// Date of joining as `dd/mm/yyyy`.
    pub date_of_joining: String,
    /// Total working days.
    pub total_working_days: u32,
    /// Paid days.
    pub paid_days: u32,
    /// LOP days.
    pub lop_days: u32,
}

/// One row of the earnings and deductions table.
///
/// A side is empty when its list is shorter than the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreviewRow {
    /// Earning label.
    pub earning_label: String,
    /// Formatted earning amount, empty for zero.
    pub earning_amount: String,
    /// Deduction label.
    pub deduction_label: String,
    /// Formatted deduction amount, empty for zero.
    pub deduction_amount: String,
}

/// Formatted totals printed under the table.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewTotals {
    /// e.g. "INR 45,000.00".
    pub total_earnings: String,
    /// e.g. "INR 1,597.00".
    pub total_deductions: String,
    /// e.g. "43,403.00".
    pub net_payable: String,
    /// e.g. "Forty Three Thousand Four Hundred Three Only".
    pub net_payable_words: String,
}

/// Builds the preview of `data`.
///
/// # Errors
///
/// Returns `InvalidField` if the totals of `data` are out of range.
pub fn build_preview(data: &PayslipData) -> EngineResult<PayslipPreview> {
    let totals = calculate_totals(data)?;
    let details = &data.details;

    Ok(PayslipPreview {
        preview_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        title: format!("Payslip for the month of {}", details.pay_period),
        header: PreviewHeader {
            company_name: details.company_name.clone(),
            pay_period: details.pay_period.clone(),
            employee_name: details.employee_name.clone(),
            employee_no: details.employee_no.clone(),
            designation: details.designation.clone(),
            bank_account: details.bank_account.clone(),
            date_of_joining: details.date_of_joining.format("%d/%m/%Y").to_string(),
            total_working_days: data.attendance.total_working_days,
            paid_days: data.attendance.paid_days,
            lop_days: data.attendance.lop_days,
        },
        rows: pair_rows(data),
        totals,
        display: PreviewTotals {
            total_earnings: format_inr(totals.total_earnings),
            total_deductions: format_inr(totals.total_deductions),
            net_payable: format_amount(totals.net_payable),
            net_payable_words: amount_to_words(totals.net_payable),
        },
    })
}

fn pair_rows(data: &PayslipData) -> Vec<PreviewRow> {
    let count = data.earnings.len().max(data.deductions.len());

    (0..count)
        .map(|i| {
            let mut row = PreviewRow::default();
            if let Some(item) = data.earnings.get(i) {
                row.earning_label = item.label.clone();
                row.earning_amount = amount_cell(item);
            }
            if let Some(item) = data.deductions.get(i) {
                row.deduction_label = item.label.clone();
                row.deduction_amount = amount_cell(item);
            }
            row
        })
        .collect()
}

fn amount_cell(item: &LineItem) -> String {
    if item.amount.is_zero() {
        String::new()
    } else {
        format_amount(item.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::{Attendance, EmployeeDetails, LineItemKind};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn create_test_data() -> PayslipData {
        PayslipData {
            details: EmployeeDetails {
                company_name: "Northwind Consulting".to_string(),
                pay_period: "July 2025".to_string(),
                employee_name: "Asha Verma".to_string(),
                employee_no: "1042".to_string(),
                designation: "UX Developer".to_string(),
                bank_account: "000111222333".to_string(),
                date_of_joining: NaiveDate::from_ymd_opt(2025, 4, 5).unwrap(),
            },
            attendance: Attendance {
                total_working_days: 31,
                paid_days: 11,
                lop_days: 0,
            },
            earnings: vec![LineItem::anchor(
                LineItemKind::ProfessionalFee,
                "Professional Fee",
                Decimal::from(45000),
            )],
            deductions: vec![
                LineItem::anchor(LineItemKind::Lop, "LOP", Decimal::ZERO),
                LineItem::anchor(LineItemKind::Taxes, "Taxes", Decimal::from(1597)),
            ],
        }
    }

    #[test]
    fn test_header_and_title() {
        let preview = build_preview(&create_test_data()).unwrap();

        assert_eq!(preview.title, "Payslip for the month of July 2025");
        assert_eq!(preview.header.date_of_joining, "05/04/2025");
        assert_eq!(preview.header.total_working_days, 31);
        assert_eq!(preview.engine_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_rows_pair_by_position() {
        let preview = build_preview(&create_test_data()).unwrap();

        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.rows[0].earning_label, "Professional Fee");
        assert_eq!(preview.rows[0].earning_amount, "45,000.00");
        assert_eq!(preview.rows[0].deduction_label, "LOP");
        assert_eq!(preview.rows[1].earning_label, "");
        assert_eq!(preview.rows[1].deduction_label, "Taxes");
        assert_eq!(preview.rows[1].deduction_amount, "1,597.00");
    }

    #[test]
    fn test_zero_lop_is_blank() {
        let preview = build_preview(&create_test_data()).unwrap();
        assert_eq!(preview.rows[0].deduction_label, "LOP");
        assert_eq!(preview.rows[0].deduction_amount, "");
    }

    #[test]
    fn test_zero_custom_amount_is_blank() {
        let mut data = create_test_data();
        data.earnings.push(LineItem::new("Bonus", Decimal::ZERO));

        let preview = build_preview(&data).unwrap();
        assert_eq!(preview.rows[1].earning_label, "Bonus");
        assert_eq!(preview.rows[1].earning_amount, "");
    }

    #[test]
    fn test_formatted_totals() {
        let preview = build_preview(&create_test_data()).unwrap();

        assert_eq!(preview.totals.net_payable, Decimal::from(43403));
        assert_eq!(preview.display.total_earnings, "INR 45,000.00");
        assert_eq!(preview.display.total_deductions, "INR 1,597.00");
        assert_eq!(preview.display.net_payable, "43,403.00");
        assert_eq!(
            preview.display.net_payable_words,
            "Forty Three Thousand Four Hundred Three Only"
        );
    }

    #[test]
    fn test_preview_ids_are_unique() {
        let data = create_test_data();
        assert_ne!(
            build_preview(&data).unwrap().preview_id,
            build_preview(&data).unwrap().preview_id
        );
    }

    #[test]
    fn test_overflowing_totals_are_rejected() {
        let mut data = create_test_data();
        data.earnings.push(LineItem::new("Bonus", Decimal::MAX));
        data.earnings.push(LineItem::new("Arrears", Decimal::MAX));

        assert!(matches!(
            build_preview(&data),
            Err(EngineError::InvalidField { .. })
        ));
    }
}
