//! Payslip data and editing-session state.
//!
//! [`PayslipData`] is what the preview consumes. [`PayslipState`] adds the
//! derived per-day salary and the [`OverrideFlags`] that the derivation
//! engine needs between edits.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::AnchorLabels;

use super::line_item::{LineItem, LineItemKind, LineItemSide, find_anchor, tag_by_label};

/// Identifying details printed in the payslip header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDetails {
    /// The employer's name.
    pub company_name: String,
    /// The pay period label (e.g., "July 2025").
    pub pay_period: String,
    /// The employee's full name.
    pub employee_name: String,
    /// The employee number.
    pub employee_no: String,
    /// The employee's designation.
    pub designation: String,
    /// The bank account salary is paid into.
    pub bank_account: String,
    /// The date the employee joined.
    pub date_of_joining: NaiveDate,
}

/// Attendance for the pay period.
///
/// The three counts are entered independently and are not validated against
/// each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    /// Total working days in the period.
    pub total_working_days: u32,
    /// Days the employee is paid for.
    pub paid_days: u32,
    /// Loss-of-pay days.
    pub lop_days: u32,
}

/// Per derived field, whether a manual value suppresses recalculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideFlags {
    /// The per-day salary was entered directly.
    pub per_day_salary: bool,
    /// The LOP amount was entered directly.
    pub lop_amount: bool,
    /// The Taxes amount was entered directly.
    pub taxes_amount: bool,
}

/// The reconciled payslip model consumed by the preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipData {
    /// Header details.
    #[serde(flatten)]
    pub details: EmployeeDetails,
    /// Attendance counts.
    #[serde(flatten)]
    pub attendance: Attendance,
    /// Earnings, in display order.
    pub earnings: Vec<LineItem>,
    /// Deductions, in display order.
    pub deductions: Vec<LineItem>,
}

impl PayslipData {
    /// Returns the list for `side`.
    pub fn items(&self, side: LineItemSide) -> &[LineItem] {
        match side {
            LineItemSide::Earnings => &self.earnings,
            LineItemSide::Deductions => &self.deductions,
        }
    }

    /// Returns the list for `side` mutably.
    pub fn items_mut(&mut self, side: LineItemSide) -> &mut Vec<LineItem> {
        match side {
            LineItemSide::Earnings => &mut self.earnings,
            LineItemSide::Deductions => &mut self.deductions,
        }
    }

    /// Returns the anchor item of `kind`, if present.
    ///
    /// Professional Fee is looked up in earnings, LOP and Taxes in deductions.
    pub fn anchor(&self, kind: LineItemKind) -> Option<&LineItem> {
        let items = self.items(Self::anchor_side(kind));
        let index = find_anchor(items, kind)?;
        Some(&items[index])
    }

    /// Returns the anchor item of `kind` mutably, if present.
    pub fn anchor_mut(&mut self, kind: LineItemKind) -> Option<&mut LineItem> {
        let items = self.items_mut(Self::anchor_side(kind));
        let index = find_anchor(items, kind)?;
        Some(&mut items[index])
    }

    /// Returns true if the item at `index` in `side` is the anchor of `kind`.
    pub fn is_anchor_at(&self, kind: LineItemKind, side: LineItemSide, index: usize) -> bool {
        kind.is_anchor()
            && Self::anchor_side(kind) == side
            && find_anchor(self.items(side), kind) == Some(index)
    }

    /// Returns the amount of the anchor of `kind`, or zero when it is absent.
    pub fn anchor_amount(&self, kind: LineItemKind) -> Decimal {
        self.anchor(kind).map(|item| item.amount).unwrap_or(Decimal::ZERO)
    }

    /// Returns the Professional Fee amount, or zero when the anchor is absent.
    pub fn professional_fee(&self) -> Decimal {
        self.anchor_amount(LineItemKind::ProfessionalFee)
    }

    /// Tags anchors by label for payloads that carry no `kind`.
    pub fn tag_anchors(&mut self, labels: &AnchorLabels) {
        tag_by_label(
            &mut self.earnings,
            LineItemKind::ProfessionalFee,
            &labels.professional_fee,
        );
        tag_by_label(&mut self.deductions, LineItemKind::Lop, &labels.lop);
        tag_by_label(&mut self.deductions, LineItemKind::Taxes, &labels.taxes);
    }

    fn anchor_side(kind: LineItemKind) -> LineItemSide {
        match kind {
            LineItemKind::ProfessionalFee | LineItemKind::Custom => LineItemSide::Earnings,
            LineItemKind::Lop | LineItemKind::Taxes => LineItemSide::Deductions,
        }
    }
}

/// The full state of one payslip editing session.
///
/// Held in memory only; a fresh state is built from configured defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipState {
    /// The payslip data shown in the preview.
    #[serde(flatten)]
    pub data: PayslipData,
    /// The per-day salary, derived or overridden.
    #[serde(default)]
    pub per_day_salary: Decimal,
    /// Manual-override flags for derived fields.
    #[serde(default)]
    pub overrides: OverrideFlags,
}

impl PayslipState {
    /// Creates a state with no per-day salary and no overrides.
    pub fn new(data: PayslipData) -> Self {
        Self {
            data,
            per_day_salary: Decimal::ZERO,
            overrides: OverrideFlags::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> AnchorLabels {
        AnchorLabels {
            professional_fee: "Professional Fee".to_string(),
            lop: "LOP".to_string(),
            taxes: "Taxes".to_string(),
        }
    }

    fn sample_json() -> &'static str {
        r#"{
            "company_name": "Northwind Consulting",
            "pay_period": "July 2025",
            "employee_name": "Asha Verma",
            "employee_no": "1042",
            "designation": "UX Developer",
            "bank_account": "000111222333",
            "date_of_joining": "2025-04-15",
            "total_working_days": 31,
            "paid_days": 11,
            "lop_days": 0,
            "earnings": [{ "type": "Professional Fee", "amount": 45000 }],
            "deductions": [
                { "type": "LOP", "amount": 0 },
                { "type": "Taxes", "amount": 0 }
            ]
        }"#
    }

    #[test]
    fn test_deserialize_flat_payslip_data() {
        let data: PayslipData = serde_json::from_str(sample_json()).unwrap();

        assert_eq!(data.details.employee_name, "Asha Verma");
        assert_eq!(
            data.details.date_of_joining,
            NaiveDate::from_ymd_opt(2025, 4, 15).unwrap()
        );
        assert_eq!(data.attendance.total_working_days, 31);
        assert_eq!(data.attendance.paid_days, 11);
        assert_eq!(data.earnings.len(), 1);
        assert_eq!(data.deductions.len(), 2);
    }

    #[test]
    fn test_state_defaults_per_day_and_overrides() {
        let state: PayslipState = serde_json::from_str(sample_json()).unwrap();

        assert_eq!(state.per_day_salary, Decimal::ZERO);
        assert_eq!(state.overrides, OverrideFlags::default());
    }

    #[test]
    fn test_untagged_payload_has_no_anchors_until_tagged() {
        let mut data: PayslipData = serde_json::from_str(sample_json()).unwrap();
        assert!(data.anchor(LineItemKind::ProfessionalFee).is_none());

        data.tag_anchors(&labels());

        assert_eq!(data.professional_fee(), Decimal::from(45000));
        assert!(data.anchor(LineItemKind::Lop).is_some());
        assert!(data.anchor(LineItemKind::Taxes).is_some());
    }

    #[test]
    fn test_missing_anchor_amount_is_zero() {
        let mut data: PayslipData = serde_json::from_str(sample_json()).unwrap();
        data.earnings.clear();
        data.tag_anchors(&labels());

        assert_eq!(data.professional_fee(), Decimal::ZERO);
    }

    #[test]
    fn test_is_anchor_at_checks_side_and_position() {
        let mut data: PayslipData = serde_json::from_str(sample_json()).unwrap();
        data.tag_anchors(&labels());

        assert!(data.is_anchor_at(LineItemKind::ProfessionalFee, LineItemSide::Earnings, 0));
        assert!(data.is_anchor_at(LineItemKind::Taxes, LineItemSide::Deductions, 1));
        assert!(!data.is_anchor_at(LineItemKind::Taxes, LineItemSide::Deductions, 0));
        assert!(!data.is_anchor_at(LineItemKind::Lop, LineItemSide::Earnings, 0));
    }

    #[test]
    fn test_anchor_mut_updates_amount() {
        let mut data: PayslipData = serde_json::from_str(sample_json()).unwrap();
        data.tag_anchors(&labels());

        if let Some(taxes) = data.anchor_mut(LineItemKind::Taxes) {
            taxes.amount = Decimal::from(5000);
        }

        assert_eq!(data.deductions[1].amount, Decimal::from(5000));
    }
}
