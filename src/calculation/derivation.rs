//! Derivation of per-day salary, LOP and Taxes.
//!
//! The payslip form has three derived values that depend on each other and
//! on the attendance counts:
//!
//! 1. `per_day_salary = round(professional_fee / total_working_days)`
//! 2. `lop_amount = round(per_day_salary * lop_days)`
//! 3. `taxes_amount = round(basis * tax_rate)`, where the basis is chosen by
//!    [`TaxBasis`]
//!
//! A derived value the user typed in directly is flagged in
//! [`OverrideFlags`](crate::models::OverrideFlags) and is not recalculated
//! until the user clears it. [`recompute`] applies one [`FieldChange`] to a
//! state and returns the new state with an audit trace; the input state is
//! never modified, so a rejected change leaves it untouched.

use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{DerivationRules, TaxBasis};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, LineItem, LineItemKind, LineItemSide, PayslipState,
};

use super::rounding::round_amount;

/// A single user edit to the payslip form.
///
/// Serialized adjacently tagged, e.g. `{"field": "paid_days", "value": 20}`
/// or `{"field": "clear_taxes_amount"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldChange {
    /// Total working days was edited.
    TotalWorkingDays(u32),
    /// Paid days was edited.
    PaidDays(u32),
    /// LOP days was edited.
    LopDays(u32),
    /// The Professional Fee amount was edited.
    ProfessionalFee(Decimal),
    /// The per-day salary was typed in directly.
    PerDaySalary(Decimal),
    /// The per-day salary input was blanked.
    ClearPerDaySalary,
    /// The LOP amount was typed in directly.
    LopAmount(Decimal),
    /// The LOP amount input was blanked.
    ClearLopAmount,
    /// The Taxes amount was typed in directly.
    TaxesAmount(Decimal),
    /// The Taxes amount input was blanked.
    ClearTaxesAmount,
    /// A new custom row was appended.
    AddLineItem {
        /// The list to append to.
        side: LineItemSide,
        /// The row label.
        #[serde(default)]
        label: String,
        /// The row amount.
        #[serde(default)]
        amount: Decimal,
    },
    /// An existing row was edited.
    UpdateLineItem {
        /// The list holding the row.
        side: LineItemSide,
        /// The row position.
        index: usize,
        /// The new label, if it changed.
        #[serde(default)]
        label: Option<String>,
        /// The new amount, if it changed.
        #[serde(default)]
        amount: Option<Decimal>,
    },
    /// A row was removed.
    RemoveLineItem {
        /// The list holding the row.
        side: LineItemSide,
        /// The row position.
        index: usize,
    },
}

impl FieldChange {
    /// Returns the snake_case name of the change, as used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            FieldChange::TotalWorkingDays(_) => "total_working_days",
            FieldChange::PaidDays(_) => "paid_days",
            FieldChange::LopDays(_) => "lop_days",
            FieldChange::ProfessionalFee(_) => "professional_fee",
            FieldChange::PerDaySalary(_) => "per_day_salary",
            FieldChange::ClearPerDaySalary => "clear_per_day_salary",
            FieldChange::LopAmount(_) => "lop_amount",
            FieldChange::ClearLopAmount => "clear_lop_amount",
            FieldChange::TaxesAmount(_) => "taxes_amount",
            FieldChange::ClearTaxesAmount => "clear_taxes_amount",
            FieldChange::AddLineItem { .. } => "add_line_item",
            FieldChange::UpdateLineItem { .. } => "update_line_item",
            FieldChange::RemoveLineItem { .. } => "remove_line_item",
        }
    }
}

/// The result of a derivation run.
#[derive(Debug, Clone)]
pub struct Recomputation {
    /// The reconciled state.
    pub state: PayslipState,
    /// Every rule applied (or skipped) while reconciling.
    pub audit_trace: AuditTrace,
}

/// Applies `change` to `state` and re-derives the dependent amounts.
///
/// # Errors
///
/// - `InvalidField` if an amount is negative or exceeds [`MAX_AMOUNT`]
/// - `LineItemNotFound` if a row index is out of range
/// - `ProtectedLineItem` if an anchor row would be removed or relabelled
///
/// # Examples
///
/// ```
/// use payslip_engine::calculation::{FieldChange, recompute};
/// use payslip_engine::config::DerivationRules;
/// use payslip_engine::models::{
///     Attendance, EmployeeDetails, LineItem, LineItemKind, PayslipData, PayslipState,
/// };
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let state = PayslipState::new(PayslipData {
///     details: EmployeeDetails {
///         company_name: "Northwind".to_string(),
///         pay_period: "July 2025".to_string(),
///         employee_name: "Asha Verma".to_string(),
///         employee_no: "1042".to_string(),
///         designation: "UX Developer".to_string(),
///         bank_account: "000111222333".to_string(),
///         date_of_joining: NaiveDate::from_ymd_opt(2025, 4, 15).unwrap(),
///     },
///     attendance: Attendance { total_working_days: 31, paid_days: 0, lop_days: 0 },
///     earnings: vec![LineItem::anchor(LineItemKind::ProfessionalFee, "Professional Fee", Decimal::from(45000))],
///     deductions: vec![
///         LineItem::anchor(LineItemKind::Lop, "LOP", Decimal::ZERO),
///         LineItem::anchor(LineItemKind::Taxes, "Taxes", Decimal::ZERO),
///     ],
/// });
///
/// let result = recompute(&state, &FieldChange::PaidDays(11), &DerivationRules::default()).unwrap();
/// assert_eq!(result.state.per_day_salary, Decimal::from(1452));
/// assert_eq!(result.state.data.anchor_amount(LineItemKind::Taxes), Decimal::from(1597));
/// ```
pub fn recompute(
    state: &PayslipState,
    change: &FieldChange,
    rules: &DerivationRules,
) -> EngineResult<Recomputation> {
    let started = Instant::now();
    check_state_bounds(state)?;
    let mut run = DerivationRun::new(state.clone(), rules);
    run.apply(change)?;
    check_state_bounds(&run.state)?;
    Ok(run.finish(started))
}

/// Re-derives per-day salary, LOP and Taxes without applying an edit.
///
/// Used when a session starts and whenever a state arrives from outside.
///
/// # Errors
///
/// Returns `InvalidField` if an amount in `state`, or one it derives,
/// exceeds [`MAX_AMOUNT`].
pub fn reconcile(state: &PayslipState, rules: &DerivationRules) -> EngineResult<Recomputation> {
    let started = Instant::now();
    check_state_bounds(state)?;
    let mut run = DerivationRun::new(state.clone(), rules);
    run.derive_all();
    check_state_bounds(&run.state)?;
    Ok(run.finish(started))
}

/// The largest amount, in whole rupees, accepted anywhere in a payslip.
///
/// Keeps every product of an amount and a day count well inside the range
/// of `Decimal`.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

fn check_state_bounds(state: &PayslipState) -> EngineResult<()> {
    check_bound("per_day_salary", state.per_day_salary)?;
    for side in [LineItemSide::Earnings, LineItemSide::Deductions] {
        for (index, item) in state.data.items(side).iter().enumerate() {
            check_bound(&format!("{}[{}].amount", side, index), item.amount)?;
        }
    }
    Ok(())
}

fn check_bound(field: &str, amount: Decimal) -> EngineResult<()> {
    if amount.abs() > Decimal::from(MAX_AMOUNT) {
        return Err(EngineError::InvalidField {
            field: field.to_string(),
            message: format!("must not exceed {}", MAX_AMOUNT),
        });
    }
    Ok(())
}

struct DerivationRun<'a> {
    state: PayslipState,
    rules: &'a DerivationRules,
    steps: Vec<AuditStep>,
    warnings: Vec<AuditWarning>,
}

impl<'a> DerivationRun<'a> {
    fn new(state: PayslipState, rules: &'a DerivationRules) -> Self {
        Self {
            state,
            rules,
            steps: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn finish(self, started: Instant) -> Recomputation {
        Recomputation {
            state: self.state,
            audit_trace: AuditTrace {
                steps: self.steps,
                warnings: self.warnings,
                duration_us: started.elapsed().as_micros() as u64,
            },
        }
    }

    fn apply(&mut self, change: &FieldChange) -> EngineResult<()> {
        match change {
            FieldChange::TotalWorkingDays(days) => {
                self.state.data.attendance.total_working_days = *days;
                self.derive_all();
            }
            FieldChange::PaidDays(days) => {
                self.state.data.attendance.paid_days = *days;
                self.derive_all();
            }
            FieldChange::LopDays(days) => {
                self.state.data.attendance.lop_days = *days;
                self.derive_all();
            }
            FieldChange::ProfessionalFee(amount) => self.apply_professional_fee(*amount)?,
            FieldChange::PerDaySalary(value) => self.apply_per_day_salary(*value)?,
            FieldChange::ClearPerDaySalary => {
                self.state.overrides.per_day_salary = false;
                self.record_override("per_day_salary", false);
                self.derive_all();
            }
            FieldChange::LopAmount(amount) => {
                self.apply_manual_deduction(LineItemKind::Lop, *amount)?
            }
            FieldChange::TaxesAmount(amount) => {
                self.apply_manual_deduction(LineItemKind::Taxes, *amount)?
            }
            FieldChange::ClearLopAmount => self.clear_manual_deduction(LineItemKind::Lop),
            FieldChange::ClearTaxesAmount => self.clear_manual_deduction(LineItemKind::Taxes),
            FieldChange::AddLineItem {
                side,
                label,
                amount,
            } => {
                let amount = checked_amount("amount", *amount)?;
                self.state
                    .data
                    .items_mut(*side)
                    .push(LineItem::new(label.clone(), amount));
                self.record_line_item("add", *side, self.state.data.items(*side).len() - 1);
            }
            FieldChange::UpdateLineItem {
                side,
                index,
                label,
                amount,
            } => self.apply_line_item_update(*side, *index, label.as_deref(), *amount)?,
            FieldChange::RemoveLineItem { side, index } => {
                let item = self.line_item(*side, *index)?;
                if self.state.data.is_anchor_at(item.kind, *side, *index) {
                    return Err(EngineError::ProtectedLineItem {
                        label: item.label,
                        operation: "removed".to_string(),
                    });
                }
                self.state.data.items_mut(*side).remove(*index);
                self.record_line_item("remove", *side, *index);
            }
        }
        Ok(())
    }

    /// Rule 4: a Professional Fee edit re-derives the per-day salary from
    /// the new fee even when the per-day salary is overridden.
    fn apply_professional_fee(&mut self, amount: Decimal) -> EngineResult<()> {
        let amount = checked_amount("professional_fee", amount)?;
        if self
            .state
            .data
            .anchor(LineItemKind::ProfessionalFee)
            .is_none()
        {
            self.warn_missing_anchor(LineItemKind::ProfessionalFee);
            return Ok(());
        }
        self.set_anchor_amount(LineItemKind::ProfessionalFee, amount);

        let days = self.state.data.attendance.total_working_days;
        if days > 0 {
            let per_day = round_amount(amount / Decimal::from(days));
            self.state.per_day_salary = per_day;
            self.record(
                "per_day_salary_from_fee",
                "Per-Day Salary From Professional Fee",
                "per_day_salary",
                serde_json::json!({
                    "professional_fee": amount.normalize().to_string(),
                    "total_working_days": days
                }),
                serde_json::json!({
                    "per_day_salary": per_day.normalize().to_string(),
                    "override_kept": self.state.overrides.per_day_salary
                }),
                format!(
                    "round(${} / {}) = ${}",
                    amount.normalize(),
                    days,
                    per_day.normalize()
                ),
            );
        } else {
            self.warn_zero_working_days();
        }

        self.derive_deductions();
        Ok(())
    }

    /// Rule 5: a typed per-day salary overrides derivation and flows back
    /// into the Professional Fee.
    fn apply_per_day_salary(&mut self, value: Decimal) -> EngineResult<()> {
        let per_day = checked_amount("per_day_salary", value)?;
        self.state.per_day_salary = per_day;
        self.state.overrides.per_day_salary = true;
        self.record_override("per_day_salary", true);

        if self
            .state
            .data
            .anchor(LineItemKind::ProfessionalFee)
            .is_some()
        {
            let paid_days = self.state.data.attendance.paid_days;
            let fee = round_amount(per_day * Decimal::from(paid_days));
            // An explicit zero may zero the fee; any other zero result is ignored.
            let applied = fee > Decimal::ZERO || value.is_zero();
            if applied {
                self.set_anchor_amount(LineItemKind::ProfessionalFee, fee);
            }
            self.record(
                "professional_fee_from_per_day",
                "Professional Fee From Per-Day Salary",
                "professional_fee",
                serde_json::json!({
                    "per_day_salary": per_day.normalize().to_string(),
                    "paid_days": paid_days
                }),
                serde_json::json!({
                    "professional_fee": fee.normalize().to_string(),
                    "applied": applied
                }),
                if applied {
                    format!(
                        "round(${} x {}) = ${}",
                        per_day.normalize(),
                        paid_days,
                        fee.normalize()
                    )
                } else {
                    format!(
                        "round(${} x {}) = $0 - Professional Fee left unchanged",
                        per_day.normalize(),
                        paid_days
                    )
                },
            );
        } else {
            self.warn_missing_anchor(LineItemKind::ProfessionalFee);
        }

        self.derive_deductions();
        Ok(())
    }

    /// Rule 6: a typed LOP or Taxes amount sets its override. Nothing else
    /// is recomputed.
    fn apply_manual_deduction(&mut self, kind: LineItemKind, amount: Decimal) -> EngineResult<()> {
        let field = override_field(kind);
        let amount = checked_amount(field, amount)?;
        if self.state.data.anchor(kind).is_none() {
            self.warn_missing_anchor(kind);
            return Ok(());
        }
        self.set_anchor_amount(kind, amount);
        self.set_override(kind, true);
        self.record_override(field, true);
        Ok(())
    }

    /// Rule 7: blanking LOP or Taxes returns it to the formula value.
    fn clear_manual_deduction(&mut self, kind: LineItemKind) {
        self.set_override(kind, false);
        self.record_override(override_field(kind), false);
        self.derive_all();
    }

    fn apply_line_item_update(
        &mut self,
        side: LineItemSide,
        index: usize,
        label: Option<&str>,
        amount: Option<Decimal>,
    ) -> EngineResult<()> {
        let item = self.line_item(side, index)?;
        if let Some(label) = label {
            if self.state.data.is_anchor_at(item.kind, side, index) && label != item.label {
                return Err(EngineError::ProtectedLineItem {
                    label: item.label,
                    operation: "relabelled".to_string(),
                });
            }
        }
        let amount = amount.map(|a| checked_amount("amount", a)).transpose()?;

        if let Some(label) = label {
            self.state.data.items_mut(side)[index].label = label.to_string();
        }
        let Some(amount) = amount else {
            self.record_line_item("update", side, index);
            return Ok(());
        };

        if self.state.data.is_anchor_at(item.kind, side, index) {
            match item.kind {
                LineItemKind::ProfessionalFee => self.apply_professional_fee(amount)?,
                LineItemKind::Lop | LineItemKind::Taxes => {
                    self.apply_manual_deduction(item.kind, amount)?
                }
                LineItemKind::Custom => {}
            }
        } else {
            self.state.data.items_mut(side)[index].amount = amount;
            self.record_line_item("update", side, index);
        }
        Ok(())
    }

    fn line_item(&self, side: LineItemSide, index: usize) -> EngineResult<LineItem> {
        self.state
            .data
            .items(side)
            .get(index)
            .cloned()
            .ok_or(EngineError::LineItemNotFound { side, index })
    }

    /// Rules 1-3 in order.
    fn derive_all(&mut self) {
        self.derive_per_day_salary();
        self.derive_deductions();
    }

    /// Rules 2-3 in order.
    fn derive_deductions(&mut self) {
        self.derive_lop();
        self.derive_taxes();
    }

    /// Rule 1.
    fn derive_per_day_salary(&mut self) {
        let current = self.state.per_day_salary;
        if self.state.overrides.per_day_salary {
            self.record_skipped("per_day_salary", "Per-Day Salary", current);
            return;
        }

        let days = self.state.data.attendance.total_working_days;
        if days == 0 {
            self.warn_zero_working_days();
            return;
        }

        let fee = self.state.data.professional_fee();
        let per_day = round_amount(fee / Decimal::from(days));
        self.state.per_day_salary = per_day;
        self.record(
            "per_day_salary",
            "Per-Day Salary",
            "per_day_salary",
            serde_json::json!({
                "professional_fee": fee.normalize().to_string(),
                "total_working_days": days
            }),
            serde_json::json!({
                "per_day_salary": per_day.normalize().to_string(),
                "recalculated": true
            }),
            format!(
                "round(${} / {}) = ${}",
                fee.normalize(),
                days,
                per_day.normalize()
            ),
        );
    }

    /// Rule 2.
    fn derive_lop(&mut self) {
        let current = self.state.data.anchor_amount(LineItemKind::Lop);
        if self.state.overrides.lop_amount {
            self.record_skipped("lop_amount", "LOP Amount", current);
            return;
        }
        if self.state.data.anchor(LineItemKind::Lop).is_none() {
            self.warn_missing_anchor(LineItemKind::Lop);
            return;
        }

        let per_day = self.state.per_day_salary;
        let lop_days = self.state.data.attendance.lop_days;
        let amount = round_amount(per_day * Decimal::from(lop_days));
        self.set_anchor_amount(LineItemKind::Lop, amount);
        self.record(
            "lop_amount",
            "LOP Amount",
            "lop_amount",
            serde_json::json!({
                "per_day_salary": per_day.normalize().to_string(),
                "lop_days": lop_days
            }),
            serde_json::json!({
                "lop_amount": amount.normalize().to_string(),
                "recalculated": true
            }),
            format!(
                "round(${} x {}) = ${}",
                per_day.normalize(),
                lop_days,
                amount.normalize()
            ),
        );
    }

    /// Rule 3.
    fn derive_taxes(&mut self) {
        let current = self.state.data.anchor_amount(LineItemKind::Taxes);
        if self.state.overrides.taxes_amount {
            self.record_skipped("taxes_amount", "Taxes Amount", current);
            return;
        }
        if self.state.data.anchor(LineItemKind::Taxes).is_none() {
            self.warn_missing_anchor(LineItemKind::Taxes);
            return;
        }

        let rate = self.rules.tax_rate;
        let (basis, input, basis_reasoning) = match self.rules.tax_basis {
            TaxBasis::PaidDays => {
                let per_day = self.state.per_day_salary;
                let paid_days = self.state.data.attendance.paid_days;
                let monthly_earnings = round_amount(per_day * Decimal::from(paid_days));
                (
                    monthly_earnings,
                    serde_json::json!({
                        "tax_basis": "paid_days",
                        "per_day_salary": per_day.normalize().to_string(),
                        "paid_days": paid_days,
                        "tax_rate": rate.normalize().to_string()
                    }),
                    format!(
                        "round(${} x {}) = ${}",
                        per_day.normalize(),
                        paid_days,
                        monthly_earnings.normalize()
                    ),
                )
            }
            TaxBasis::FeeLessLop => {
                let fee = self.state.data.professional_fee();
                let lop = self.state.data.anchor_amount(LineItemKind::Lop);
                let net = (fee - lop).max(Decimal::ZERO);
                (
                    net,
                    serde_json::json!({
                        "tax_basis": "fee_less_lop",
                        "professional_fee": fee.normalize().to_string(),
                        "lop_amount": lop.normalize().to_string(),
                        "tax_rate": rate.normalize().to_string()
                    }),
                    format!(
                        "${} - ${} = ${}",
                        fee.normalize(),
                        lop.normalize(),
                        net.normalize()
                    ),
                )
            }
        };

        let amount = round_amount(basis * rate);
        self.set_anchor_amount(LineItemKind::Taxes, amount);
        self.record(
            "taxes_amount",
            "Taxes Amount",
            "taxes_amount",
            input,
            serde_json::json!({
                "taxable_amount": basis.normalize().to_string(),
                "taxes_amount": amount.normalize().to_string(),
                "recalculated": true
            }),
            format!(
                "{}; round(${} x {}) = ${}",
                basis_reasoning,
                basis.normalize(),
                rate.normalize(),
                amount.normalize()
            ),
        );
    }

    fn set_anchor_amount(&mut self, kind: LineItemKind, amount: Decimal) {
        if let Some(item) = self.state.data.anchor_mut(kind) {
            item.amount = amount;
        }
    }

    fn set_override(&mut self, kind: LineItemKind, value: bool) {
        match kind {
            LineItemKind::Lop => self.state.overrides.lop_amount = value,
            LineItemKind::Taxes => self.state.overrides.taxes_amount = value,
            LineItemKind::ProfessionalFee | LineItemKind::Custom => {}
        }
    }

    fn record(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        field: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        let step_number = self.steps.len() as u32 + 1;
        self.steps.push(AuditStep {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            field: field.to_string(),
            input,
            output,
            reasoning,
        });
    }

    fn record_skipped(&mut self, field: &str, rule_name: &str, current: Decimal) {
        self.record(
            field,
            rule_name,
            field,
            serde_json::json!({ "overridden": true }),
            serde_json::json!({
                field: current.normalize().to_string(),
                "recalculated": false
            }),
            format!(
                "{} is manually set to ${} - not recalculated",
                rule_name,
                current.normalize()
            ),
        );
    }

    fn record_override(&mut self, field: &str, overridden: bool) {
        self.record(
            "manual_override",
            "Manual Override",
            field,
            serde_json::json!({ "field": field }),
            serde_json::json!({ "overridden": overridden }),
            if overridden {
                format!("{} entered manually - automatic recalculation suspended", field)
            } else {
                format!("{} cleared - automatic recalculation resumed", field)
            },
        );
    }

    fn record_line_item(&mut self, operation: &str, side: LineItemSide, index: usize) {
        let label = self
            .state
            .data
            .items(side)
            .get(index)
            .map(|item| item.label.clone())
            .unwrap_or_default();
        self.record(
            "line_item",
            "Line Item Edit",
            &side.to_string(),
            serde_json::json!({ "operation": operation, "index": index }),
            serde_json::json!({ "label": label, "count": self.state.data.items(side).len() }),
            format!("{} {} row {}", operation, side, index),
        );
    }

    fn warn_missing_anchor(&mut self, kind: LineItemKind) {
        self.warnings.push(AuditWarning {
            code: "MISSING_ANCHOR".to_string(),
            message: format!("No {} line item present - update skipped", anchor_name(kind)),
            severity: "low".to_string(),
        });
    }

    fn warn_zero_working_days(&mut self) {
        self.warnings.push(AuditWarning {
            code: "ZERO_WORKING_DAYS".to_string(),
            message: format!(
                "Total working days is zero - per-day salary left at ${}",
                self.state.per_day_salary.normalize()
            ),
            severity: "low".to_string(),
        });
    }
}

fn checked_amount(field: &str, amount: Decimal) -> EngineResult<Decimal> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(EngineError::InvalidField {
            field: field.to_string(),
            message: "must not be negative".to_string(),
        });
    }
    check_bound(field, amount)?;
    Ok(round_amount(amount))
}

fn override_field(kind: LineItemKind) -> &'static str {
    match kind {
        LineItemKind::Lop => "lop_amount",
        LineItemKind::Taxes => "taxes_amount",
        LineItemKind::ProfessionalFee => "professional_fee",
        LineItemKind::Custom => "amount",
    }
}

fn anchor_name(kind: LineItemKind) -> &'static str {
    match kind {
        LineItemKind::ProfessionalFee => "Professional Fee",
        LineItemKind::Lop => "LOP",
        LineItemKind::Taxes => "Taxes",
        LineItemKind::Custom => "custom",
    }
}
