//! Configuration types for the payslip engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Attendance, EmployeeDetails, LineItem};

/// Labels that identify anchor line items in payloads without a `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorLabels {
    /// Label of the Professional Fee earning.
    pub professional_fee: String,
    /// Label of the LOP deduction.
    pub lop: String,
    /// Label of the Taxes deduction.
    pub taxes: String,
}

impl Default for AnchorLabels {
    fn default() -> Self {
        Self {
            professional_fee: "Professional Fee".to_string(),
            lop: "LOP".to_string(),
            taxes: "Taxes".to_string(),
        }
    }
}

/// The amount the tax rate is applied to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxBasis {
    /// `round(per_day_salary * paid_days)`.
    #[default]
    PaidDays,
    /// `professional_fee - lop_amount`, floored at zero.
    FeeLessLop,
}

/// Parameters of the derivation rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationRules {
    /// Fraction of the tax basis withheld as tax (e.g., 0.10).
    pub tax_rate: Decimal,
    /// What the tax rate is applied to.
    #[serde(default)]
    pub tax_basis: TaxBasis,
}

impl Default for DerivationRules {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(10, 2),
            tax_basis: TaxBasis::PaidDays,
        }
    }
}

/// How a composed payslip email leaves the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Multipart POST of the email fields and PDF to the send-email endpoint.
    #[default]
    Network,
    /// Static hosting: the PDF is downloaded locally instead of sent.
    Download,
}

/// Email composition settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailSettings {
    /// How drafts are delivered.
    #[serde(default)]
    pub delivery_mode: DeliveryMode,
    /// The send-email endpoint used in network mode.
    pub endpoint: String,
    /// The file name of the attached PDF.
    pub attachment_name: String,
    /// The sign-off appended to the default message.
    pub signature: String,
}

/// The rules.yaml file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct RulesConfig {
    /// Anchor labels.
    #[serde(default)]
    pub anchors: AnchorLabels,
    /// Derivation parameters.
    pub derivation: DerivationRules,
    /// Email composition settings.
    pub email: EmailSettings,
}

/// The payslip.yaml file structure: the form as it appears on a fresh load.
#[derive(Debug, Clone, Deserialize)]
pub struct PayslipDefaults {
    /// Default header details.
    pub employee: EmployeeDetails,
    /// Default attendance counts.
    pub attendance: Attendance,
    /// Default earnings.
    pub earnings: Vec<LineItem>,
    /// Default deductions.
    pub deductions: Vec<LineItem>,
}

/// The complete payslip configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct PayslipConfig {
    /// Form defaults.
    defaults: PayslipDefaults,
    /// Rules and settings.
    rules: RulesConfig,
}

impl PayslipConfig {
    /// Creates a new PayslipConfig from its component parts.
    pub fn new(defaults: PayslipDefaults, rules: RulesConfig) -> Self {
        Self { defaults, rules }
    }

    /// Returns the form defaults.
    pub fn defaults(&self) -> &PayslipDefaults {
        &self.defaults
    }

    /// Returns the anchor labels.
    pub fn anchors(&self) -> &AnchorLabels {
        &self.rules.anchors
    }

    /// Returns the derivation parameters.
    pub fn derivation(&self) -> &DerivationRules {
        &self.rules.derivation
    }

    /// Returns the email settings.
    pub fn email(&self) -> &EmailSettings {
        &self.rules.email
    }

    pub(crate) fn email_mut(&mut self) -> &mut EmailSettings {
        &mut self.rules.email
    }
}
