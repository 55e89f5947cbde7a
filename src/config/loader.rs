//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payslip
//! configurations from YAML files.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::calculation::reconcile;
use crate::error::{EngineError, EngineResult};
use crate::models::{PayslipData, PayslipState};

use super::types::{
    AnchorLabels, DeliveryMode, DerivationRules, EmailSettings, PayslipConfig, PayslipDefaults,
    RulesConfig,
};

/// Loads and provides access to payslip configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── payslip.yaml   # Form defaults shown on a fresh session
/// └── rules.yaml     # Anchor labels, tax rate and basis, email settings
/// ```
///
/// # Example
///
/// ```no_run
/// use payslip_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// let state = loader.initial_state();
/// println!("Per-day salary: {}", state.per_day_salary);
/// # Ok::<(), payslip_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayslipConfig,
    initial: PayslipState,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The tax rate lies outside `0..=1`
    /// - A default amount exceeds [`MAX_AMOUNT`](crate::calculation::MAX_AMOUNT)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let defaults_path = path.join("payslip.yaml");
        let defaults = Self::load_yaml::<PayslipDefaults>(&defaults_path)?;

        let rules_path = path.join("rules.yaml");
        let rules = Self::load_yaml::<RulesConfig>(&rules_path)?;

        let rate = rules.derivation.tax_rate;
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(EngineError::ConfigParseError {
                path: rules_path.display().to_string(),
                message: format!("tax_rate must be between 0 and 1, got {}", rate),
            });
        }

        let config = PayslipConfig::new(defaults, rules);
        let initial = Self::reconcile_defaults(&config)?;

        Ok(Self { config, initial })
    }

    /// Tags anchors in the configured defaults and runs one derivation pass.
    fn reconcile_defaults(config: &PayslipConfig) -> EngineResult<PayslipState> {
        let defaults = config.defaults();
        let mut data = PayslipData {
            details: defaults.employee.clone(),
            attendance: defaults.attendance,
            earnings: defaults.earnings.clone(),
            deductions: defaults.deductions.clone(),
        };
        data.tag_anchors(config.anchors());

        Ok(reconcile(&PayslipState::new(data), config.derivation())?.state)
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Replaces the configured email delivery mode.
    ///
    /// Used by deployments that serve the front-end statically and have no
    /// send-email endpoint.
    pub fn with_delivery_mode(mut self, mode: DeliveryMode) -> Self {
        self.config.email_mut().delivery_mode = mode;
        self
    }

    /// Returns the underlying payslip configuration.
    pub fn config(&self) -> &PayslipConfig {
        &self.config
    }

    /// Returns the anchor labels.
    pub fn anchors(&self) -> &AnchorLabels {
        self.config.anchors()
    }

    /// Returns the derivation parameters.
    pub fn derivation(&self) -> &DerivationRules {
        self.config.derivation()
    }

    /// Returns the email settings.
    pub fn email(&self) -> &EmailSettings {
        self.config.email()
    }

    /// Builds a fresh editing session from the configured defaults.
    ///
    /// Anchors are tagged by label and one derivation pass is run at load
    /// time, so the returned state already carries the per-day salary, LOP
    /// and Taxes.
    pub fn initial_state(&self) -> PayslipState {
        self.initial.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaxBasis;
    use crate::models::LineItemKind;
    use std::str::FromStr;
    use tempfile::{TempDir, tempdir};

    fn config_path() -> &'static str {
        "./config/default"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn write_config(rules_yaml: &str) -> TempDir {
        let dir = tempdir().expect("Failed to create temp dir");
        fs::copy(
            Path::new(config_path()).join("payslip.yaml"),
            dir.path().join("payslip.yaml"),
        )
        .unwrap();
        fs::write(dir.path().join("rules.yaml"), rules_yaml).unwrap();
        dir
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.derivation().tax_rate, dec("0.10"));
        assert_eq!(loader.derivation().tax_basis, TaxBasis::PaidDays);
        assert_eq!(loader.anchors().professional_fee, "Professional Fee");
        assert_eq!(loader.email().delivery_mode, DeliveryMode::Network);
        assert_eq!(loader.email().endpoint, "/api/send-email");
    }

    #[test]
    fn test_defaults_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let defaults = loader.config().defaults();

        assert_eq!(defaults.attendance.total_working_days, 31);
        assert_eq!(defaults.attendance.paid_days, 11);
        assert_eq!(defaults.attendance.lop_days, 0);
        assert_eq!(defaults.earnings[0].amount, dec("45000"));
        assert_eq!(defaults.deductions.len(), 2);
    }

    #[test]
    fn test_initial_state_is_reconciled() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let state = loader.initial_state();

        assert_eq!(state.per_day_salary, dec("1452"));
        assert_eq!(state.data.anchor_amount(LineItemKind::Lop), dec("0"));
        assert_eq!(state.data.anchor_amount(LineItemKind::Taxes), dec("1597"));
        assert!(!state.overrides.per_day_salary);
        assert!(!state.overrides.lop_amount);
        assert!(!state.overrides.taxes_amount);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");
        assert!(result.is_err());

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("payslip.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_tax_rate_above_one_is_rejected() {
        let dir = write_config(
            r#"
derivation:
  tax_rate: "1.5"
email:
  endpoint: /api/send-email
  attachment_name: payslip.pdf
  signature: HR Department
"#,
        );

        match ConfigLoader::load(dir.path()) {
            Err(EngineError::ConfigParseError { path, message }) => {
                assert!(path.contains("rules.yaml"));
                assert!(message.contains("tax_rate"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_anchor_section_uses_default_labels() {
        let dir = write_config(
            r#"
derivation:
  tax_rate: "0.05"
  tax_basis: fee_less_lop
email:
  delivery_mode: download
  endpoint: /api/send-email
  attachment_name: payslip.pdf
  signature: HR Department
"#,
        );

        let loader = ConfigLoader::load(dir.path()).unwrap();
        assert_eq!(loader.anchors(), &AnchorLabels::default());
        assert_eq!(loader.derivation().tax_basis, TaxBasis::FeeLessLop);
        assert_eq!(loader.email().delivery_mode, DeliveryMode::Download);
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let dir = write_config("derivation: [not, a, map]\n");

        assert!(matches!(
            ConfigLoader::load(dir.path()),
            Err(EngineError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_oversized_default_amount_is_rejected() {
        let dir = write_config(
            r#"
derivation:
  tax_rate: "0.10"
email:
  endpoint: /api/send-email
  attachment_name: payslip.pdf
  signature: HR Department
"#,
        );
        let payslip = fs::read_to_string(dir.path().join("payslip.yaml")).unwrap();
        let oversized = payslip.replacen("45000", "10000000000000000", 1);
        assert_ne!(payslip, oversized);
        fs::write(dir.path().join("payslip.yaml"), oversized).unwrap();

        assert!(matches!(
            ConfigLoader::load(dir.path()),
            Err(EngineError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_with_delivery_mode_overrides_config() {
        let loader = ConfigLoader::load(config_path())
            .unwrap()
            .with_delivery_mode(DeliveryMode::Download);

        assert_eq!(loader.email().delivery_mode, DeliveryMode::Download);
    }
}
