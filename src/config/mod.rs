//! Configuration loading and management for the payslip engine.
//!
//! This module loads the default form values and the derivation rules from
//! YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payslip_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Tax rate: {}", config.derivation().tax_rate);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AnchorLabels, DeliveryMode, DerivationRules, EmailSettings, PayslipConfig, PayslipDefaults,
    RulesConfig, TaxBasis,
};
