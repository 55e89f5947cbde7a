//! Error types for the payslip engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading configuration,
//! reconciling payslip state, or validating outbound email requests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::LineItemSide;

/// A single form validation failure, reported against the offending field.
///
/// # Example
///
/// ```
/// use payslip_engine::error::FieldError;
///
/// let error = FieldError::new("to", "Please enter a valid email address");
/// assert_eq!(error.field, "to");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The name of the field that failed validation.
    pub field: String,
    /// A human-readable description of the failure.
    pub message: String,
}

impl FieldError {
    /// Creates a new field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// The main error type for the payslip engine.
///
/// All fallible operations in the engine return this error type, making it
/// easy to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payslip_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An anchor line item (Professional Fee, LOP, Taxes) was the target of
    /// a removal or relabel.
    #[error("Line item '{label}' cannot be {operation}")]
    ProtectedLineItem {
        /// The label of the protected line item.
        label: String,
        /// The rejected operation ("removed" or "relabelled").
        operation: String,
    },

    /// A line item index was out of range for its list.
    #[error("No {side} line item at index {index}")]
    LineItemNotFound {
        /// The list that was indexed.
        side: LineItemSide,
        /// The requested index.
        index: usize,
    },

    /// A single input field held an unusable value.
    #[error("Invalid field '{field}': {message}")]
    InvalidField {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// One or more form fields failed validation.
    #[error("Validation failed for {} field(s)", errors.len())]
    ValidationFailed {
        /// The per-field failures.
        errors: Vec<FieldError>,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_protected_line_item_displays_label_and_operation() {
        let error = EngineError::ProtectedLineItem {
            label: "LOP".to_string(),
            operation: "removed".to_string(),
        };
        assert_eq!(error.to_string(), "Line item 'LOP' cannot be removed");
    }

    #[test]
    fn test_line_item_not_found_displays_side_and_index() {
        let error = EngineError::LineItemNotFound {
            side: LineItemSide::Deductions,
            index: 7,
        };
        assert_eq!(error.to_string(), "No deductions line item at index 7");
    }

    #[test]
    fn test_invalid_field_displays_field_and_message() {
        let error = EngineError::InvalidField {
            field: "per_day_salary".to_string(),
            message: "must not be negative".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid field 'per_day_salary': must not be negative"
        );
    }

    #[test]
    fn test_validation_failed_counts_errors() {
        let error = EngineError::ValidationFailed {
            errors: vec![
                FieldError::new("from", "Please enter a valid email address"),
                FieldError::new("subject", "Subject is required"),
            ],
        };
        assert_eq!(error.to_string(), "Validation failed for 2 field(s)");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> EngineResult<()> {
            Err(EngineError::LineItemNotFound {
                side: LineItemSide::Earnings,
                index: 3,
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
