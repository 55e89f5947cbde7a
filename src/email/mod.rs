//! Composition and validation of the email that carries a payslip PDF.
//!
//! The engine only drafts the request. Sending it (a multipart POST in
//! [`DeliveryMode::Network`], a local PDF download in
//! [`DeliveryMode::Download`]) is left to the client.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{DeliveryMode, EmailSettings};
use crate::error::{EngineError, EngineResult, FieldError};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is a valid regex")
});

const INVALID_EMAIL: &str = "Please enter a valid email address";
const SUBJECT_REQUIRED: &str = "Subject is required";

/// The fields of an outbound payslip email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRequest {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Carbon-copy recipients, passed through unvalidated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    /// Subject line.
    pub subject: String,
    /// Body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EmailRequest {
    /// Checks `from`, `to` and `subject`, reporting every failing field.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` listing each invalid field.
    pub fn validate(&self) -> EngineResult<()> {
        let mut errors = Vec::new();
        if !is_valid_email(&self.from) {
            errors.push(FieldError::new("from", INVALID_EMAIL));
        }
        if !is_valid_email(&self.to) {
            errors.push(FieldError::new("to", INVALID_EMAIL));
        }
        if self.subject.is_empty() {
            errors.push(FieldError::new("subject", SUBJECT_REQUIRED));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(EngineError::ValidationFailed { errors })
        }
    }
}

/// The email fields as entered, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EmailForm {
    /// Sender address.
    #[serde(default)]
    pub from: String,
    /// Recipient address.
    #[serde(default)]
    pub to: String,
    /// Carbon-copy recipients.
    #[serde(default)]
    pub cc: Option<String>,
    /// Subject line; the default subject is used when absent.
    #[serde(default)]
    pub subject: Option<String>,
    /// Body text; the default greeting is used when absent.
    #[serde(default)]
    pub message: Option<String>,
}

/// A validated email ready for the client to deliver.
#[derive(Debug, Clone, Serialize)]
pub struct EmailDraft {
    /// The email fields, with defaults filled in.
    #[serde(flatten)]
    pub request: EmailRequest,
    /// How the client should deliver it.
    pub delivery_mode: DeliveryMode,
    /// Where to POST it; absent in download mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// The file name of the attached PDF.
    pub attachment_name: String,
}

/// Returns true if `address` looks like a deliverable email address.
pub fn is_valid_email(address: &str) -> bool {
    EMAIL_PATTERN.is_match(address)
}

/// The subject used when none is entered.
pub fn default_subject(employee_name: &str, pay_period: &str) -> String {
    format!("Payslip for {} - {}", employee_name, pay_period)
}

/// The greeting used when no message is entered.
pub fn default_message(employee_name: &str, pay_period: &str, signature: &str) -> String {
    format!(
        "Dear {},\n\nPlease find attached your payslip for {}.\n\nBest regards,\n{}",
        employee_name, pay_period, signature
    )
}

/// Fills in the default subject and message, validates the result, and
/// attaches delivery details from `settings`.
///
/// An explicitly empty subject is a validation failure, not a request for
/// the default.
///
/// # Errors
///
/// Returns `ValidationFailed` if an address is malformed or the subject is empty.
pub fn compose_draft(
    employee_name: &str,
    pay_period: &str,
    form: EmailForm,
    settings: &EmailSettings,
) -> EngineResult<EmailDraft> {
    let request = EmailRequest {
        from: form.from,
        to: form.to,
        cc: form.cc.filter(|cc| !cc.trim().is_empty()),
        subject: form
            .subject
            .unwrap_or_else(|| default_subject(employee_name, pay_period)),
        message: Some(form.message.unwrap_or_else(|| {
            default_message(employee_name, pay_period, &settings.signature)
        })),
    };
    request.validate()?;

    let endpoint = match settings.delivery_mode {
        DeliveryMode::Network => Some(settings.endpoint.clone()),
        DeliveryMode::Download => None,
    };

    Ok(EmailDraft {
        request,
        delivery_mode: settings.delivery_mode,
        endpoint,
        attachment_name: settings.attachment_name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(mode: DeliveryMode) -> EmailSettings {
        EmailSettings {
            delivery_mode: mode,
            endpoint: "/api/send-email".to_string(),
            attachment_name: "payslip.pdf".to_string(),
            signature: "HR Department".to_string(),
        }
    }

    fn draft(
        from: &str,
        to: &str,
        subject: Option<&str>,
        mode: DeliveryMode,
    ) -> EngineResult<EmailDraft> {
        let form = EmailForm {
            from: from.to_string(),
            to: to.to_string(),
            subject: subject.map(str::to_string),
            ..EmailForm::default()
        };
        compose_draft("Asha Verma", "July 2025", form, &settings(mode))
    }

    #[test]
    fn test_valid_addresses() {
        assert!(is_valid_email("hr@northwind.example"));
        assert!(is_valid_email("asha.verma+payroll@mail.northwind.co.in"));
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("asha"));
        assert!(!is_valid_email("asha@"));
        assert!(!is_valid_email("asha@northwind"));
        assert!(!is_valid_email("asha verma@northwind.example"));
    }

    #[test]
    fn test_default_subject_and_message() {
        let draft = draft(
            "hr@northwind.example",
            "asha@northwind.example",
            None,
            DeliveryMode::Network,
        )
        .unwrap();

        assert_eq!(draft.request.subject, "Payslip for Asha Verma - July 2025");
        assert_eq!(
            draft.request.message.as_deref(),
            Some("Dear Asha Verma,\n\nPlease find attached your payslip for July 2025.\n\nBest regards,\nHR Department")
        );
    }

    #[test]
    fn test_network_mode_reports_endpoint() {
        let draft = draft(
            "hr@northwind.example",
            "asha@northwind.example",
            Some("July payslip"),
            DeliveryMode::Network,
        )
        .unwrap();

        assert_eq!(draft.delivery_mode, DeliveryMode::Network);
        assert_eq!(draft.endpoint.as_deref(), Some("/api/send-email"));
        assert_eq!(draft.attachment_name, "payslip.pdf");
    }

    #[test]
    fn test_download_mode_has_no_endpoint() {
        let draft = draft(
            "hr@northwind.example",
            "asha@northwind.example",
            None,
            DeliveryMode::Download,
        )
        .unwrap();

        assert_eq!(draft.delivery_mode, DeliveryMode::Download);
        assert!(draft.endpoint.is_none());
    }

    #[test]
    fn test_every_failing_field_is_reported() {
        let result = draft("not-an-email", "", Some(""), DeliveryMode::Network);

        match result {
            Err(EngineError::ValidationFailed { errors }) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["from", "to", "subject"]);
                assert_eq!(errors[0].message, "Please enter a valid email address");
                assert_eq!(errors[2].message, "Subject is required");
            }
            other => panic!("Expected ValidationFailed, got {:?}", other.map(|d| d.request)),
        }
    }

    #[test]
    fn test_blank_cc_is_dropped() {
        let form = EmailForm {
            from: "hr@northwind.example".to_string(),
            to: "asha@northwind.example".to_string(),
            cc: Some("  ".to_string()),
            subject: None,
            message: Some("See attached.".to_string()),
        };
        let draft = compose_draft(
            "Asha Verma",
            "July 2025",
            form,
            &settings(DeliveryMode::Network),
        )
        .unwrap();

        assert!(draft.request.cc.is_none());
        assert_eq!(draft.request.message.as_deref(), Some("See attached."));
    }

    #[test]
    fn test_draft_serializes_flat() {
        let draft = draft(
            "hr@northwind.example",
            "asha@northwind.example",
            None,
            DeliveryMode::Download,
        )
        .unwrap();
        let json = serde_json::to_value(&draft).unwrap();

        assert_eq!(json["to"], "asha@northwind.example");
        assert_eq!(json["delivery_mode"], "download");
        assert!(json.get("endpoint").is_none());
        assert!(json.get("cc").is_none());
    }
}
