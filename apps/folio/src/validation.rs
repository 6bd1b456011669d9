use serde::{Deserialize, Serialize};

use crate::models::ResumeData;

/// Result of the pre-export check. Not an error: every problem is listed so the
/// user can fix them all at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Checks the fields every template needs before output may be generated.
///
/// FAIL conditions (all collected):
/// - blank full name
/// - blank email
/// - email without an `@`
pub fn validate(data: &ResumeData) -> ValidationReport {
    let mut errors = Vec::new();
    let contact = &data.contact;

    if contact.full_name.trim().is_empty() {
        errors.push("Full name is required".to_string());
    }

    if contact.email.trim().is_empty() {
        errors.push("Email is required".to_string());
    }

    if !contact.email.contains('@') {
        errors.push("Valid email is required".to_string());
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_json(raw: &str) -> ResumeData {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_missing_name_and_bad_email_report_two_errors() {
        let report = validate(&from_json(r#"{ "contact": { "fullName": "", "email": "x" } }"#));
        assert!(!report.is_valid);
        assert_eq!(
            report.errors,
            vec!["Full name is required", "Valid email is required"]
        );
    }

    #[test]
    fn test_complete_contact_is_valid() {
        let report = validate(&from_json(
            r#"{ "contact": { "fullName": "Jane Doe", "email": "jane@x.com" } }"#,
        ));
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_blank_email_reports_both_email_errors() {
        let report = validate(&from_json(
            r#"{ "contact": { "fullName": "Jane Doe", "email": "   " } }"#,
        ));
        assert_eq!(
            report.errors,
            vec!["Email is required", "Valid email is required"]
        );
    }

    #[test]
    fn test_whitespace_name_is_blank() {
        let report = validate(&from_json(
            r#"{ "contact": { "fullName": "  ", "email": "jane@x.com" } }"#,
        ));
        assert_eq!(report.errors, vec!["Full name is required"]);
    }

    #[test]
    fn test_sample_resume_is_valid() {
        assert!(validate(&ResumeData::sample()).is_valid);
    }
}
