use serde::Serialize;

use super::domain::{LeadSubmission, NewLead};
use crate::site::patterns;

/// Field checks applied before anything touches the store. Collects
/// every fault instead of stopping at the first.
#[derive(Debug, Default)]
pub struct LeadValidator;

impl LeadValidator {
    pub fn check(
        &self,
        submission: LeadSubmission,
        source_page: String,
    ) -> Result<NewLead, ValidationError> {
        let mut faults = Vec::new();

        let name = submission.name.trim().to_string();
        if name.is_empty() {
            faults.push(FieldFault {
                field: "name",
                message: "Name is required".to_string(),
            });
        }

        let email = submission.email.trim().to_string();
        if email.is_empty() {
            faults.push(FieldFault {
                field: "email",
                message: "Email is required".to_string(),
            });
        } else if !patterns::email().is_match(&email) {
            faults.push(FieldFault {
                field: "email",
                message: "Email address is not valid".to_string(),
            });
        }

        let phone = normalize(submission.phone);
        if let Some(value) = phone.as_deref() {
            if !patterns::phone().is_match(value) {
                faults.push(FieldFault {
                    field: "phone",
                    message: "Phone number is not valid".to_string(),
                });
            }
        }

        if !faults.is_empty() {
            return Err(ValidationError { faults });
        }

        Ok(NewLead {
            name,
            email,
            company: normalize(submission.company),
            phone,
            form_type: submission.form_type,
            message: normalize(submission.message),
            source_page,
        })
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|inner| inner.trim().to_string())
        .filter(|inner| !inner.is_empty())
}

/// One offending field with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldFault {
    pub field: &'static str,
    pub message: String,
}

/// Raised when a submission fails field checks.
#[derive(Debug, thiserror::Error)]
#[error("lead submission failed validation")]
pub struct ValidationError {
    pub faults: Vec<FieldFault>,
}
