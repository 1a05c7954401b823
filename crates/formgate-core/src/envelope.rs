//! Uniform result envelope wrapping every tool dispatch

use serde::{Deserialize, Serialize};

use crate::form::Form;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

/// Dispatch result sent back to the caller, serialized flat.
///
/// `form` carries a snapshot of the current form when the tool touched
/// it; `errors` carries the full validation error list on a rejected
/// submit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub status: EnvelopeStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<Form>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl Envelope {
    pub fn success(message: impl Into<String>, form: Form) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            message: message.into(),
            form: Some(form),
            errors: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            message: message.into(),
            form: None,
            errors: None,
        }
    }

    pub fn validation_error(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            message: message.into(),
            form: None,
            errors: Some(errors),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == EnvelopeStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_success_serializes_flat() {
        let form = Form::new("form_1".to_string(), "default".to_string(), Utc::now());
        let env = Envelope::success("Form opened successfully.", form);
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["form"]["id"], "form_1");
        // No error list on success
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn test_error_omits_optional_members() {
        let env = Envelope::error("Unknown tool: frobnicate");
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Unknown tool: frobnicate");
        assert!(json.get("form").is_none());
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn test_validation_error_carries_full_list() {
        let env = Envelope::validation_error(
            "Form validation failed: name is required, email is required",
            vec!["name is required".to_string(), "email is required".to_string()],
        );
        assert!(!env.is_success());
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["errors"][0], "name is required");
        assert_eq!(json["errors"][1], "email is required");
    }
}
