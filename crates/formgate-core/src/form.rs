//! Form data model — fixed-schema documents filled in one field at a time

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Input widget kind for a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Textarea,
}

/// A single form field. `required` and `kind` are fixed at creation;
/// only `value` changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub value: String,
    pub required: bool,
    #[serde(rename = "type")]
    pub kind: FieldKind,
}

/// Form lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    Active,
    Submitted,
}

/// One in-progress document. The field set is established by
/// [`FIELD_SCHEMA`] at creation and never grows or shrinks; iteration
/// order of `fields` is schema order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    pub id: String,
    #[serde(rename = "type")]
    pub form_type: String,
    pub fields: IndexMap<String, Field>,
    pub status: FormStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// The fixed field schema, in display order
pub const FIELD_SCHEMA: [(&str, bool, FieldKind); 4] = [
    ("name", true, FieldKind::Text),
    ("email", true, FieldKind::Email),
    ("phone", false, FieldKind::Tel),
    ("message", false, FieldKind::Textarea),
];

impl Form {
    /// Build an empty form over the fixed schema
    pub(crate) fn new(id: String, form_type: String, created_at: DateTime<Utc>) -> Self {
        let fields = FIELD_SCHEMA
            .iter()
            .map(|(name, required, kind)| {
                (
                    name.to_string(),
                    Field {
                        value: String::new(),
                        required: *required,
                        kind: *kind,
                    },
                )
            })
            .collect();
        Self {
            id,
            form_type,
            fields,
            status: FormStatus::Active,
            created_at,
            updated_at: None,
            submitted_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Form {
        Form::new("form_1".to_string(), "default".to_string(), Utc::now())
    }

    #[test]
    fn test_new_form_has_schema_fields_in_order() {
        let form = sample();
        let names: Vec<&str> = form.fields.keys().map(String::as_str).collect();
        assert_eq!(names, ["name", "email", "phone", "message"]);
        assert!(form.fields.values().all(|f| f.value.is_empty()));
        assert_eq!(form.status, FormStatus::Active);
    }

    #[test]
    fn test_required_flags() {
        let form = sample();
        assert!(form.fields["name"].required);
        assert!(form.fields["email"].required);
        assert!(!form.fields["phone"].required);
        assert!(!form.fields["message"].required);
    }

    #[test]
    fn test_serialize_shape() {
        let form = sample();
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["id"], "form_1");
        assert_eq!(json["type"], "default");
        assert_eq!(json["status"], "active");
        assert_eq!(json["fields"]["email"]["type"], "email");
        assert_eq!(json["fields"]["message"]["type"], "textarea");
        // Unset timestamps are omitted entirely
        assert!(json.get("updated_at").is_none());
        assert!(json.get("submitted_at").is_none());
    }

    #[test]
    fn test_field_order_survives_serialization() {
        let form = sample();
        let json = serde_json::to_string(&form).unwrap();
        let name_pos = json.find("\"name\"").unwrap();
        let email_pos = json.find("\"email\"").unwrap();
        let phone_pos = json.find("\"phone\"").unwrap();
        let message_pos = json.find("\"message\"").unwrap();
        assert!(name_pos < email_pos && email_pos < phone_pos && phone_pos < message_pos);
    }

    #[test]
    fn test_roundtrip() {
        let form = sample();
        let json = serde_json::to_string(&form).unwrap();
        let parsed: Form = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, form.id);
        assert_eq!(parsed.fields.len(), 4);
        assert_eq!(parsed.fields["name"].kind, FieldKind::Text);
    }
}
