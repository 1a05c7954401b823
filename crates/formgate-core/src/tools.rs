//! Form tools — the closed tool set, its dispatch, and the schemas
//! advertised to function-calling models

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::envelope::Envelope;
use crate::store::{FormStore, SubmitOutcome};

// ── Tool set ───────────────────────────────────────────────────

/// The closed set of tools a session exposes. Adding a tool means
/// adding a variant here; dispatch is exhaustive over this enum, so an
/// unrecognized wire name can only ever fall into the unknown-tool
/// envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    OpenForm,
    UpdateFormField,
    SubmitForm,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [
        ToolKind::OpenForm,
        ToolKind::UpdateFormField,
        ToolKind::SubmitForm,
    ];

    /// Resolve a wire name to a tool, `None` for anything unrecognized
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "open_form" => Some(Self::OpenForm),
            "update_form_field" => Some(Self::UpdateFormField),
            "submit_form" => Some(Self::SubmitForm),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::OpenForm => "open_form",
            Self::UpdateFormField => "update_form_field",
            Self::SubmitForm => "submit_form",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::OpenForm => "Open a new form for the user to fill",
            Self::UpdateFormField => "Update a specific field in the form",
            Self::SubmitForm => "Submit the completed form",
        }
    }

    pub fn input_schema(self) -> Value {
        match self {
            Self::OpenForm => json_schema(
                serde_json::json!({
                    "form_type": {
                        "type": "string",
                        "description": "Type of form to open",
                        "default": "default"
                    }
                }),
                vec![],
            ),
            Self::UpdateFormField => json_schema(
                serde_json::json!({
                    "field_name": {
                        "type": "string",
                        "description": "Name of the field to update (name, email, phone, message)"
                    },
                    "value": {
                        "type": "string",
                        "description": "Value to set for the field"
                    }
                }),
                vec!["field_name", "value"],
            ),
            Self::SubmitForm => json_schema(serde_json::json!({}), vec![]),
        }
    }

    pub fn definition(self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// Tool metadata advertised to the function-calling model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Definitions for every tool, in declaration order
pub fn tool_definitions() -> Vec<ToolDefinition> {
    ToolKind::ALL.iter().map(|kind| kind.definition()).collect()
}

/// Helper to build a JSON schema object for tool input
pub fn json_schema(properties: Value, required: Vec<&str>) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

// ── Dispatch ───────────────────────────────────────────────────

/// Maps named tool calls onto [`FormStore`] operations and normalizes
/// every outcome (success, store failure, bad arguments, unknown
/// name) into an [`Envelope`]. Faults never escape to the caller.
pub struct ToolDispatcher {
    store: Arc<RwLock<FormStore>>,
}

impl ToolDispatcher {
    pub fn new(store: Arc<RwLock<FormStore>>) -> Self {
        Self { store }
    }

    /// The store this dispatcher operates on
    pub fn store(&self) -> Arc<RwLock<FormStore>> {
        Arc::clone(&self.store)
    }

    /// Dispatch one tool call. Always returns an envelope.
    pub async fn dispatch(&self, name: &str, args: &Value) -> Envelope {
        debug!(tool = name, "dispatching tool call");
        let Some(kind) = ToolKind::from_name(name) else {
            warn!(tool = name, "unknown tool");
            return Envelope::error(format!("Unknown tool: {}", name));
        };
        match kind {
            ToolKind::OpenForm => self.open_form(args).await,
            ToolKind::UpdateFormField => self.update_form_field(args).await,
            ToolKind::SubmitForm => self.submit_form().await,
        }
    }

    async fn open_form(&self, args: &Value) -> Envelope {
        let form_type = args
            .get("form_type")
            .and_then(Value::as_str)
            .unwrap_or("default");
        let form = self.store.write().await.create_form(form_type);
        Envelope::success(
            "Form opened successfully. You can now provide your details.",
            form,
        )
    }

    async fn update_form_field(&self, args: &Value) -> Envelope {
        let field_name = args
            .get("field_name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty());
        // An empty string value is legal; an absent one is not.
        let value = args.get("value").and_then(Value::as_str);
        let (Some(field_name), Some(value)) = (field_name, value) else {
            return Envelope::error("Field name and value are required");
        };

        match self.store.write().await.update_field(field_name, value) {
            Ok(form) => Envelope::success(
                format!("Updated {} field successfully", field_name),
                form,
            ),
            Err(err) => {
                warn!(field = field_name, error = %err, "field update failed");
                Envelope::error(err.to_string())
            }
        }
    }

    async fn submit_form(&self) -> Envelope {
        match self.store.write().await.submit_form() {
            Ok(SubmitOutcome::Submitted(form)) => {
                Envelope::success("Form submitted successfully!", form)
            }
            Ok(SubmitOutcome::Rejected(errors)) => Envelope::validation_error(
                format!("Form validation failed: {}", errors.join(", ")),
                errors,
            ),
            Err(err) => {
                warn!(error = %err, "submit failed");
                Envelope::error(err.to_string())
            }
        }
    }
}
