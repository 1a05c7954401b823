//! Gateway WebSocket protocol — JSON messages between clients and sessions
//!
//! Every message carries at least a `type` field. Unrecognized inbound
//! types are echoed back rather than rejected, so the contract stays
//! total over well-formed JSON objects.

use formgate_core::Form;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Client → Gateway message, routed by its `type` tag
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Ping,
    ToolCall { tool: String, args: Value },
    /// Anything else; the original payload is echoed back verbatim
    Other(Value),
}

/// Classify a parsed payload by its `type` field. A `tool_call` with
/// no `args` gets an empty mapping; one with no `tool` falls through
/// to the unknown-tool envelope downstream.
pub fn classify(message: Value) -> Inbound {
    match message.get("type").and_then(Value::as_str) {
        Some("ping") => Inbound::Ping,
        Some("tool_call") => {
            let tool = message
                .get("tool")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let args = message
                .get("args")
                .cloned()
                .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
            Inbound::ToolCall { tool, args }
        }
        _ => Inbound::Other(message),
    }
}

/// Gateway → Client message (tool-call replies are the dispatch
/// envelope itself, serialized flat, and don't appear here)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    Pong,
    Echo { data: Value },
    FormUpdate { data: Form },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_ping() {
        assert_eq!(classify(serde_json::json!({"type": "ping"})), Inbound::Ping);
    }

    #[test]
    fn test_classify_tool_call() {
        let msg = serde_json::json!({
            "type": "tool_call",
            "tool": "open_form",
            "args": {"form_type": "contact"}
        });
        match classify(msg) {
            Inbound::ToolCall { tool, args } => {
                assert_eq!(tool, "open_form");
                assert_eq!(args["form_type"], "contact");
            }
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn test_classify_tool_call_missing_args_defaults_empty() {
        let msg = serde_json::json!({"type": "tool_call", "tool": "submit_form"});
        match classify(msg) {
            Inbound::ToolCall { tool, args } => {
                assert_eq!(tool, "submit_form");
                assert!(args.as_object().unwrap().is_empty());
            }
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn test_classify_missing_tool_name() {
        let msg = serde_json::json!({"type": "tool_call", "args": {}});
        match classify(msg) {
            Inbound::ToolCall { tool, .. } => assert_eq!(tool, ""),
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn test_classify_other_keeps_original() {
        let msg = serde_json::json!({"type": "chatter", "text": "hi"});
        match classify(msg.clone()) {
            Inbound::Other(original) => assert_eq!(original, msg),
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn test_classify_no_type_is_other() {
        let msg = serde_json::json!({"data": 1});
        assert!(matches!(classify(msg), Inbound::Other(_)));
    }

    #[test]
    fn test_pong_wire_shape() {
        let json = serde_json::to_value(&Outbound::Pong).unwrap();
        assert_eq!(json, serde_json::json!({"type": "pong"}));
    }

    #[test]
    fn test_echo_wire_shape() {
        let original = serde_json::json!({"type": "chatter", "text": "hi"});
        let json = serde_json::to_value(&Outbound::Echo {
            data: original.clone(),
        })
        .unwrap();
        assert_eq!(json["type"], "echo");
        assert_eq!(json["data"], original);
    }

    #[test]
    fn test_form_update_wire_shape() {
        let mut store = formgate_core::FormStore::new();
        let form = store.create_form("default");
        let json = serde_json::to_value(&Outbound::FormUpdate { data: form }).unwrap();
        assert_eq!(json["type"], "form_update");
        assert_eq!(json["data"]["status"], "active");
    }
}
