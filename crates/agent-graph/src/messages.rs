//! Field lookup over framework messages
//!
//! Depending on how the runtime serialises its messages, the author name and
//! content can sit directly on the object, inside a constructor payload
//! (`kwargs`) or inside a tagged wrapper (`data`). Each lookup tries those
//! locations in that order and gives up quietly when none matches.

use serde_json::Value;

/// Nested payload keys searched after the top level, in order
const NESTED_PAYLOADS: [&str; 2] = ["kwargs", "data"];

/// Find the first non-null value for `field`
fn lookup_field<'a>(message: &'a Value, field: &str) -> Option<&'a Value> {
    let direct = message.get(field).filter(|v| !v.is_null());
    direct.or_else(|| {
        NESTED_PAYLOADS.iter().find_map(|payload| {
            message
                .get(payload)
                .and_then(|nested| nested.get(field))
                .filter(|v| !v.is_null())
        })
    })
}

/// Author of a message (the emitting agent's node name)
pub fn message_name(message: &Value) -> Option<String> {
    match lookup_field(message, "name")? {
        Value::String(name) if !name.trim().is_empty() => Some(name.trim().to_string()),
        _ => None,
    }
}

/// Text of a message.
///
/// String content is returned unchanged. A list of content blocks
/// contributes its text blocks (plain strings or `{"type": "text"}`
/// objects) joined by newlines. Any other value falls back to its JSON
/// string form. Missing or null content yields `None`.
pub fn message_text(message: &Value) -> Option<String> {
    match lookup_field(message, "content")? {
        Value::String(text) => Some(text.clone()),
        Value::Array(blocks) => Some(
            blocks
                .iter()
                .filter_map(block_text)
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        other => Some(other.to_string()),
    }
}

fn block_text(block: &Value) -> Option<&str> {
    match block {
        Value::String(text) => Some(text.as_str()),
        Value::Object(fields) => {
            let is_text = fields
                .get("type")
                .and_then(Value::as_str)
                .is_none_or(|kind| kind == "text");
            if is_text {
                fields.get("text").and_then(Value::as_str)
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_fields() {
        let msg = json!({"type": "ai", "name": "market_data_agent", "content": "RELIANCE at 2900"});
        assert_eq!(message_name(&msg).as_deref(), Some("market_data_agent"));
        assert_eq!(message_text(&msg).as_deref(), Some("RELIANCE at 2900"));
    }

    #[test]
    fn test_kwargs_payload() {
        let msg = json!({
            "lc": 1,
            "type": "constructor",
            "kwargs": {"name": "news_analyst_agent", "content": "Headlines"}
        });
        assert_eq!(message_name(&msg).as_deref(), Some("news_analyst_agent"));
        assert_eq!(message_text(&msg).as_deref(), Some("Headlines"));
    }

    #[test]
    fn test_data_payload() {
        let msg = json!({"type": "ai", "data": {"name": "supervisor", "content": "Verdict"}});
        assert_eq!(message_name(&msg).as_deref(), Some("supervisor"));
        assert_eq!(message_text(&msg).as_deref(), Some("Verdict"));
    }

    #[test]
    fn test_direct_null_falls_through_to_nested() {
        let msg = json!({"name": null, "content": null, "kwargs": {"name": "supervisor", "content": "x"}});
        assert_eq!(message_name(&msg).as_deref(), Some("supervisor"));
        assert_eq!(message_text(&msg).as_deref(), Some("x"));
    }

    #[test]
    fn test_content_blocks() {
        let msg = json!({
            "name": "stock_finder_agent",
            "content": [
                {"type": "text", "text": "First"},
                {"type": "tool_use", "id": "t1", "input": {}},
                "Second",
                {"text": "Third"}
            ]
        });
        assert_eq!(message_text(&msg).as_deref(), Some("First\nSecond\nThird"));
    }

    #[test]
    fn test_scalar_content_coerced() {
        assert_eq!(message_text(&json!({"content": 42})).as_deref(), Some("42"));
        assert_eq!(
            message_text(&json!({"content": {"k": "v"}})).as_deref(),
            Some(r#"{"k":"v"}"#)
        );
    }

    #[test]
    fn test_missing_fields() {
        let msg = json!({"type": "tool"});
        assert_eq!(message_name(&msg), None);
        assert_eq!(message_text(&msg), None);
        assert_eq!(message_text(&json!("bare string")), None);
        assert_eq!(message_name(&json!({"name": "  "})), None);
        assert_eq!(message_name(&json!({"name": 7})), None);
    }
}
