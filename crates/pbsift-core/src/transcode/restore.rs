//! JSON content -> typed content tree (type restoration before encoding).
//!
//! The co-located schema decides what each JSON value becomes:
//! - `bytes` + string: placeholder => base64 bytes, anything else => UTF-8 bytes.
//! - `message` + object: recurse with the entry's nested schema.
//! - array: every element against the same field entry.
//! - anything else passes through with its JSON-native type. A field with no
//!   schema entry passes through too; rendering later rejects it.

use bytes::Bytes;
use serde_json::{Map, Value as Json};

use super::binary::restore_bytes;
use crate::error::{PbsiftError, Result};
use crate::wire::render::field_path;
use crate::wire::{FieldDef, Message, Schema, Value, WireKind};

/// Restore `content` (a JSON object) against `schema`.
pub fn restore_types(content: &Json, schema: &Schema) -> Result<Message> {
    let Json::Object(obj) = content else {
        return Err(PbsiftError::BadInput(
            "message_content must be a JSON object".into(),
        ));
    };
    restore_message(obj, schema, "")
}

fn restore_message(obj: &Map<String, Json>, schema: &Schema, parent: &str) -> Result<Message> {
    let mut msg = Message::new();
    for (key, value) in obj {
        let (n, def) = schema.resolve(key).ok_or_else(|| {
            let at = if parent.is_empty() { "top level" } else { parent };
            PbsiftError::BadInput(format!("invalid field identifier '{key}' at {at}"))
        })?;
        let path = field_path(parent, n);
        if def.is_none() {
            tracing::debug!(field = %path, "no schema entry, passing value through");
        }
        if msg.get(n).is_some() {
            return Err(PbsiftError::BadInput(format!(
                "field {path} given twice (by number and by name)"
            )));
        }
        msg.insert(n, restore_value(value, def, &path)?);
    }
    Ok(msg)
}

fn restore_value(value: &Json, def: Option<&FieldDef>, path: &str) -> Result<Value> {
    let kind = def.map(|d| d.kind);
    match (kind, value) {
        (_, Json::Array(items)) => items
            .iter()
            .map(|item| match item {
                Json::Array(_) => Err(PbsiftError::Encode(format!(
                    "field {path}: nested sequences have no wire form"
                ))),
                _ => restore_value(item, def, path),
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::Repeated),
        (Some(WireKind::Bytes), Json::String(s)) => restore_bytes(s)
            .map(|b| Value::Bytes(Bytes::from(b)))
            .map_err(|e| match e {
                PbsiftError::Encode(msg) => PbsiftError::Encode(format!("field {path}: {msg}")),
                other => other,
            }),
        (Some(WireKind::Message), Json::Object(obj)) => {
            let empty = Schema::new();
            let nested = def
                .and_then(|d| d.message_typedef.as_ref())
                .unwrap_or(&empty);
            restore_message(obj, nested, path).map(Value::Message)
        }
        _ => passthrough(value, path),
    }
}

fn passthrough(value: &Json, path: &str) -> Result<Value> {
    match value {
        Json::Number(num) => {
            if let Some(i) = num.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(u) = num.as_u64() {
                Ok(Value::Uint(u))
            } else {
                Ok(Value::Float(num.as_f64().unwrap_or(f64::NAN)))
            }
        }
        Json::String(s) => Ok(Value::Text(s.clone())),
        Json::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Json::Object(obj) => restore_message(obj, &Schema::new(), path).map(Value::Message),
        Json::Array(_) => restore_value(value, None, path),
        Json::Null => Err(PbsiftError::Encode(format!(
            "field {path}: null has no wire form"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn schema_with(n: u32, def: FieldDef) -> Schema {
        let mut s = Schema::new();
        s.insert(n, def);
        s
    }

    #[test]
    fn bytes_strings_become_bytes() {
        let schema = schema_with(1, FieldDef::scalar(WireKind::Bytes));
        let msg = restore_types(&json!({"1": "<BINARY_BASE64: //4=>"}), &schema).unwrap();
        assert_eq!(msg.get(1), Some(&Value::Bytes(Bytes::from_static(b"\xff\xfe"))));

        let msg = restore_types(&json!({"1": "plain"}), &schema).unwrap();
        assert_eq!(msg.get(1), Some(&Value::Bytes(Bytes::from_static(b"plain"))));
    }

    #[test]
    fn sequences_restore_each_element_against_the_same_entry() {
        let schema = schema_with(4, FieldDef::scalar(WireKind::Bytes));
        let msg = restore_types(&json!({"4": ["a", "<BINARY_BASE64: AA==>"]}), &schema).unwrap();
        assert_eq!(
            msg.get(4),
            Some(&Value::Repeated(vec![
                Value::Bytes(Bytes::from_static(b"a")),
                Value::Bytes(Bytes::from_static(b"\x00")),
            ]))
        );
    }

    #[test]
    fn nested_messages_use_nested_schema() {
        let inner = schema_with(1, FieldDef::scalar(WireKind::Bytes));
        let schema = schema_with(2, FieldDef::message(inner));
        let msg = restore_types(&json!({"2": [{"1": "x"}, {"1": "y"}]}), &schema).unwrap();

        let Some(Value::Repeated(items)) = msg.get(2) else {
            panic!("expected sequence");
        };
        let Value::Message(first) = &items[0] else {
            panic!("expected message");
        };
        assert_eq!(first.get(1), Some(&Value::Bytes(Bytes::from_static(b"x"))));
    }

    #[test]
    fn field_without_schema_entry_passes_through_unchanged() {
        let schema = schema_with(1, FieldDef::scalar(WireKind::Int));
        let msg = restore_types(&json!({"1": 5, "7": "keep me"}), &schema).unwrap();
        assert_eq!(msg.get(1), Some(&Value::Int(5)));
        assert_eq!(msg.get(7), Some(&Value::Text("keep me".into())));
    }

    #[test]
    fn non_bytes_strings_stay_text() {
        let schema = schema_with(1, FieldDef::scalar(WireKind::String));
        let msg = restore_types(&json!({"1": "<BINARY_BASE64: //4=>"}), &schema).unwrap();
        assert_eq!(msg.get(1), Some(&Value::Text("<BINARY_BASE64: //4=>".into())));
    }

    #[test]
    fn names_resolve_to_field_numbers() {
        let mut def = FieldDef::scalar(WireKind::Int);
        def.name = "score".into();
        let schema = schema_with(3, def);
        let msg = restore_types(&json!({"score": 9}), &schema).unwrap();
        assert_eq!(msg.get(3), Some(&Value::Int(9)));

        let err = restore_types(&json!({"score": 9, "3": 9}), &schema).unwrap_err();
        assert_eq!(err.code().as_str(), "BAD_INPUT");
    }

    #[test]
    fn rejects_bad_shapes() {
        let schema = Schema::new();
        assert_eq!(
            restore_types(&json!([1, 2]), &schema).unwrap_err().code().as_str(),
            "BAD_INPUT"
        );
        assert_eq!(
            restore_types(&json!({"abc": 1}), &schema).unwrap_err().code().as_str(),
            "BAD_INPUT"
        );
        let bytes = schema_with(1, FieldDef::scalar(WireKind::Bytes));
        assert_eq!(
            restore_types(&json!({"1": "<BINARY_BASE64: %%>"}), &bytes)
                .unwrap_err()
                .code()
                .as_str(),
            "ENCODE"
        );
    }
}
