//! Content tree -> JSON, making every value JSON-safe.

use serde_json::{Map, Number, Value as Json};

use super::binary::{render_bytes, BinaryPolicy};
use crate::wire::{Message, Schema, Value};

/// Render `msg` as a JSON object keyed by field number (or schema name).
pub fn to_json_content(msg: &Message, schema: &Schema, policy: BinaryPolicy) -> Json {
    let mut obj = Map::with_capacity(msg.len());
    for (n, value) in msg.iter() {
        let def = schema.get(n);
        let key = def.map_or_else(|| n.to_string(), |d| d.key(n));
        let nested = def.and_then(|d| d.message_typedef.as_ref());
        obj.insert(key, value_to_json(value, nested, policy));
    }
    Json::Object(obj)
}

fn value_to_json(value: &Value, nested: Option<&Schema>, policy: BinaryPolicy) -> Json {
    match value {
        Value::Int(i) => Json::from(*i),
        Value::Uint(u) => Json::from(*u),
        // NaN and infinities have no JSON form.
        Value::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
        Value::Text(s) => Json::String(s.clone()),
        Value::Bytes(b) => Json::String(render_bytes(b, policy)),
        Value::Message(m) => {
            let empty = Schema::new();
            to_json_content(m, nested.unwrap_or(&empty), policy)
        }
        Value::Repeated(items) => Json::Array(
            items
                .iter()
                .map(|item| value_to_json(item, nested, policy))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use serde_json::json;

    use super::*;
    use crate::wire::{FieldDef, WireKind};

    #[test]
    fn renders_nested_and_repeated_values() {
        let mut inner = Message::new();
        inner.insert(1, Value::Bytes(Bytes::from_static(b"\xff\xfe")));
        let mut msg = Message::new();
        msg.insert(1, Value::Repeated(vec![Value::Int(-3), Value::Int(4)]));
        msg.insert(2, Value::Message(inner));
        msg.insert(3, Value::Bytes(Bytes::from_static(b"text")));

        let mut schema = Schema::new();
        schema.insert(1, FieldDef::scalar(WireKind::Int));
        schema.insert(2, FieldDef::message(Schema::new()));
        schema.insert(3, FieldDef::scalar(WireKind::Bytes));

        let out = to_json_content(&msg, &schema, BinaryPolicy::Utf8First);
        assert_eq!(
            out,
            json!({
                "1": [-3, 4],
                "2": { "1": "<BINARY_BASE64: //4=>" },
                "3": "text"
            })
        );
    }

    #[test]
    fn named_fields_use_their_name() {
        let mut msg = Message::new();
        msg.insert(5, Value::Uint(7));
        let mut def = FieldDef::scalar(WireKind::Fixed32);
        def.name = "count".into();
        let mut schema = Schema::new();
        schema.insert(5, def);

        assert_eq!(
            to_json_content(&msg, &schema, BinaryPolicy::Utf8First),
            json!({ "count": 7 })
        );
    }

    #[test]
    fn numeric_key_order() {
        let mut msg = Message::new();
        msg.insert(10, Value::Int(1));
        msg.insert(2, Value::Int(1));
        let out = to_json_content(&msg, &Schema::new(), BinaryPolicy::Utf8First);
        let keys: Vec<_> = out.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["2", "10"]);
    }
}
