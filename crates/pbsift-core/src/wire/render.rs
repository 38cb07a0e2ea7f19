//! Content tree -> wire bytes, with the schema as the wire-type authority.
//!
//! Fields are written in ascending field-number order, repeated elements in
//! sequence order, varints in minimal form.

use bytes::BufMut;

use super::schema::{FieldDef, Schema, WireKind};
use super::value::{Message, Value};
use super::varint::{encode_tag, encode_varint, zigzag_encode, MAX_FIELD_NUMBER};
use crate::error::{PbsiftError, Result};

/// Render `msg` using `schema` for every field's wire type.
pub fn render_message(msg: &Message, schema: &Schema) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_message(msg, schema, "", &mut out)?;
    Ok(out)
}

fn write_message(msg: &Message, schema: &Schema, parent: &str, out: &mut Vec<u8>) -> Result<()> {
    for (n, value) in msg.iter() {
        let path = field_path(parent, n);
        if n == 0 || n > MAX_FIELD_NUMBER {
            return Err(PbsiftError::Encode(format!(
                "field {path}: field number out of range"
            )));
        }
        let def = schema
            .get(n)
            .ok_or_else(|| PbsiftError::MissingSchema(path.clone()))?;

        match value {
            Value::Repeated(items) => {
                for item in items {
                    if matches!(item, Value::Repeated(_)) {
                        return Err(PbsiftError::Encode(format!(
                            "field {path}: nested sequences have no wire form"
                        )));
                    }
                    write_field(n, item, def, &path, out)?;
                }
            }
            single => write_field(n, single, def, &path, out)?,
        }
    }
    Ok(())
}

fn write_field(n: u32, value: &Value, def: &FieldDef, path: &str, out: &mut Vec<u8>) -> Result<()> {
    encode_tag(n, def.kind.wire_type(), out);

    let mismatch = || {
        PbsiftError::Encode(format!(
            "field {path}: {} value does not fit type '{}'",
            value_kind(value),
            def.kind.as_str()
        ))
    };

    match def.kind {
        WireKind::Int => {
            let v = match value {
                Value::Int(i) => *i as u64,
                Value::Uint(u) => *u,
                _ => return Err(mismatch()),
            };
            encode_varint(v, out);
        }
        WireKind::Uint => {
            let v = match value {
                Value::Uint(u) => *u,
                Value::Int(i) => u64::try_from(*i).map_err(|_| mismatch())?,
                _ => return Err(mismatch()),
            };
            encode_varint(v, out);
        }
        WireKind::Sint => {
            let v = match value {
                Value::Int(i) => *i,
                Value::Uint(u) => i64::try_from(*u).map_err(|_| mismatch())?,
                _ => return Err(mismatch()),
            };
            encode_varint(zigzag_encode(v), out);
        }
        WireKind::Fixed32 => {
            let v = match value {
                Value::Uint(u) => u32::try_from(*u).map_err(|_| mismatch())?,
                Value::Int(i) => u32::try_from(*i).map_err(|_| mismatch())?,
                _ => return Err(mismatch()),
            };
            out.put_u32_le(v);
        }
        WireKind::Sfixed32 => {
            let v = match value {
                Value::Int(i) => i32::try_from(*i).map_err(|_| mismatch())?,
                Value::Uint(u) => i32::try_from(*u).map_err(|_| mismatch())?,
                _ => return Err(mismatch()),
            };
            out.put_i32_le(v);
        }
        WireKind::Float => {
            let v = as_f64(value).ok_or_else(mismatch)?;
            out.put_f32_le(v as f32);
        }
        WireKind::Fixed64 => {
            let v = match value {
                Value::Uint(u) => *u,
                Value::Int(i) => u64::try_from(*i).map_err(|_| mismatch())?,
                _ => return Err(mismatch()),
            };
            out.put_u64_le(v);
        }
        WireKind::Sfixed64 => {
            let v = match value {
                Value::Int(i) => *i,
                Value::Uint(u) => i64::try_from(*u).map_err(|_| mismatch())?,
                _ => return Err(mismatch()),
            };
            out.put_i64_le(v);
        }
        WireKind::Double => {
            let v = as_f64(value).ok_or_else(mismatch)?;
            out.put_f64_le(v);
        }
        WireKind::String | WireKind::Bytes => {
            let data: &[u8] = match value {
                Value::Bytes(b) => &b[..],
                Value::Text(s) => s.as_bytes(),
                _ => return Err(mismatch()),
            };
            encode_varint(data.len() as u64, out);
            out.put_slice(data);
        }
        WireKind::Message => {
            let Value::Message(nested) = value else {
                return Err(mismatch());
            };
            let empty = Schema::new();
            let nested_schema = def.message_typedef.as_ref().unwrap_or(&empty);

            let mut body = Vec::new();
            write_message(nested, nested_schema, path, &mut body)?;
            encode_varint(body.len() as u64, out);
            out.put_slice(&body);
        }
    }
    Ok(())
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Float(f) => Some(*f),
        Value::Int(i) => Some(*i as f64),
        Value::Uint(u) => Some(*u as f64),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Int(_) | Value::Uint(_) => "integer",
        Value::Float(_) => "float",
        Value::Text(_) => "string",
        Value::Bytes(_) => "bytes",
        Value::Message(_) => "object",
        Value::Repeated(_) => "sequence",
    }
}

pub(crate) fn field_path(parent: &str, n: u32) -> String {
    if parent.is_empty() {
        n.to_string()
    } else {
        format!("{parent}.{n}")
    }
}
