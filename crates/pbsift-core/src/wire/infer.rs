//! Structural inference: untyped wire bytes -> (content tree, schema).
//!
//! Rules:
//! - varint => `int`, fixed32 => `fixed32`, fixed64 => `fixed64`.
//! - length-delimited => `message` iff every occurrence of the field parses
//!   as a non-empty message (within the depth limit) and re-renders to the
//!   identical bytes under the jointly inferred nested schema; else `bytes`.
//! - repeated occurrences share one schema entry; nested schemas are inferred
//!   over all occurrences together.

use std::collections::BTreeMap;

use bytes::{Buf, Bytes};

use super::render::{field_path, render_message};
use super::schema::{FieldDef, Schema, WireKind};
use super::value::{Message, Value};
use super::varint::{
    decode_tag, decode_varint, zigzag_decode, WIRE_FIXED32, WIRE_FIXED64, WIRE_LEN, WIRE_VARINT,
};
use crate::error::{PbsiftError, Result};

/// One undecoded wire occurrence.
#[derive(Debug, Clone)]
pub(crate) enum RawField {
    Varint(u64),
    Fixed64(u64),
    Len(Bytes),
    Fixed32(u32),
}

impl RawField {
    fn wire_type(&self) -> u8 {
        match self {
            RawField::Varint(_) => WIRE_VARINT,
            RawField::Fixed64(_) => WIRE_FIXED64,
            RawField::Len(_) => WIRE_LEN,
            RawField::Fixed32(_) => WIRE_FIXED32,
        }
    }
}

type Fields = Vec<(u32, RawField)>;

/// Split a message body into (field number, raw occurrence) pairs.
pub(crate) fn parse_fields(mut buf: Bytes) -> Result<Fields> {
    let mut out = Vec::new();
    while buf.has_remaining() {
        let left = buf.remaining();
        let (n, wire_type) = decode_tag(&mut buf).ok_or_else(|| {
            PbsiftError::Decode(format!("invalid field tag ({left} bytes left)"))
        })?;

        let raw = match wire_type {
            WIRE_VARINT => RawField::Varint(
                decode_varint(&mut buf)
                    .ok_or_else(|| PbsiftError::Decode(format!("field {n}: truncated varint")))?,
            ),
            WIRE_FIXED64 => {
                if buf.remaining() < 8 {
                    return Err(PbsiftError::Decode(format!("field {n}: truncated fixed64")));
                }
                RawField::Fixed64(buf.get_u64_le())
            }
            WIRE_LEN => {
                let len = decode_varint(&mut buf)
                    .and_then(|l| usize::try_from(l).ok())
                    .ok_or_else(|| PbsiftError::Decode(format!("field {n}: invalid length")))?;
                if buf.remaining() < len {
                    return Err(PbsiftError::Decode(format!(
                        "field {n}: length {len} exceeds {} remaining bytes",
                        buf.remaining()
                    )));
                }
                RawField::Len(buf.split_to(len))
            }
            WIRE_FIXED32 => {
                if buf.remaining() < 4 {
                    return Err(PbsiftError::Decode(format!("field {n}: truncated fixed32")));
                }
                RawField::Fixed32(buf.get_u32_le())
            }
            other => {
                return Err(PbsiftError::Decode(format!(
                    "field {n}: unsupported wire type {other}"
                )))
            }
        };
        out.push((n, raw));
    }
    Ok(out)
}

/// Infers schemas with a nesting limit.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Inferrer {
    pub max_depth: usize,
}

impl Inferrer {
    pub fn infer(&self, payload: Bytes) -> Result<(Message, Schema)> {
        let fields = parse_fields(payload).map_err(|e| match e {
            PbsiftError::Decode(msg) => {
                PbsiftError::Decode(format!("payload is not a well-formed message: {msg}"))
            }
            other => other,
        })?;
        let schema = self.infer_schema(&[&fields], 0)?;
        let msg = build_message(&fields, &schema, "")?;
        Ok((msg, schema))
    }

    fn infer_schema(&self, messages: &[&Fields], depth: usize) -> Result<Schema> {
        let mut groups: BTreeMap<u32, Vec<&RawField>> = BTreeMap::new();
        for fields in messages {
            for (n, raw) in fields.iter() {
                groups.entry(*n).or_default().push(raw);
            }
        }

        let mut schema = Schema::new();
        for (n, raws) in groups {
            let wire_type = raws.first().map_or(WIRE_VARINT, |r| r.wire_type());
            if raws.iter().any(|r| r.wire_type() != wire_type) {
                return Err(PbsiftError::Decode(format!(
                    "field {n} appears with conflicting wire types"
                )));
            }

            let def = match wire_type {
                WIRE_FIXED64 => FieldDef::scalar(WireKind::Fixed64),
                WIRE_FIXED32 => FieldDef::scalar(WireKind::Fixed32),
                WIRE_LEN => self.infer_len(n, &raws, depth),
                _ => FieldDef::scalar(WireKind::Int),
            };
            schema.insert(n, def);
        }
        Ok(schema)
    }

    fn infer_len(&self, n: u32, raws: &[&RawField], depth: usize) -> FieldDef {
        let bytes = FieldDef::scalar(WireKind::Bytes);
        if depth + 1 > self.max_depth {
            tracing::debug!(field = n, depth, "nesting limit reached, keeping bytes");
            return bytes;
        }

        let chunks: Vec<&Bytes> = raws
            .iter()
            .filter_map(|r| match r {
                RawField::Len(b) => Some(b),
                _ => None,
            })
            .collect();
        if chunks.iter().any(|b| b.is_empty()) {
            return bytes;
        }

        let parsed: Option<Vec<Fields>> = chunks
            .iter()
            .map(|b| parse_fields((*b).clone()).ok())
            .collect();
        let Some(parsed) = parsed else {
            return bytes;
        };

        let refs: Vec<&Fields> = parsed.iter().collect();
        let Ok(nested) = self.infer_schema(&refs, depth + 1) else {
            return bytes;
        };

        // Only accept a sub-message that reproduces its exact bytes.
        for (fields, original) in parsed.iter().zip(&chunks) {
            let stable = build_message(fields, &nested, "")
                .and_then(|m| render_message(&m, &nested))
                .is_ok_and(|out| out[..] == original[..]);
            if !stable {
                tracing::debug!(field = n, "sub-message does not re-render identically, keeping bytes");
                return bytes;
            }
        }

        FieldDef::message(nested)
    }
}

/// Materialize raw occurrences as values typed by `schema`.
pub(crate) fn build_message(fields: &Fields, schema: &Schema, parent: &str) -> Result<Message> {
    let mut msg = Message::new();
    for (n, raw) in fields {
        let path = field_path(parent, *n);
        let def = schema
            .get(*n)
            .ok_or_else(|| PbsiftError::MissingSchema(path.clone()))?;
        msg.push(*n, raw_value(raw, def, &path)?);
    }
    Ok(msg)
}

fn raw_value(raw: &RawField, def: &FieldDef, path: &str) -> Result<Value> {
    let mismatch = || {
        PbsiftError::Decode(format!(
            "field {path}: wire type {} does not match type '{}'",
            raw.wire_type(),
            def.kind.as_str()
        ))
    };

    let value = match (raw, def.kind) {
        (RawField::Varint(v), WireKind::Int) => Value::Int(*v as i64),
        (RawField::Varint(v), WireKind::Uint) => Value::Uint(*v),
        (RawField::Varint(v), WireKind::Sint) => Value::Int(zigzag_decode(*v)),
        (RawField::Fixed32(v), WireKind::Fixed32) => Value::Uint(u64::from(*v)),
        (RawField::Fixed32(v), WireKind::Sfixed32) => Value::Int(i64::from(*v as i32)),
        (RawField::Fixed32(v), WireKind::Float) => Value::Float(f64::from(f32::from_bits(*v))),
        (RawField::Fixed64(v), WireKind::Fixed64) => Value::Uint(*v),
        (RawField::Fixed64(v), WireKind::Sfixed64) => Value::Int(*v as i64),
        (RawField::Fixed64(v), WireKind::Double) => Value::Float(f64::from_bits(*v)),
        (RawField::Len(b), WireKind::Bytes) => Value::Bytes(b.clone()),
        (RawField::Len(b), WireKind::String) => match std::str::from_utf8(b) {
            Ok(s) => Value::Text(s.to_owned()),
            Err(_) => return Err(mismatch()),
        },
        (RawField::Len(b), WireKind::Message) => {
            let empty = Schema::new();
            let nested = def.message_typedef.as_ref().unwrap_or(&empty);
            let fields = parse_fields(b.clone())?;
            Value::Message(build_message(&fields, nested, path)?)
        }
        _ => return Err(mismatch()),
    };
    Ok(value)
}
