//! Inferred schema: a closed set of wire-type tags plus a recursive tree.
//!
//! JSON shape (keys are decimal field numbers):
//! ```json
//! { "1": { "type": "int" },
//!   "2": { "type": "message", "message_typedef": { "1": { "type": "bytes" } } } }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::varint::{WIRE_FIXED32, WIRE_FIXED64, WIRE_LEN, WIRE_VARINT};

/// Declared representation of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireKind {
    Int,
    Uint,
    Sint,
    Fixed32,
    Sfixed32,
    Float,
    Fixed64,
    Sfixed64,
    Double,
    String,
    Bytes,
    Message,
}

impl WireKind {
    /// Protobuf wire type carried in the field tag.
    pub fn wire_type(self) -> u8 {
        match self {
            WireKind::Int | WireKind::Uint | WireKind::Sint => WIRE_VARINT,
            WireKind::Fixed64 | WireKind::Sfixed64 | WireKind::Double => WIRE_FIXED64,
            WireKind::Fixed32 | WireKind::Sfixed32 | WireKind::Float => WIRE_FIXED32,
            WireKind::String | WireKind::Bytes | WireKind::Message => WIRE_LEN,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WireKind::Int => "int",
            WireKind::Uint => "uint",
            WireKind::Sint => "sint",
            WireKind::Fixed32 => "fixed32",
            WireKind::Sfixed32 => "sfixed32",
            WireKind::Float => "float",
            WireKind::Fixed64 => "fixed64",
            WireKind::Sfixed64 => "sfixed64",
            WireKind::Double => "double",
            WireKind::String => "string",
            WireKind::Bytes => "bytes",
            WireKind::Message => "message",
        }
    }
}

/// Schema entry for one field number.
///
/// Unknown keys are ignored so typedefs written by other tools still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    #[serde(rename = "type")]
    pub kind: WireKind,
    /// Nested schema, present for `message` entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_typedef: Option<Schema>,
    /// Optional alias used as the content key instead of the field number.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl FieldDef {
    pub fn scalar(kind: WireKind) -> Self {
        Self {
            kind,
            message_typedef: None,
            name: String::new(),
        }
    }

    pub fn message(nested: Schema) -> Self {
        Self {
            kind: WireKind::Message,
            message_typedef: Some(nested),
            name: String::new(),
        }
    }

    /// Content key for this field.
    pub fn key(&self, field_number: u32) -> String {
        if self.name.is_empty() {
            field_number.to_string()
        } else {
            self.name.clone()
        }
    }
}

/// Field number -> entry, ordered by field number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema(BTreeMap<u32, FieldDef>);

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field_number: u32) -> Option<&FieldDef> {
        self.0.get(&field_number)
    }

    pub fn insert(&mut self, field_number: u32, def: FieldDef) -> Option<FieldDef> {
        self.0.insert(field_number, def)
    }

    /// Resolve a content key: a decimal field number or a field's `name`.
    pub fn resolve(&self, key: &str) -> Option<(u32, Option<&FieldDef>)> {
        if let Ok(n) = key.parse::<u32>() {
            return Some((n, self.0.get(&n)));
        }
        self.0
            .iter()
            .find(|(_, def)| def.name == key)
            .map(|(n, def)| (*n, Some(def)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &FieldDef)> {
        self.0.iter().map(|(n, def)| (*n, def))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
