//! The decoded document: inferred content plus the schema it was read with.

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::error::{PbsiftError, Result};
use crate::wire::Schema;

/// `{ "message_content": ..., "schema_definition": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecodedDocument {
    pub message_content: serde_json::Value,
    pub schema_definition: Schema,
}

impl DecodedDocument {
    /// Human-readable JSON; `indent == 0` yields compact output.
    pub fn to_json_pretty(&self, indent: usize) -> Result<Vec<u8>> {
        if indent == 0 {
            return serde_json::to_vec(self)
                .map_err(|e| PbsiftError::Internal(format!("serialize document: {e}")));
        }

        let indent = " ".repeat(indent);
        let mut out = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(
            &mut out,
            PrettyFormatter::with_indent(indent.as_bytes()),
        );
        self.serialize(&mut ser)
            .map_err(|e| PbsiftError::Internal(format!("serialize document: {e}")))?;
        out.push(b'\n');
        Ok(out)
    }

    pub fn from_json_slice(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data)
            .map_err(|e| PbsiftError::BadInput(format!("invalid document json: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::wire::{FieldDef, WireKind};

    fn sample() -> DecodedDocument {
        let mut schema = Schema::new();
        schema.insert(1, FieldDef::scalar(WireKind::Int));
        DecodedDocument {
            message_content: json!({"1": 150}),
            schema_definition: schema,
        }
    }

    #[test]
    fn pretty_output_is_stable() {
        let out = sample().to_json_pretty(4).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "{\n    \"message_content\": {\n        \"1\": 150\n    },\n    \"schema_definition\": {\n        \"1\": {\n            \"type\": \"int\"\n        }\n    }\n}\n"
        );
    }

    #[test]
    fn parses_back() {
        let doc = sample();
        let again = DecodedDocument::from_json_slice(&doc.to_json_pretty(2).unwrap()).unwrap();
        assert_eq!(again, doc);
    }

    #[test]
    fn rejects_unknown_top_level_keys() {
        let err = DecodedDocument::from_json_slice(
            br#"{"message_content": {}, "schema_definition": {}, "extra": 1}"#,
        )
        .unwrap_err();
        assert_eq!(err.code().as_str(), "BAD_INPUT");
    }
}
