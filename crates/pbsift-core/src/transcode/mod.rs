//! Schema-tagged transcoding between bare payloads and JSON documents.
//!
//! Decode: payload -> `StructuralCodec::infer` -> JSON-safe content + schema.
//! Encode: document -> type restoration -> `StructuralCodec::render`.
//!
//! The schema is the only hand-off between the two directions. For unedited
//! documents `encode(decode(P)) == P` whenever the codec re-renders `P`
//! identically (see `TranscodeWarning::NotByteStable`).

pub mod binary;
pub mod content;
pub mod document;
pub mod restore;

use std::fmt;

use crate::error::Result;
use crate::wire::{StructuralCodec, DEFAULT_MAX_DEPTH};

pub use binary::{binary_placeholder, parse_binary_placeholder, BinaryPolicy};
pub use content::to_json_content;
pub use document::DecodedDocument;
pub use restore::restore_types;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeOptions {
    pub binary_policy: BinaryPolicy,
    pub max_depth: usize,
    /// Re-render after inference and warn when bytes differ.
    pub verify_roundtrip: bool,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            binary_policy: BinaryPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            verify_roundtrip: true,
        }
    }
}

/// Non-fatal findings of a decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscodeWarning {
    /// Re-encoding the document will not reproduce the payload exactly
    /// (non-canonical varints, interleaved repeated fields, ...).
    NotByteStable { detail: String },
}

impl fmt::Display for TranscodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscodeWarning::NotByteStable { detail } => {
                write!(f, "re-encoding will not be byte-identical: {detail}")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecodeReport {
    pub document: DecodedDocument,
    pub warnings: Vec<TranscodeWarning>,
}

/// Infer structure from `payload` and wrap it as a JSON document.
pub fn decode<C: StructuralCodec + ?Sized>(
    payload: &[u8],
    codec: &C,
    opts: &TranscodeOptions,
) -> Result<DecodeReport> {
    let (msg, schema) = codec.infer(payload)?;
    tracing::debug!(fields = msg.len(), "inferred message structure");

    let mut warnings = Vec::new();
    if opts.verify_roundtrip {
        let detail = match codec.render(&msg, &schema) {
            Ok(bytes) if bytes == payload => None,
            Ok(bytes) => Some(format!(
                "payload is {} bytes, re-rendered form is {} bytes",
                payload.len(),
                bytes.len()
            )),
            Err(e) => Some(e.to_string()),
        };
        if let Some(detail) = detail {
            let w = TranscodeWarning::NotByteStable { detail };
            tracing::warn!("{w}");
            warnings.push(w);
        }
    }

    let document = DecodedDocument {
        message_content: to_json_content(&msg, &schema, opts.binary_policy),
        schema_definition: schema,
    };
    Ok(DecodeReport { document, warnings })
}

/// Restore types in `doc` and render it back to a bare payload.
pub fn encode<C: StructuralCodec + ?Sized>(doc: &DecodedDocument, codec: &C) -> Result<Vec<u8>> {
    let msg = restore_types(&doc.message_content, &doc.schema_definition)?;
    codec.render(&msg, &doc.schema_definition)
}
