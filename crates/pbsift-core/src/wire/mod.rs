//! Wire-format capability: structural inference and rendering.
//!
//! The transcoder only talks to `StructuralCodec`; `BlackboxCodec` is the
//! protobuf implementation, inferring a schema from bytes with no prior
//! definition.

mod infer;
pub mod render;
pub mod schema;
pub mod value;
pub mod varint;

use bytes::Bytes;

use crate::error::Result;

pub use schema::{FieldDef, Schema, WireKind};
pub use value::{Message, Value};

/// Default nesting limit for sub-message inference.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Turns untyped bytes into a typed tree and back.
pub trait StructuralCodec {
    /// Infer content and schema from a bare payload.
    fn infer(&self, payload: &[u8]) -> Result<(Message, Schema)>;
    /// Render content back to bytes, using `schema` for every wire type.
    fn render(&self, msg: &Message, schema: &Schema) -> Result<Vec<u8>>;
}

/// Schema-less protobuf codec.
#[derive(Debug, Clone, Copy)]
pub struct BlackboxCodec {
    max_depth: usize,
}

impl BlackboxCodec {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for BlackboxCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl StructuralCodec for BlackboxCodec {
    fn infer(&self, payload: &[u8]) -> Result<(Message, Schema)> {
        infer::Inferrer {
            max_depth: self.max_depth,
        }
        .infer(Bytes::copy_from_slice(payload))
    }

    fn render(&self, msg: &Message, schema: &Schema) -> Result<Vec<u8>> {
        render::render_message(msg, schema)
    }
}
