//! pbsift core: envelope normalization and schema-tagged transcoding of
//! schema-less protobuf payloads.
//!
//! Pipeline:
//! - `envelope::normalize` strips incidental framing (HTTP headers, msgpack
//!   compression envelope, embedded gzip) down to a bare payload.
//! - `transcode::decode` infers structure and schema and wraps both in a
//!   JSON-safe `DecodedDocument`.
//! - `transcode::encode` restores wire types from the document's schema and
//!   renders the payload again.
//!
//! This crate does no filesystem or process work so it can be reused from the
//! CLI, tests, and other tools.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are denied here. All fallible paths surface
//! as `PbsiftError`/`Result` so malformed captures never crash the caller.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod envelope;
pub mod error;
pub mod lookup;
pub mod transcode;
pub mod wire;

/// Shared result type.
pub use error::{ErrorCode, PbsiftError, Result};
