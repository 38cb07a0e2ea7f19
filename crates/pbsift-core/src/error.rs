//! Shared error type across pbsift crates.

use thiserror::Error;

/// Stable, machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// HTTP-looking input without a header terminator.
    Framing,
    /// A promised or detected gzip payload failed to inflate.
    Decompress,
    /// Payload is not a well-formed tagged structure.
    Decode,
    /// Content could not be rendered back to wire bytes.
    Encode,
    /// Content field without a schema entry.
    MissingSchema,
    /// Malformed document, config, or argument.
    BadInput,
    /// Input file absent.
    NotFound,
    /// Filesystem failure.
    Io,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in diagnostics and tests.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Framing => "FRAMING",
            ErrorCode::Decompress => "DECOMPRESS",
            ErrorCode::Decode => "DECODE",
            ErrorCode::Encode => "ENCODE",
            ErrorCode::MissingSchema => "MISSING_SCHEMA",
            ErrorCode::BadInput => "BAD_INPUT",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Io => "IO",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PbsiftError>;

/// Unified error type used by core and cli.
#[derive(Debug, Error)]
pub enum PbsiftError {
    #[error("framing: {0}")]
    Framing(String),
    #[error("decompress: {0}")]
    Decompress(String),
    #[error("decode: {0}")]
    Decode(String),
    #[error("encode: {0}")]
    Encode(String),
    #[error("no schema entry for field {0}")]
    MissingSchema(String),
    #[error("bad input: {0}")]
    BadInput(String),
    #[error("input file not found: {0}")]
    NotFound(String),
    #[error("io: {0}")]
    Io(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl PbsiftError {
    /// Map error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            PbsiftError::Framing(_) => ErrorCode::Framing,
            PbsiftError::Decompress(_) => ErrorCode::Decompress,
            PbsiftError::Decode(_) => ErrorCode::Decode,
            PbsiftError::Encode(_) => ErrorCode::Encode,
            PbsiftError::MissingSchema(_) => ErrorCode::MissingSchema,
            PbsiftError::BadInput(_) => ErrorCode::BadInput,
            PbsiftError::NotFound(_) => ErrorCode::NotFound,
            PbsiftError::Io(_) => ErrorCode::Io,
            PbsiftError::Internal(_) => ErrorCode::Internal,
        }
    }
}
