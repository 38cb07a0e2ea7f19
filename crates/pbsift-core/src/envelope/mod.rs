//! Envelope normalization.
//!
//! Captured payloads arrive in several incidental wrappers depending on how
//! they were captured. Three layers are recognized, checked in this order and
//! each optional:
//! - HTTP response framing (status line + headers + blank line).
//! - A msgpack map advertising `IsZip` / `ZipDataLen`, followed by the payload.
//! - A gzip member anywhere in the stream (bytes before it are preamble).
//!
//! Absence of every wrapper is the common case and not an error.

pub mod gzip;
pub mod http;
pub mod msgpack;

use std::borrow::Cow;
use std::fmt;

use crate::error::{PbsiftError, Result};

/// Default cap on inflated payload size (64 MiB).
pub const DEFAULT_MAX_DECOMPRESSED_BYTES: u64 = 64 * 1024 * 1024;

/// Which layers `normalize` looks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub strip_http: bool,
    pub strip_msgpack_envelope: bool,
    pub scan_gzip: bool,
    pub max_decompressed_bytes: u64,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            strip_http: true,
            strip_msgpack_envelope: true,
            scan_gzip: true,
            max_decompressed_bytes: DEFAULT_MAX_DECOMPRESSED_BYTES,
        }
    }
}

/// A wrapper layer that was detected and removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layer {
    Http,
    Envelope {
        is_zip: bool,
        declared_len: Option<u64>,
    },
    Gzip {
        offset: usize,
    },
}

/// Non-fatal integrity findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Envelope `ZipDataLen` disagrees with the bytes that follow it.
    LengthMismatch { declared: u64, actual: usize },
    /// Envelope `ZipDataLen` is set but is not a byte count.
    InvalidLength { raw: String, actual: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::LengthMismatch { declared, actual } => write!(
                f,
                "envelope length={declared} but {actual} bytes remain"
            ),
            Warning::InvalidLength { raw, actual } => write!(
                f,
                "envelope length={raw} is not a byte count, using the {actual} bytes that remain"
            ),
        }
    }
}

/// Result of `normalize`.
#[derive(Debug, Clone)]
pub struct Normalized {
    /// Bare serialized payload.
    pub payload: Vec<u8>,
    /// Layers removed, outermost first.
    pub layers: Vec<Layer>,
    pub warnings: Vec<Warning>,
}

/// Strip incidental framing from `raw` and return the bare payload.
pub fn normalize(raw: &[u8], opts: &NormalizeOptions) -> Result<Normalized> {
    let mut layers = Vec::new();
    let mut warnings = Vec::new();
    let mut data: Cow<'_, [u8]> = Cow::Borrowed(raw);

    // 1) HTTP response framing
    if opts.strip_http {
        if let Some(body) = http::strip_http(raw)? {
            tracing::info!(body_len = body.len(), "detected HTTP response framing, stripping headers");
            layers.push(Layer::Http);
            data = Cow::Borrowed(body);
        }
    }

    // 2) msgpack envelope
    if opts.strip_msgpack_envelope {
        if let Some((header, offset)) = msgpack::read_envelope(&data) {
            let payload = data.get(offset..).unwrap_or_default();
            tracing::info!(
                is_zip = header.is_zip,
                declared_len = ?header.declared_len,
                "detected msgpack envelope, stripping"
            );

            if let Some(declared) = header.declared_len {
                if declared != payload.len() as u64 {
                    let w = Warning::LengthMismatch {
                        declared,
                        actual: payload.len(),
                    };
                    tracing::warn!("{w}");
                    warnings.push(w);
                }
            }
            if let Some(raw) = header.invalid_len {
                let w = Warning::InvalidLength {
                    raw,
                    actual: payload.len(),
                };
                tracing::warn!("{w}");
                warnings.push(w);
            }

            let payload = if header.is_zip {
                gzip::gunzip(payload, opts.max_decompressed_bytes).map_err(|e| {
                    PbsiftError::Decompress(format!(
                        "envelope indicates zip but failed to decompress: {}",
                        detail(e)
                    ))
                })?
            } else {
                payload.to_vec()
            };

            layers.push(Layer::Envelope {
                is_zip: header.is_zip,
                declared_len: header.declared_len,
            });
            data = Cow::Owned(payload);
        }
    }

    // 3) embedded gzip
    if opts.scan_gzip {
        if let Some(offset) = gzip::find_gzip(&data) {
            tracing::info!(offset, "detected gzip payload, decompressing");
            let member = data.get(offset..).unwrap_or_default();
            let inflated = gzip::gunzip(member, opts.max_decompressed_bytes).map_err(|e| {
                PbsiftError::Decompress(format!(
                    "gzip found at offset {offset} but failed to decompress: {}",
                    detail(e)
                ))
            })?;
            layers.push(Layer::Gzip { offset });
            data = Cow::Owned(inflated);
        }
    }

    Ok(Normalized {
        payload: data.into_owned(),
        layers,
        warnings,
    })
}

fn detail(e: PbsiftError) -> String {
    match e {
        PbsiftError::Decompress(msg) => msg,
        other => other.to_string(),
    }
}
