//! Tagged placeholder for byte data that cannot travel as JSON text.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::error::{PbsiftError, Result};

pub const PLACEHOLDER_PREFIX: &str = "<BINARY_BASE64: ";
pub const PLACEHOLDER_SUFFIX: &str = ">";

/// How `bytes` values are rendered as JSON strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryPolicy {
    /// Valid UTF-8 as plain text, everything else tagged.
    #[default]
    Utf8First,
    /// Every `bytes` value tagged.
    AlwaysBase64,
}

/// `<BINARY_BASE64: ...>` for `data`.
pub fn binary_placeholder(data: &[u8]) -> String {
    format!("{PLACEHOLDER_PREFIX}{}{PLACEHOLDER_SUFFIX}", BASE64.encode(data))
}

/// Decode a placeholder string.
///
/// `None` when `s` does not start with the placeholder prefix; an error when it
/// does but is not a well-formed placeholder.
pub fn parse_binary_placeholder(s: &str) -> Option<Result<Vec<u8>>> {
    let rest = s.strip_prefix(PLACEHOLDER_PREFIX)?;
    let Some(inner) = rest.strip_suffix(PLACEHOLDER_SUFFIX) else {
        return Some(Err(PbsiftError::Encode(
            "binary placeholder is missing its closing '>'".into(),
        )));
    };
    Some(
        BASE64
            .decode(inner)
            .map_err(|e| PbsiftError::Encode(format!("binary placeholder has invalid base64: {e}"))),
    )
}

/// JSON string for a `bytes` value under `policy`.
///
/// Text that itself starts with the placeholder prefix is always tagged so it
/// cannot be mistaken for a placeholder on the way back.
pub fn render_bytes(data: &[u8], policy: BinaryPolicy) -> String {
    if policy == BinaryPolicy::Utf8First {
        if let Ok(text) = std::str::from_utf8(data) {
            if !text.starts_with(PLACEHOLDER_PREFIX) {
                return text.to_owned();
            }
        }
    }
    binary_placeholder(data)
}

/// Bytes for a JSON string found under a `bytes` schema entry.
pub fn restore_bytes(s: &str) -> Result<Vec<u8>> {
    match parse_binary_placeholder(s) {
        Some(decoded) => decoded,
        None => Ok(s.as_bytes().to_vec()),
    }
}
