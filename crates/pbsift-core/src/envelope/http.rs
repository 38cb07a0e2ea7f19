//! Raw HTTP response framing.

use crate::error::{PbsiftError, Result};

/// Captures starting with this literal carry a status line and headers.
pub const HTTP_PREFIX: &[u8] = b"HTTP/";

const CRLF_TERMINATOR: &[u8] = b"\r\n\r\n";
const LF_TERMINATOR: &[u8] = b"\n\n";

/// Strip status line and headers from an HTTP-framed capture.
///
/// Returns `Ok(None)` when `raw` is not HTTP-framed. A `\r\n\r\n` terminator
/// anywhere in the input wins over an earlier bare `\n\n`.
pub fn strip_http(raw: &[u8]) -> Result<Option<&[u8]>> {
    if !raw.starts_with(HTTP_PREFIX) {
        return Ok(None);
    }

    for terminator in [CRLF_TERMINATOR, LF_TERMINATOR] {
        if let Some(pos) = find(raw, terminator) {
            return Ok(raw.get(pos + terminator.len()..));
        }
    }

    Err(PbsiftError::Framing(
        "HTTP-like input but no header terminator found".into(),
    ))
}

pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
