//! Msgpack compression-flag envelope.
//!
//! Some captures start with a msgpack map advertising whether the payload is
//! zipped and how long it is; the payload follows the map directly.

use rmpv::Value;

const KEY_IS_ZIP: &str = "IsZip";
const KEY_ZIP_DATA_LEN: &str = "ZipDataLen";

/// The header is a flat map; anything nested deeper is not an envelope.
const MAX_HEADER_DEPTH: usize = 8;

/// Parsed envelope header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeHeader {
    /// Payload is gzip-compressed.
    pub is_zip: bool,
    /// Declared payload length (`None` when zero or not an integer).
    pub declared_len: Option<u64>,
    /// A truthy `ZipDataLen` that is not a length, rendered as msgpack text.
    pub invalid_len: Option<String>,
}

/// Try to read an envelope header from the start of `blob`.
///
/// Returns the header and the offset where the payload starts. Anything that
/// does not parse as a msgpack map exposing both keys yields `None`.
pub fn read_envelope(blob: &[u8]) -> Option<(EnvelopeHeader, usize)> {
    // Only a map can expose the envelope keys.
    if !blob.first().is_some_and(|b| is_map_marker(*b)) {
        return None;
    }

    let mut rd = blob;
    let value = rmpv::decode::read_value_with_max_depth(&mut rd, MAX_HEADER_DEPTH).ok()?;
    let consumed = blob.len() - rd.len();

    let Value::Map(entries) = value else {
        return None;
    };

    let is_zip = entry(&entries, KEY_IS_ZIP)?;
    let zip_len = entry(&entries, KEY_ZIP_DATA_LEN)?;

    let declared_len = zip_len.as_u64().filter(|n| *n != 0);
    let invalid_len = (zip_len.as_u64().is_none() && truthy(zip_len)).then(|| zip_len.to_string());
    let header = EnvelopeHeader {
        is_zip: truthy(is_zip),
        declared_len,
        invalid_len,
    };
    Some((header, consumed))
}

fn is_map_marker(b: u8) -> bool {
    // fixmap, map16, map32
    (0x80..=0x8f).contains(&b) || b == 0xde || b == 0xdf
}

fn entry<'a>(entries: &'a [(Value, Value)], key: &str) -> Option<&'a Value> {
    entries
        .iter()
        .find(|(k, _)| k.as_str() == Some(key))
        .map(|(_, v)| v)
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Nil => false,
        Value::Boolean(b) => *b,
        Value::Integer(i) => i.as_u64() != Some(0),
        Value::F32(f) => *f != 0.0,
        Value::F64(f) => *f != 0.0,
        Value::String(s) => !s.as_bytes().is_empty(),
        Value::Binary(b) => !b.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Map(m) => !m.is_empty(),
        Value::Ext(_, data) => !data.is_empty(),
    }
}
