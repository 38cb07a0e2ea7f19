//! Varint, tag, and zigzag primitives (panic-free).

use bytes::{Buf, BufMut};

/// Wire type: base-128 varint.
pub const WIRE_VARINT: u8 = 0;
/// Wire type: 64-bit little-endian.
pub const WIRE_FIXED64: u8 = 1;
/// Wire type: length-delimited.
pub const WIRE_LEN: u8 = 2;
/// Wire type: 32-bit little-endian.
pub const WIRE_FIXED32: u8 = 5;

/// Largest legal field number (2^29 - 1).
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// Encode `value` as a minimal varint.
pub fn encode_varint<B: BufMut>(mut value: u64, buf: &mut B) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.put_u8(byte);
        if value == 0 {
            break;
        }
    }
}

/// Decode a varint; `None` on truncation or overflow past 64 bits.
pub fn decode_varint<B: Buf>(buf: &mut B) -> Option<u64> {
    let mut result: u64 = 0;
    let mut shift = 0u32;

    loop {
        if !buf.has_remaining() {
            return None;
        }
        let byte = buf.get_u8();
        if shift == 63 && byte > 1 {
            return None;
        }

        result |= u64::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Some(result);
        }
        shift += 7;
        if shift > 63 {
            return None;
        }
    }
}

/// Encode a field tag.
pub fn encode_tag<B: BufMut>(field_number: u32, wire_type: u8, buf: &mut B) {
    encode_varint((u64::from(field_number) << 3) | u64::from(wire_type), buf);
}

/// Decode a field tag into (field_number, wire_type).
///
/// Field number 0 and numbers above `MAX_FIELD_NUMBER` are rejected.
pub fn decode_tag<B: Buf>(buf: &mut B) -> Option<(u32, u8)> {
    let tag = decode_varint(buf)?;
    let field_number = u32::try_from(tag >> 3).ok()?;
    if field_number == 0 || field_number > MAX_FIELD_NUMBER {
        return None;
    }
    Some((field_number, (tag & 0x07) as u8))
}

pub fn zigzag_encode(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

pub fn zigzag_decode(v: u64) -> i64 {
    ((v >> 1) as i64) ^ -((v & 1) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_known_encodings() {
        let mut out = Vec::new();
        encode_varint(150, &mut out);
        assert_eq!(out, [0x96, 0x01]);

        let mut out = Vec::new();
        encode_varint(u64::MAX, &mut out);
        assert_eq!(out.len(), 10);
        assert_eq!(decode_varint(&mut out.as_slice()), Some(u64::MAX));
    }

    #[test]
    fn varint_truncated_and_overflow() {
        assert_eq!(decode_varint(&mut &[0x96][..]), None);
        let overlong = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x02];
        assert_eq!(decode_varint(&mut &overlong[..]), None);
    }

    #[test]
    fn tag_rejects_field_zero() {
        assert_eq!(decode_tag(&mut &[0x00][..]), None);
        assert_eq!(decode_tag(&mut &[0x08][..]), Some((1, WIRE_VARINT)));
        assert_eq!(decode_tag(&mut &[0x12][..]), Some((2, WIRE_LEN)));
    }

    #[test]
    fn zigzag_pairs() {
        for (plain, zz) in [(0i64, 0u64), (-1, 1), (1, 2), (-2, 3), (i64::MIN, u64::MAX)] {
            assert_eq!(zigzag_encode(plain), zz);
            assert_eq!(zigzag_decode(zz), plain);
        }
    }
}
