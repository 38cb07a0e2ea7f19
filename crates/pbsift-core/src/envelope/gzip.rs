//! Embedded gzip payloads.

use std::io::Read;

use flate2::read::MultiGzDecoder;

use crate::error::{PbsiftError, Result};

/// Gzip member header: ID1, ID2, CM=deflate.
pub const GZIP_MAGIC: [u8; 3] = [0x1f, 0x8b, 0x08];

/// Offset of the first gzip magic sequence in `data`.
pub fn find_gzip(data: &[u8]) -> Option<usize> {
    super::http::find(data, &GZIP_MAGIC)
}

/// Inflate one or more concatenated gzip members, refusing to produce more
/// than `limit` bytes.
pub fn gunzip(data: &[u8], limit: u64) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    MultiGzDecoder::new(data)
        .take(limit.saturating_add(1))
        .read_to_end(&mut out)
        .map_err(|e| PbsiftError::Decompress(e.to_string()))?;

    if out.len() as u64 > limit {
        return Err(PbsiftError::Decompress(format!(
            "decompressed payload exceeds {limit} bytes"
        )));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::*;

    fn gz(data: &[u8]) -> Vec<u8> {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn finds_magic_after_preamble() {
        let mut blob = b"junk!".to_vec();
        blob.extend(gz(b"hello"));
        assert_eq!(find_gzip(&blob), Some(5));
    }

    #[test]
    fn inflates_concatenated_members() {
        let mut blob = gz(b"hel");
        blob.extend(gz(b"lo"));
        assert_eq!(gunzip(&blob, 1024).unwrap(), b"hello");
    }

    #[test]
    fn enforces_output_limit() {
        let blob = gz(&[0u8; 4096]);
        let err = gunzip(&blob, 100).unwrap_err();
        assert_eq!(err.code().as_str(), "DECOMPRESS");
    }

    #[test]
    fn corrupt_stream_is_error() {
        let err = gunzip(&[0x1f, 0x8b, 0x08, 0x00, 0xff], 1024).unwrap_err();
        assert_eq!(err.code().as_str(), "DECOMPRESS");
    }
}
