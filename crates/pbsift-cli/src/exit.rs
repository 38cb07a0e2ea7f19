//! Process exit codes.

use pbsift_core::error::ErrorCode;

/// Bad command line (clap exits with this code on its own).
pub const USAGE: u8 = 2;
pub const NOT_FOUND: u8 = 3;
/// Input that could not be unwrapped, decoded, or encoded.
pub const BAD_INPUT: u8 = 4;
pub const IO: u8 = 5;
pub const INTERNAL: u8 = 1;

pub fn exit_code(code: ErrorCode) -> u8 {
    match code {
        ErrorCode::NotFound => NOT_FOUND,
        ErrorCode::Framing
        | ErrorCode::Decompress
        | ErrorCode::Decode
        | ErrorCode::Encode
        | ErrorCode::MissingSchema
        | ErrorCode::BadInput => BAD_INPUT,
        ErrorCode::Io => IO,
        ErrorCode::Internal => INTERNAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct_per_class() {
        assert_eq!(exit_code(ErrorCode::NotFound), 3);
        assert_eq!(exit_code(ErrorCode::MissingSchema), 4);
        assert_eq!(exit_code(ErrorCode::Framing), 4);
        assert_eq!(exit_code(ErrorCode::Io), 5);
        assert_eq!(exit_code(ErrorCode::Internal), 1);
        assert_ne!(exit_code(ErrorCode::BadInput), USAGE);
    }
}
