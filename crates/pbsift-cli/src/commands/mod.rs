//! Subcommand implementations. Each reads its input file, runs the core
//! pipeline and writes (or returns) the result.

pub mod decode;
pub mod encode;
pub mod lookup;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use pbsift_core::error::{PbsiftError, Result};

pub(crate) fn read_input(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PbsiftError::NotFound(path.display().to_string()),
        _ => PbsiftError::Io(format!("read {}: {e}", path.display())),
    })
}
