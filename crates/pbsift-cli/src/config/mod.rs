//! CLI config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use pbsift_core::error::{PbsiftError, Result};

pub use schema::{LogSection, NormalizeSection, OutputSection, PbsiftConfig, TranscodeSection};

pub fn load_from_file(path: &Path) -> Result<PbsiftConfig> {
    let s = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PbsiftError::NotFound(path.display().to_string()),
        _ => PbsiftError::Io(format!("read config {} failed: {e}", path.display())),
    })?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<PbsiftConfig> {
    let cfg: PbsiftConfig = serde_yaml::from_str(s)
        .map_err(|e| PbsiftError::BadInput(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
