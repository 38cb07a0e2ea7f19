use serde::Deserialize;
use tracing::level_filters::LevelFilter;

use pbsift_core::envelope::{NormalizeOptions, DEFAULT_MAX_DECOMPRESSED_BYTES};
use pbsift_core::error::{PbsiftError, Result};
use pbsift_core::transcode::{BinaryPolicy, TranscodeOptions};
use pbsift_core::wire::DEFAULT_MAX_DEPTH;

const MIN_DECOMPRESSED_BYTES: u64 = 1024;
const MAX_DECOMPRESSED_BYTES: u64 = 1024 * 1024 * 1024;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PbsiftConfig {
    pub version: u32,

    #[serde(default)]
    pub log: LogSection,

    #[serde(default)]
    pub normalize: NormalizeSection,

    #[serde(default)]
    pub transcode: TranscodeSection,

    #[serde(default)]
    pub output: OutputSection,
}

impl Default for PbsiftConfig {
    fn default() -> Self {
        Self {
            version: 1,
            log: LogSection::default(),
            normalize: NormalizeSection::default(),
            transcode: TranscodeSection::default(),
            output: OutputSection::default(),
        }
    }
}

impl PbsiftConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PbsiftError::BadInput(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.log.validate()?;
        self.normalize.validate()?;
        self.transcode.validate()?;
        self.output.validate()?;

        Ok(())
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            strip_http: self.normalize.strip_http,
            strip_msgpack_envelope: self.normalize.strip_msgpack_envelope,
            scan_gzip: self.normalize.scan_gzip,
            max_decompressed_bytes: self.normalize.max_decompressed_bytes,
        }
    }

    pub fn transcode_options(&self) -> TranscodeOptions {
        TranscodeOptions {
            binary_policy: self.transcode.binary_policy,
            max_depth: self.transcode.max_depth,
            verify_roundtrip: self.transcode.verify_roundtrip,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LogSection {
    pub fn validate(&self) -> Result<()> {
        self.level.parse::<LevelFilter>().map_err(|_| {
            PbsiftError::BadInput(format!(
                "log.level must be one of off, error, warn, info, debug, trace (got '{}')",
                self.level
            ))
        })?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NormalizeSection {
    #[serde(default = "default_true")]
    pub strip_http: bool,

    #[serde(default = "default_true")]
    pub strip_msgpack_envelope: bool,

    #[serde(default = "default_true")]
    pub scan_gzip: bool,

    #[serde(default = "default_max_decompressed_bytes")]
    pub max_decompressed_bytes: u64,
}

impl Default for NormalizeSection {
    fn default() -> Self {
        Self {
            strip_http: true,
            strip_msgpack_envelope: true,
            scan_gzip: true,
            max_decompressed_bytes: default_max_decompressed_bytes(),
        }
    }
}

impl NormalizeSection {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_DECOMPRESSED_BYTES..=MAX_DECOMPRESSED_BYTES).contains(&self.max_decompressed_bytes)
        {
            return Err(PbsiftError::BadInput(format!(
                "normalize.max_decompressed_bytes must be between {MIN_DECOMPRESSED_BYTES} and {MAX_DECOMPRESSED_BYTES}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranscodeSection {
    #[serde(default)]
    pub binary_policy: BinaryPolicy,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default = "default_true")]
    pub verify_roundtrip: bool,
}

impl Default for TranscodeSection {
    fn default() -> Self {
        Self {
            binary_policy: BinaryPolicy::default(),
            max_depth: default_max_depth(),
            verify_roundtrip: true,
        }
    }
}

impl TranscodeSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=256).contains(&self.max_depth) {
            return Err(PbsiftError::BadInput(
                "transcode.max_depth must be between 1 and 256".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Spaces per level in decoded JSON; 0 writes compact JSON.
    #[serde(default = "default_indent")]
    pub indent: usize,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            indent: default_indent(),
        }
    }
}

impl OutputSection {
    pub fn validate(&self) -> Result<()> {
        if self.indent > 8 {
            return Err(PbsiftError::BadInput(
                "output.indent must be between 0 and 8".into(),
            ));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".into()
}
fn default_max_decompressed_bytes() -> u64 {
    DEFAULT_MAX_DECOMPRESSED_BYTES
}
fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}
fn default_indent() -> usize {
    4
}
