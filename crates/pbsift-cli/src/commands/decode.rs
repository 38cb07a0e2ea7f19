use std::path::{Path, PathBuf};

use pbsift_core::envelope::{normalize, Warning};
use pbsift_core::error::Result;
use pbsift_core::transcode::{self, TranscodeWarning};
use pbsift_core::wire::BlackboxCodec;

use super::read_input;
use crate::config::PbsiftConfig;
use crate::output::write_atomic;

/// What a successful decode produced.
#[derive(Debug)]
pub struct DecodeOutcome {
    pub output: PathBuf,
    pub envelope_warnings: Vec<Warning>,
    pub transcode_warnings: Vec<TranscodeWarning>,
}

/// `<input>.json` next to the input.
pub fn default_output(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".json");
    PathBuf::from(name)
}

/// Raw capture -> bare payload -> JSON document on disk.
pub fn run(input: &Path, output: Option<&Path>, cfg: &PbsiftConfig) -> Result<DecodeOutcome> {
    let raw = read_input(input)?;
    tracing::info!(input = %input.display(), bytes = raw.len(), "decoding");

    let normalized = normalize(&raw, &cfg.normalize_options())?;
    let codec = BlackboxCodec::new(cfg.transcode.max_depth);
    let report = transcode::decode(&normalized.payload, &codec, &cfg.transcode_options())?;
    let json = report.document.to_json_pretty(cfg.output.indent)?;

    let output = output.map_or_else(|| default_output(input), Path::to_path_buf);
    write_atomic(&output, &json)?;
    tracing::info!(output = %output.display(), "wrote decoded document");

    Ok(DecodeOutcome {
        output,
        envelope_warnings: normalized.warnings,
        transcode_warnings: report.warnings,
    })
}
