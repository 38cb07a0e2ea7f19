use std::path::{Path, PathBuf};

use pbsift_core::error::Result;
use pbsift_core::transcode::{self, DecodedDocument};
use pbsift_core::wire::BlackboxCodec;

use super::read_input;
use crate::config::PbsiftConfig;
use crate::output::write_atomic;

/// `<input stem>.bin` next to the input.
pub fn default_output(input: &Path) -> PathBuf {
    input.with_extension("bin")
}

/// JSON document on disk -> bare payload on disk. Returns the output path.
pub fn run(input: &Path, output: Option<&Path>, cfg: &PbsiftConfig) -> Result<PathBuf> {
    let data = read_input(input)?;
    let doc = DecodedDocument::from_json_slice(&data)?;

    let codec = BlackboxCodec::new(cfg.transcode.max_depth);
    let payload = transcode::encode(&doc, &codec)?;

    let output = output.map_or_else(|| default_output(input), Path::to_path_buf);
    write_atomic(&output, &payload)?;
    tracing::info!(output = %output.display(), bytes = payload.len(), "wrote encoded payload");
    Ok(output)
}
