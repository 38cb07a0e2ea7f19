//! Atomic output files.

use std::io::Write;
use std::path::Path;

use pbsift_core::error::{PbsiftError, Result};
use tempfile::NamedTempFile;

/// Write `data` to `path` via a temp file in the same directory and a rename,
/// so a failed run never leaves a partial file behind.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let io_err = |e: std::io::Error| PbsiftError::Io(format!("write {}: {e}", path.display()));

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Keep an existing target's mode; new files get the usual 0644.
        let perms = std::fs::metadata(path)
            .map(|m| m.permissions())
            .unwrap_or_else(|_| std::fs::Permissions::from_mode(0o644));
        tmp.as_file().set_permissions(perms).map_err(io_err)?;
    }
    tmp.write_all(data).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
