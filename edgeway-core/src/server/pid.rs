use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn write_pid(path: &Path) -> Result<()> {
    fs::write(path, std::process::id().to_string())
        .with_context(|| format!("failed to write pid file {}", path.display()))
}

/// Best-effort; a missing file is not an error at shutdown.
pub fn remove_pid(path: &Path) {
    if let Err(e) = fs::remove_file(path)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        tracing::warn!(error = %e, pid_file = %path.display(), "failed to remove pid file");
    }
}
