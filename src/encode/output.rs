use std::fs::OpenOptions;
use std::io::{ErrorKind, Write as _};
use std::path::Path;

use crate::foundation::error::{InvertError, InvertResult};

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> InvertResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Write encoded bytes verbatim to `path`, returning the number of bytes written.
#[tracing::instrument(skip(bytes), fields(bytes = bytes.len()))]
pub fn write_output(path: &Path, bytes: &[u8], overwrite: bool) -> InvertResult<u64> {
    ensure_parent_dir(path)?;
    let write_err = |e: std::io::Error| {
        InvertError::write(format!("could not write '{}': {e}", path.display()))
    };

    if overwrite {
        std::fs::write(path, bytes).map_err(write_err)?;
    } else {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => InvertError::write(format!(
                    "output file '{}' already exists",
                    path.display()
                )),
                _ => write_err(e),
            })?;
        file.write_all(bytes).map_err(write_err)?;
    }
    tracing::info!(path = %path.display(), "wrote output");
    Ok(bytes.len() as u64)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/output.rs"]
mod tests;
