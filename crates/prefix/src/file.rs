//! Persisting prefixes and producing best-effort defaults.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use crate::UNSAFE_TAG;
use crate::error::PrefixError;
use crate::generator::PrefixGenerator;

/// Generates a prefix (honouring `POD_NAME`) and writes it to `path`.
///
/// This is the bootstrap step: it should run once, before any consumer
/// starts, against a well-known location. The containing directory must
/// already exist.
pub fn write_prefix_file(path: impl AsRef<Path>) -> Result<String, PrefixError> {
    PrefixGenerator::from_env().write_to(path.as_ref())
}

/// Returns a prefix for the local system tagged `unsafe`, honouring
/// `POD_NAME`.
///
/// Intended as a default that is better than the empty string but not
/// guaranteed to be consistent. Never fails and always contains `unsafe`.
pub fn unsafe_fallback() -> String {
    PrefixGenerator::from_env().unsafe_fallback()
}

impl PrefixGenerator {
    /// Generates a prefix without extra tags and writes it, read-only and
    /// without a trailing newline, to `path`. Returns the written prefix.
    pub fn write_to(&self, path: &Path) -> Result<String, PrefixError> {
        let prefix = self.generate(&[])?;
        persist(path, &prefix).map_err(|source| PrefixError::DestinationUnwritable {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), %prefix, "wrote prefix file");
        Ok(prefix)
    }

    /// Generates a prefix tagged `unsafe`, discarding any error.
    ///
    /// Failure placeholders get the tag appended too, so the result always
    /// contains `unsafe`.
    pub fn unsafe_fallback(&self) -> String {
        self.generate(&[UNSAFE_TAG])
            .unwrap_or_else(|err| format!("{}_{UNSAFE_TAG}", err.placeholder()))
    }
}

fn persist(path: &Path, prefix: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o444);
    }

    let file = options.open(path)?;
    let file = write_or_remove(path, file, prefix.as_bytes())?;

    // A pre-existing file keeps its old mode through `open`.
    let mut perms = file.metadata()?.permissions();
    perms.set_readonly(true);
    file.set_permissions(perms)?;
    Ok(())
}

/// Writes `contents` through `writer`. On failure the writer is closed and
/// `path` removed, so no partial prefix is left behind.
fn write_or_remove<W: Write>(path: &Path, mut writer: W, contents: &[u8]) -> io::Result<W> {
    if let Err(err) = writer.write_all(contents) {
        drop(writer);
        // The write error is the one worth reporting.
        let _ = std::fs::remove_file(path);
        return Err(err);
    }
    Ok(writer)
}
