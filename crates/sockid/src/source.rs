//! Where cached prefixes come from.

use std::io;
use std::path::{Path, PathBuf};

/// A read-once origin for the prefix.
///
/// The contents are trusted as-is: validation happens when the bootstrap
/// step writes them.
pub trait PrefixSource: Send + Sync {
    /// Human-readable location, used in error messages.
    fn location(&self) -> String;

    /// Reads the full prefix.
    fn read_prefix(&self) -> io::Result<String>;
}

/// A prefix stored in a plain-text file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PrefixSource for FileSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    /// Reads the file verbatim; no trimming. Non-UTF-8 contents fail with
    /// `InvalidData`.
    fn read_prefix(&self) -> io::Result<String> {
        std::fs::read_to_string(&self.path)
    }
}
