//! Whole-file reads of the access log.
//! The endpoint appends concurrently; no locking is attempted.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct AccessLog {
    path: PathBuf,
}

impl AccessLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the full current contents. `Ok(None)` when the file does not exist.
    /// Invalid UTF-8 is replaced, so a damaged line simply fails to parse later.
    pub fn read(&self) -> std::io::Result<Option<String>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Newline-terminated, non-blank lines of `content`. An unterminated last
    /// line is still being written and is held back for a later read.
    pub fn complete_lines(content: &str) -> Vec<&str> {
        let complete = match content.rfind('\n') {
            Some(end) => &content[..end],
            None => return Vec::new(),
        };
        complete
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .filter(|l| !l.trim().is_empty())
            .collect()
    }
}
