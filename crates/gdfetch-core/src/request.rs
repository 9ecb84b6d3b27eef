//! Per-invocation request state.

use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};

/// What to fetch and where to put it. `attempt` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRequest {
    version: String,
    destination_directory: PathBuf,
    attempt: u32,
}

impl VersionRequest {
    /// The version ends up in file names, so it must be non-blank and free
    /// of path separators and control characters.
    pub fn new(version: &str, destination_directory: impl Into<PathBuf>) -> Result<Self> {
        let version = version.trim();
        if version.is_empty() {
            return Err(PipelineError::EmptyVersion);
        }
        if version == "."
            || version == ".."
            || version
                .chars()
                .any(|c| c == '/' || c == '\\' || c == '\0' || c.is_control())
        {
            return Err(PipelineError::InvalidVersion(version.to_string()));
        }
        Ok(Self {
            version: version.to_string(),
            destination_directory: destination_directory.into(),
            attempt: 1,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn destination_directory(&self) -> &Path {
        &self.destination_directory
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub(crate) fn next_attempt(&mut self) {
        self.attempt += 1;
    }
}
