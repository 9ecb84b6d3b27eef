//! Executable locator.
//!
//! Deep scan for trees we did not flatten; shallow scan plus canonical
//! rename for flattened extraction directories.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{PipelineError, Result};

/// True if `path` has the executable extension (ASCII case-insensitive).
pub fn has_executable_extension(path: &Path, executable_extension: &str) -> bool {
    let wanted = executable_extension.trim_start_matches('.');
    !wanted.is_empty()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(wanted))
}

/// Every executable anywhere under `dir`, sorted by path.
pub fn find_executables_deep(dir: &Path, executable_extension: &str) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| PipelineError::Walk {
            root: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && has_executable_extension(entry.path(), executable_extension) {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

/// Executables directly inside `dir`, sorted by path.
pub fn find_executables_shallow(dir: &Path, executable_extension: &str) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir).map_err(PipelineError::io("read directory", dir))? {
        let entry = entry.map_err(PipelineError::io("read directory", dir))?;
        let path = entry.path();
        if path.is_file() && has_executable_extension(&path, executable_extension) {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// Result of [`locate_and_rename`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocateOutcome {
    /// Exactly one executable; it now lives at `to` (`from == to` when it
    /// already had the canonical name).
    Renamed { from: PathBuf, to: PathBuf },
    /// Zero or several executables; nothing was touched.
    Ambiguous { found: Vec<PathBuf> },
}

/// Shallow scan of `dir`; rename a single executable to `canonical_name`.
pub fn locate_and_rename(
    dir: &Path,
    canonical_name: &str,
    executable_extension: &str,
) -> Result<LocateOutcome> {
    let mut found = find_executables_shallow(dir, executable_extension)?;
    if found.len() != 1 {
        tracing::info!(
            "{} executable(s) in {}; leaving names unchanged",
            found.len(),
            dir.display()
        );
        return Ok(LocateOutcome::Ambiguous { found });
    }

    let from = found.remove(0);
    let to = dir.join(canonical_name);
    if from != to {
        fs::rename(&from, &to).map_err(PipelineError::io("rename", &from))?;
        tracing::info!("renamed {} -> {}", from.display(), to.display());
    }
    Ok(LocateOutcome::Renamed { from, to })
}
