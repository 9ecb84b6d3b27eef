//! Flatten an extracted tree: hoist every nested file to the root, then prune
//! directories left empty.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{PipelineError, Result};

/// What a flatten pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlattenReport {
    /// Files moved up to the root.
    pub moved: usize,
    /// Empty subdirectories removed.
    pub removed_dirs: usize,
}

fn walk_err(root: &Path) -> impl Fn(walkdir::Error) -> PipelineError + '_ {
    move |source| PipelineError::Walk {
        root: root.to_path_buf(),
        source,
    }
}

/// Move every file below `root`'s first level to `root/<file name>`.
///
/// Files are visited in path order; on a name collision the later file
/// replaces the earlier one. A file whose target name is taken by a
/// directory waits for the next pass. After each pass, subdirectories that
/// are empty are removed deepest-first, so a non-empty directory is never
/// deleted and no empty one survives. When a pass moves nothing but files
/// are still blocked (`data/data`, or `a/b` next to `b/a`), those files are
/// parked under unique names in `root`, the emptied directories are pruned,
/// and the files then take their own names. Running it again on the result
/// changes nothing.
pub fn flatten(root: &Path) -> Result<FlattenReport> {
    let mut report = FlattenReport::default();

    loop {
        let (moved, blocked) = hoist_nested_files(root)?;
        report.moved += moved;
        report.removed_dirs += prune_empty_dirs(root)?;
        if blocked.is_empty() {
            break;
        }
        if moved == 0 {
            let parked = park_blocked(root, blocked)?;
            report.removed_dirs += prune_empty_dirs(root)?;
            report.moved += unpark(root, parked)?;
            break;
        }
    }

    tracing::info!(
        "flattened {}: {} file(s) moved, {} empty dir(s) removed",
        root.display(),
        report.moved,
        report.removed_dirs
    );
    Ok(report)
}

/// One hoisting pass. Returns the number of files moved and the files left
/// in place because their target is a directory.
fn hoist_nested_files(root: &Path) -> Result<(usize, Vec<PathBuf>)> {
    let mut nested: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(root).min_depth(2).sort_by_file_name() {
        let entry = entry.map_err(walk_err(root))?;
        if !entry.file_type().is_dir() {
            nested.push(entry.into_path());
        }
    }

    let mut moved = 0;
    let mut blocked = Vec::new();
    for path in nested {
        let Some(name) = path.file_name() else { continue };
        let target = root.join(name);
        if target.is_dir() {
            tracing::debug!(
                "not moving {} yet: {} is a directory",
                path.display(),
                target.display()
            );
            blocked.push(path);
            continue;
        }
        replace_file(&path, &target)?;
        moved += 1;
    }
    Ok((moved, blocked))
}

/// Rename `from` to `to`, removing a file already at `to`.
fn replace_file(from: &Path, to: &Path) -> Result<()> {
    if to.symlink_metadata().is_ok() {
        fs::remove_file(to).map_err(PipelineError::io("remove", to))?;
    }
    fs::rename(from, to).map_err(PipelineError::io("move", from))?;
    tracing::debug!("moved {} -> {}", from.display(), to.display());
    Ok(())
}

/// Move each blocked file to an unused `.gdfetch-flatten-<n>` name in `root`.
/// Returns (parked path, final name) pairs in the original path order.
fn park_blocked(root: &Path, blocked: Vec<PathBuf>) -> Result<Vec<(PathBuf, OsString)>> {
    let mut parked = Vec::with_capacity(blocked.len());
    let mut counter = 0usize;
    for path in blocked {
        let Some(name) = path.file_name().map(|n| n.to_os_string()) else { continue };
        let slot = loop {
            let candidate = root.join(format!(".gdfetch-flatten-{}", counter));
            counter += 1;
            if candidate.symlink_metadata().is_err() {
                break candidate;
            }
        };
        fs::rename(&path, &slot).map_err(PipelineError::io("move", &path))?;
        tracing::debug!("parked {} as {}", path.display(), slot.display());
        parked.push((slot, name));
    }
    Ok(parked)
}

fn unpark(root: &Path, parked: Vec<(PathBuf, OsString)>) -> Result<usize> {
    let count = parked.len();
    for (slot, name) in parked {
        replace_file(&slot, &root.join(name))?;
    }
    Ok(count)
}

/// Remove empty directories under `root` (never `root` itself), deepest first.
fn prune_empty_dirs(root: &Path) -> Result<usize> {
    let mut dirs: Vec<(usize, PathBuf)> = Vec::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.map_err(walk_err(root))?;
        if entry.file_type().is_dir() {
            dirs.push((entry.depth(), entry.into_path()));
        }
    }
    dirs.sort_by(|a, b| b.0.cmp(&a.0));

    let mut removed = 0;
    for (_, dir) in dirs {
        let is_empty = fs::read_dir(&dir)
            .map_err(PipelineError::io("read directory", &dir))?
            .next()
            .is_none();
        if is_empty {
            fs::remove_dir(&dir).map_err(PipelineError::io("remove directory", &dir))?;
            removed += 1;
        }
    }
    Ok(removed)
}
