//! `gdfetch flatten <dir>` – hoist nested files and prune empty directories.

use anyhow::{Context, Result};
use gdfetch_core::archive;
use std::path::Path;

pub fn run_flatten(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("{} is not a directory", dir.display());
    }
    let report = archive::flatten(dir).with_context(|| format!("flattening {}", dir.display()))?;
    println!(
        "Flattened {}: {} file(s) moved, {} empty director{} removed",
        dir.display(),
        report.moved,
        report.removed_dirs,
        if report.removed_dirs == 1 { "y" } else { "ies" }
    );
    Ok(())
}
