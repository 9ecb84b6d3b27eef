//! `gdfetch locate <dir>` – list executables, optionally renaming a single match.

use anyhow::{Context, Result};
use gdfetch_core::config::GdfetchConfig;
use gdfetch_core::locator::{self, LocateOutcome};
use gdfetch_core::VersionRequest;
use std::path::{Path, PathBuf};

fn print_found(found: &[PathBuf]) {
    if found.is_empty() {
        println!("No executable files found.");
        return;
    }
    println!("Executable file(s) found:");
    for exe in found {
        println!("  {}", exe.display());
    }
}

pub fn run_locate(cfg: &GdfetchConfig, dir: &Path, version: Option<&str>, deep: bool) -> Result<bool> {
    let ext = &cfg.executable_extension;
    // Same rules as `fetch`: the version becomes part of a file name.
    let request = version
        .map(|v| VersionRequest::new(v, dir))
        .transpose()
        .context("invalid --version")?;

    if deep {
        let found = locator::find_executables_deep(dir, ext)?;
        print_found(&found);
        return Ok(!found.is_empty());
    }

    let Some(request) = request else {
        let found = locator::find_executables_shallow(dir, ext)?;
        print_found(&found);
        return Ok(!found.is_empty());
    };

    let canonical = cfg.canonical_executable_name(request.version());
    match locator::locate_and_rename(dir, &canonical, ext)? {
        LocateOutcome::Renamed { from, to } if from == to => {
            println!("Already named {}", to.display());
            Ok(true)
        }
        LocateOutcome::Renamed { from, to } => {
            println!("Renamed {} -> {}", from.display(), to.display());
            Ok(true)
        }
        LocateOutcome::Ambiguous { found } => {
            print_found(&found);
            if found.len() > 1 {
                println!("More than one executable; not renaming.");
            }
            Ok(false)
        }
    }
}
