//! Zip extraction.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use crate::error::{PipelineError, Result};

/// Extract every entry of `archive` under `dest`, then delete `archive`.
///
/// An existing `dest` is cleared first so only this attempt's files are
/// present. Entries whose names would escape `dest` are skipped. The
/// archive is removed even when extraction fails.
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<usize> {
    let extracted = extract_entries(archive, dest);

    if let Err(e) = fs::remove_file(archive) {
        if extracted.is_ok() {
            return Err(PipelineError::io("remove", archive)(e));
        }
        tracing::warn!("could not remove archive {}: {}", archive.display(), e);
    }

    let count = extracted?;
    tracing::info!("extracted {} file(s) to {}", count, dest.display());
    Ok(count)
}

fn extract_entries(archive: &Path, dest: &Path) -> Result<usize> {
    let zip_err = |source| PipelineError::Archive {
        archive: archive.to_path_buf(),
        source,
    };

    let file = File::open(archive).map_err(PipelineError::io("open", archive))?;
    let mut zip = zip::ZipArchive::new(file).map_err(zip_err)?;

    if dest.exists() {
        tracing::debug!("clearing previous extraction at {}", dest.display());
        fs::remove_dir_all(dest).map_err(PipelineError::io("remove directory", dest))?;
    }
    fs::create_dir_all(dest).map_err(PipelineError::io("create directory", dest))?;

    let mut files = 0usize;
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(zip_err)?;
        let Some(relative) = entry.enclosed_name().map(|p| p.to_path_buf()) else {
            tracing::warn!("skipping zip entry with unsafe path: {:?}", entry.name());
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(PipelineError::io("create directory", &out_path))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(PipelineError::io("create directory", parent))?;
        }
        let mut out = File::create(&out_path).map_err(PipelineError::io("create", &out_path))?;
        io::copy(&mut entry, &mut out).map_err(PipelineError::io("write", &out_path))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out_path, fs::Permissions::from_mode(mode & 0o7777))
                .map_err(PipelineError::io("chmod", &out_path))?;
        }

        files += 1;
    }
    Ok(files)
}
