//! Artifact download.
//!
//! The body is streamed into `<artifact>.part` (created exclusively) and
//! renamed to the artifact name only after the transfer completed, so a
//! half-written file never sits under the final name.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{PipelineError, Result};
use crate::http::Transport;
use crate::resolver::ResolvedLink;

/// Suffix of the in-progress download file.
pub const TEMP_SUFFIX: &str = ".part";

/// A downloaded file (or, rarely, an existing directory) awaiting classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedArtifact {
    pub local_path: PathBuf,
    /// Extension from the URL including the dot (e.g. `".zip"`), or empty.
    pub declared_extension: String,
}

/// Extension of the URL's last path segment, including the leading dot.
///
/// Query and fragment are ignored. Returns an empty string when the segment
/// has no extension or the extension is not plain alphanumeric.
pub fn extension_from_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return String::new();
    };
    let Some(segment) = parsed.path().split('/').filter(|s| !s.is_empty()).last() else {
        return String::new();
    };
    match segment.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty() && !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!(".{}", ext)
        }
        _ => String::new(),
    }
}

/// `<dest>/<stem><ext>`, e.g. `downloads/GD2.2.zip`.
pub fn artifact_path(dest_dir: &Path, stem: &str, extension: &str) -> PathBuf {
    dest_dir.join(format!("{}{}", stem, extension))
}

/// Path for the temp file: appends `.part` (e.g. `GD2.2.zip` → `GD2.2.zip.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

fn validate_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(PipelineError::InvalidUrl {
            url: url.to_string(),
            reason: "empty".to_string(),
        });
    }
    Url::parse(url).map_err(|e| PipelineError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Download `link` into `dest_dir` as `<stem><url-extension>`.
///
/// If that name already exists as a directory (a previous extraction of an
/// extension-less link), nothing is downloaded and the directory is
/// returned as the artifact.
pub fn fetch_artifact<T: Transport + ?Sized>(
    transport: &mut T,
    link: &ResolvedLink,
    dest_dir: &Path,
    stem: &str,
) -> Result<DownloadedArtifact> {
    validate_url(&link.url)?;
    fs::create_dir_all(dest_dir).map_err(PipelineError::io("create directory", dest_dir))?;

    let declared_extension = extension_from_url(&link.url);
    let final_path = artifact_path(dest_dir, stem, &declared_extension);

    if final_path.is_dir() {
        tracing::info!(
            "{} already exists as a directory; using it instead of downloading",
            final_path.display()
        );
        return Ok(DownloadedArtifact {
            local_path: final_path,
            declared_extension,
        });
    }

    let part = temp_path(&final_path);
    if part.exists() {
        fs::remove_file(&part).map_err(PipelineError::io("remove stale temp file", &part))?;
    }

    tracing::info!("downloading {} -> {}", link.url, final_path.display());
    match stream_to(transport, &link.url, &part) {
        Ok(bytes) => {
            fs::rename(&part, &final_path).map_err(PipelineError::io("rename", &part))?;
            tracing::info!("downloaded {} bytes to {}", bytes, final_path.display());
            Ok(DownloadedArtifact {
                local_path: final_path,
                declared_extension,
            })
        }
        Err(e) => {
            if let Err(rm) = fs::remove_file(&part) {
                if rm.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("could not remove partial download {}: {}", part.display(), rm);
                }
            }
            Err(e)
        }
    }
}

fn stream_to<T: Transport + ?Sized>(transport: &mut T, url: &str, part: &Path) -> Result<u64> {
    let file = File::options()
        .write(true)
        .create_new(true)
        .open(part)
        .map_err(PipelineError::io("create", part))?;
    let mut writer = BufWriter::new(file);
    let bytes = transport.download_to(url, &mut writer)?;
    let file = writer
        .into_inner()
        .map_err(|e| PipelineError::io("flush", part)(e.into_error()))?;
    file.sync_all().map_err(PipelineError::io("sync", part))?;
    Ok(bytes)
}
