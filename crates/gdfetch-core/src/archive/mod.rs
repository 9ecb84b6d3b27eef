//! Archive normalizer: classify a downloaded artifact and, for archives,
//! produce a flat directory holding the executable.
//!
//! | artifact            | classification       |
//! |---------------------|----------------------|
//! | existing directory  | `ScanDirectory`      |
//! | `.apk`              | `RejectRetry`        |
//! | `.zip`              | `ExtractAndFlatten`  |
//! | `.<exe-ext>`        | `AcceptAsIs`         |
//! | anything else       | `RejectTerminal`     |

mod extract;
mod flatten;

pub use extract::extract_zip;
pub use flatten::{flatten, FlattenReport};

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};
use crate::fetcher::DownloadedArtifact;

/// What to do with a downloaded artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Wrong platform package: delete and search again.
    RejectRetry,
    /// Zip archive: extract, delete the archive, flatten.
    ExtractAndFlatten,
    /// Already an executable: keep as-is.
    AcceptAsIs,
    /// Artifact is a directory: scan it directly.
    ScanDirectory,
    /// Unknown format: delete and stop.
    RejectTerminal,
}

/// Classify by extension alone (leading dot optional, ASCII case-insensitive).
pub fn classify_extension(extension: &str, executable_extension: &str) -> Classification {
    let ext = extension.trim_start_matches('.');
    let exe = executable_extension.trim_start_matches('.');
    if ext.eq_ignore_ascii_case("apk") {
        Classification::RejectRetry
    } else if ext.eq_ignore_ascii_case("zip") {
        Classification::ExtractAndFlatten
    } else if !exe.is_empty() && ext.eq_ignore_ascii_case(exe) {
        Classification::AcceptAsIs
    } else {
        Classification::RejectTerminal
    }
}

/// Classify an artifact; an existing directory wins over any extension.
pub fn classify(artifact: &DownloadedArtifact, executable_extension: &str) -> Classification {
    if artifact.local_path.is_dir() {
        return Classification::ScanDirectory;
    }
    classify_extension(&artifact.declared_extension, executable_extension)
}

/// Directory produced (or adopted) by the normalizer; consumed by the locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTree {
    pub root_directory: PathBuf,
}

/// Result of normalizing one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// `.apk` was deleted; the caller should search again.
    Retry,
    /// The artifact itself is the executable.
    Executable(PathBuf),
    /// Archive extracted into `tree` and flattened.
    Extracted { tree: ExtractedTree, report: FlattenReport },
    /// Artifact was already a directory; not flattened.
    Directory(ExtractedTree),
    /// Unknown format; the artifact was deleted.
    Unrecognized { extension: String },
}

fn delete_artifact(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(PipelineError::io("remove", path))?;
    tracing::debug!("deleted {}", path.display());
    Ok(())
}

/// Apply the classification policy to `artifact`.
///
/// Archives are extracted into `extract_dir`. Rejected artifacts are
/// deleted before returning, so no stray download survives a terminal or
/// retry outcome.
pub fn normalize(
    artifact: DownloadedArtifact,
    extract_dir: &Path,
    executable_extension: &str,
) -> Result<Normalized> {
    let class = classify(&artifact, executable_extension);
    tracing::debug!("{} classified as {:?}", artifact.local_path.display(), class);

    match class {
        Classification::RejectRetry => {
            tracing::info!("downloaded file is an APK; searching for an executable build");
            delete_artifact(&artifact.local_path)?;
            Ok(Normalized::Retry)
        }
        Classification::ExtractAndFlatten => {
            extract_zip(&artifact.local_path, extract_dir)?;
            let report = flatten(extract_dir)?;
            Ok(Normalized::Extracted {
                tree: ExtractedTree {
                    root_directory: extract_dir.to_path_buf(),
                },
                report,
            })
        }
        Classification::AcceptAsIs => Ok(Normalized::Executable(artifact.local_path)),
        Classification::ScanDirectory => Ok(Normalized::Directory(ExtractedTree {
            root_directory: artifact.local_path,
        })),
        Classification::RejectTerminal => {
            tracing::warn!(
                "{} is not a recognized format ({:?}); removing it",
                artifact.local_path.display(),
                artifact.declared_extension
            );
            delete_artifact(&artifact.local_path)?;
            Ok(Normalized::Unrecognized {
                extension: artifact.declared_extension,
            })
        }
    }
}

#[cfg(test)]
mod tests;
