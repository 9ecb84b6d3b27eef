//! Terminal results of a pipeline run.

use std::fmt;
use std::path::PathBuf;

use crate::archive::FlattenReport;
use crate::locator::LocateOutcome;

/// How the pipeline ended when it did not fail with an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// The artifact was already an executable.
    Downloaded { path: PathBuf },
    /// A zip was extracted and flattened; `located` says whether the
    /// executable was renamed.
    Extracted {
        dir: PathBuf,
        report: FlattenReport,
        located: LocateOutcome,
    },
    /// The artifact was an existing directory, scanned in depth.
    Scanned { dir: PathBuf, executables: Vec<PathBuf> },
    /// The search page had no matching anchor; nothing was downloaded.
    LinkNotFound,
    /// The download was neither `.apk`, `.zip`, an executable nor a directory.
    UnrecognizedFormat { extension: String },
    /// Every attempt produced an `.apk`.
    MaxAttemptsReached { attempts: u32 },
}

impl PipelineOutcome {
    /// True for the outcomes that end in `Done` with something on disk.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            PipelineOutcome::Downloaded { .. }
                | PipelineOutcome::Extracted { .. }
                | PipelineOutcome::Scanned { .. }
        )
    }
}

fn write_executables(f: &mut fmt::Formatter<'_>, found: &[PathBuf]) -> fmt::Result {
    if found.is_empty() {
        return write!(f, "no executable files found");
    }
    write!(f, "executable file(s) found:")?;
    for exe in found {
        write!(f, "\n  {}", exe.display())?;
    }
    Ok(())
}

impl fmt::Display for PipelineOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineOutcome::Downloaded { path } => {
                write!(f, "download completed: {}", path.display())
            }
            PipelineOutcome::Extracted { dir, located, .. } => {
                writeln!(f, "extracted to {}", dir.display())?;
                match located {
                    LocateOutcome::Renamed { to, .. } => write!(f, "executable: {}", to.display()),
                    LocateOutcome::Ambiguous { found } if found.len() > 1 => {
                        write_executables(f, found)?;
                        write!(f, "\nmore than one executable; names left unchanged")
                    }
                    LocateOutcome::Ambiguous { found } => write_executables(f, found),
                }
            }
            PipelineOutcome::Scanned { dir, executables } => {
                writeln!(f, "scanned {}", dir.display())?;
                write_executables(f, executables)
            }
            PipelineOutcome::LinkNotFound => write!(f, "download link not found"),
            PipelineOutcome::UnrecognizedFormat { extension } if extension.is_empty() => {
                write!(f, "the downloaded file has no recognizable extension; aborted")
            }
            PipelineOutcome::UnrecognizedFormat { extension } => {
                write!(f, "the downloaded file ({}) is not a recognized format; aborted", extension)
            }
            PipelineOutcome::MaxAttemptsReached { attempts } => write!(
                f,
                "max attempts reached ({}); could not find a valid download link",
                attempts
            ),
        }
    }
}

/// Outcome plus the attempt on which it was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub outcome: PipelineOutcome,
    pub attempts: u32,
}
