//! Search → fetch → classify → locate, with a bounded retry on `.apk`.
//!
//! ```text
//! Searching ─▶ Fetching ─▶ Classifying ─┬─▶ Done
//!     ▲                                 └─▶ RetrySearch ─┬─▶ Searching
//!     │                                                  └─▶ Done (MaxAttemptsReached)
//!  any error ─▶ Aborted (returned as Err)
//! ```
//!
//! Each attempt finishes its cleanup before the next search starts.

mod attempts;
mod outcome;

pub use attempts::{AttemptDecision, AttemptPolicy};
pub use outcome::{PipelineOutcome, PipelineReport};

use crate::archive::{self, Normalized};
use crate::config::GdfetchConfig;
use crate::error::{PipelineError, Result};
use crate::fetcher::{self, DownloadedArtifact};
use crate::http::{HttpSession, Transport};
use crate::locator;
use crate::request::VersionRequest;
use crate::resolver::{self, ResolvedLink};

#[derive(Debug)]
enum State {
    Searching,
    Fetching(ResolvedLink),
    Classifying(DownloadedArtifact),
    RetrySearch,
    Done(PipelineOutcome),
}

/// Run the pipeline to completion on the current thread.
pub fn run_blocking<T: Transport + ?Sized>(
    transport: &mut T,
    cfg: &GdfetchConfig,
    mut request: VersionRequest,
) -> Result<PipelineReport> {
    let policy = AttemptPolicy::new(cfg.max_attempts);
    let selector = cfg.link_selector();
    let stem = cfg.versioned_stem(request.version());

    if !policy.allows(request.attempt()) {
        tracing::warn!("max_attempts is {}; nothing to do", cfg.max_attempts);
        return Ok(PipelineReport {
            outcome: PipelineOutcome::MaxAttemptsReached { attempts: 0 },
            attempts: 0,
        });
    }

    let mut state = State::Searching;
    loop {
        state = match state {
            State::Searching => {
                tracing::info!(
                    "attempt {}/{}: searching for version {}",
                    request.attempt(),
                    policy.max_attempts,
                    request.version()
                );
                match resolver::resolve_link(
                    transport,
                    &cfg.search_url_template,
                    &selector,
                    request.version(),
                )? {
                    Some(link) => State::Fetching(link),
                    None => State::Done(PipelineOutcome::LinkNotFound),
                }
            }
            State::Fetching(link) => State::Classifying(fetcher::fetch_artifact(
                transport,
                &link,
                request.destination_directory(),
                &stem,
            )?),
            State::Classifying(artifact) => {
                let extract_dir = request.destination_directory().join(&stem);
                match archive::normalize(artifact, &extract_dir, &cfg.executable_extension)? {
                    Normalized::Retry => State::RetrySearch,
                    Normalized::Executable(path) => State::Done(PipelineOutcome::Downloaded { path }),
                    Normalized::Extracted { tree, report } => {
                        let located = locator::locate_and_rename(
                            &tree.root_directory,
                            &cfg.canonical_executable_name(request.version()),
                            &cfg.executable_extension,
                        )?;
                        State::Done(PipelineOutcome::Extracted {
                            dir: tree.root_directory,
                            report,
                            located,
                        })
                    }
                    Normalized::Directory(tree) => {
                        let executables =
                            locator::find_executables_deep(&tree.root_directory, &cfg.executable_extension)?;
                        State::Done(PipelineOutcome::Scanned {
                            dir: tree.root_directory,
                            executables,
                        })
                    }
                    Normalized::Unrecognized { extension } => {
                        State::Done(PipelineOutcome::UnrecognizedFormat { extension })
                    }
                }
            }
            State::RetrySearch => match policy.after_retryable(request.attempt()) {
                AttemptDecision::SearchAgain(_) => {
                    request.next_attempt();
                    State::Searching
                }
                AttemptDecision::GiveUp(attempts) => {
                    State::Done(PipelineOutcome::MaxAttemptsReached { attempts })
                }
            },
            State::Done(outcome) => {
                tracing::info!("pipeline finished after {} attempt(s): {:?}", request.attempt(), outcome);
                return Ok(PipelineReport {
                    outcome,
                    attempts: request.attempt(),
                });
            }
        };
    }
}

/// Run the pipeline with a fresh [`HttpSession`] on tokio's blocking pool.
///
/// The session lives exactly as long as this call.
pub async fn run(cfg: GdfetchConfig, request: VersionRequest) -> Result<PipelineReport> {
    tokio::task::spawn_blocking(move || -> Result<PipelineReport> {
        let mut session = HttpSession::new(&cfg.http_config())?;
        run_blocking(&mut session, &cfg, request)
    })
    .await
    .map_err(|e| PipelineError::Join(e.to_string()))?
}
