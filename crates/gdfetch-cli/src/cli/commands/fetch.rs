//! `gdfetch fetch <version>` – run the full search/download/unpack pipeline.

use anyhow::{Context, Result};
use gdfetch_core::config::GdfetchConfig;
use gdfetch_core::{pipeline, VersionRequest};
use std::path::Path;

/// Per-invocation overrides of config values.
#[derive(Debug, Default, Clone)]
pub struct FetchOverrides {
    pub max_attempts: Option<u32>,
    pub link_marker: Option<String>,
}

impl FetchOverrides {
    pub fn apply(self, mut cfg: GdfetchConfig) -> GdfetchConfig {
        if let Some(n) = self.max_attempts {
            cfg.max_attempts = n;
        }
        if let Some(marker) = self.link_marker {
            cfg.link_marker = Some(marker);
        }
        cfg
    }
}

pub async fn run_fetch(
    cfg: GdfetchConfig,
    overrides: FetchOverrides,
    version: &str,
    download_dir: &Path,
) -> Result<bool> {
    let cfg = overrides.apply(cfg);
    let request = VersionRequest::new(version, download_dir)?;
    println!(
        "Searching for version {} (up to {} attempt(s))...",
        request.version(),
        cfg.max_attempts
    );

    let report = pipeline::run(cfg, request)
        .await
        .with_context(|| format!("fetching version {}", version.trim()))?;

    println!("{}", report.outcome);
    if report.attempts > 1 {
        println!("({} attempts)", report.attempts);
    }
    Ok(report.outcome.is_success())
}
