use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::resolver::LinkSelector;

/// Placeholder replaced by the (url-encoded) version in `search_url_template`.
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Optional HTTP transport tuning (`[http]` table in config.toml).
///
/// Everything defaults to libcurl's own behavior: no timeouts, default user agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Connect timeout in seconds (None = transport default).
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    /// Whole-transfer timeout in seconds (None = wait indefinitely).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Custom `User-Agent` header.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Redirect cap (None = libcurl default).
    #[serde(default)]
    pub max_redirections: Option<u32>,
}

/// Global configuration loaded from `~/.config/gdfetch/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GdfetchConfig {
    /// Search URL with a `{version}` placeholder.
    pub search_url_template: String,
    /// When set, only anchors whose href contains this marker are candidates.
    #[serde(default)]
    pub link_marker: Option<String>,
    /// Maximum number of search attempts (including the first).
    pub max_attempts: u32,
    /// Prefix of artifact, extraction directory and canonical executable names.
    pub name_prefix: String,
    /// Executable extension without the leading dot.
    pub executable_extension: String,
    #[serde(default)]
    pub http: Option<HttpConfig>,
}

impl Default for GdfetchConfig {
    fn default() -> Self {
        Self {
            search_url_template: "https://www.google.com/search?q=Geometry+Dash+{version}+download"
                .to_string(),
            link_marker: None,
            max_attempts: 10,
            name_prefix: "GD".to_string(),
            executable_extension: "exe".to_string(),
            http: None,
        }
    }
}

impl GdfetchConfig {
    /// Anchor predicate derived from `link_marker`.
    pub fn link_selector(&self) -> LinkSelector {
        match self.link_marker.as_deref().map(str::trim) {
            Some(marker) if !marker.is_empty() => LinkSelector::HrefContains(marker.to_string()),
            _ => LinkSelector::AnyHref,
        }
    }

    /// `GD1.9` style stem shared by the artifact, the extraction directory and the executable.
    pub fn versioned_stem(&self, version: &str) -> String {
        format!("{}{}", self.name_prefix, version)
    }

    /// Canonical executable file name, e.g. `GD2.2.exe`.
    pub fn canonical_executable_name(&self, version: &str) -> String {
        format!("{}.{}", self.versioned_stem(version), self.executable_extension)
    }

    pub fn http_config(&self) -> HttpConfig {
        self.http.clone().unwrap_or_default()
    }

    /// Pretty TOML, as written to a fresh config file.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("gdfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<GdfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = GdfetchConfig::default();
        let toml = default_cfg.to_toml()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: GdfetchConfig = toml::from_str(&data)?;
    Ok(cfg)
}
