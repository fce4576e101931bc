//! Configuration file loading with precedence handling.

use crate::model::feed_url::DEFAULT_URL_TEMPLATE;
use crate::model::resolution::ResolutionCatalog;
use crate::state::scan_timer::DEFAULT_SCAN_INTERVAL;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Terminal cell size in pixels assumed when the config does not say otherwise.
pub const DEFAULT_CELL_PIXELS: [u32; 2] = [8, 16];

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional; missing ones fall back to built-in defaults.
/// Corresponds to `~/.config/camgrid/config.toml`:
///
/// ```toml
/// feeds = ["http://cam1.local/", "http://cam2.local/"]
/// resolutions = [[160, 120], [320, 240], [640, 480]]
/// url_template = "{base}mjpg/video.mjpg?resolution={width}x{height}"
/// scan_interval_secs = 5
/// cell_pixels = [8, 16]
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Feed base URLs, one tile each.
    #[serde(default)]
    pub feeds: Option<Vec<String>>,

    /// Resolution ladder as `[width, height]` pairs, ascending.
    #[serde(default)]
    pub resolutions: Option<Vec<[u32; 2]>>,

    /// Feed URL template with `{base}`, `{width}` and `{height}` placeholders.
    #[serde(default)]
    pub url_template: Option<String>,

    /// Seconds between automatic scan steps.
    #[serde(default)]
    pub scan_interval_secs: Option<u64>,

    /// Pixel size of one terminal cell as `[width, height]`.
    #[serde(default)]
    pub cell_pixels: Option<[u32; 2]>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
/// Values are not validated here; catalog and template construction do that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Feed base URLs, one tile each, in display order.
    pub feeds: Vec<String>,
    /// Supported resolutions as `[width, height]`, ascending.
    pub resolutions: Vec<[u32; 2]>,
    /// Feed URL template with `{base}`, `{width}` and `{height}` placeholders.
    pub url_template: String,
    /// Interval between automatic scan steps.
    pub scan_interval: Duration,
    /// Pixel size of one terminal cell, `[width, height]`.
    pub cell_pixels: [u32; 2],
    /// Log file path.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            feeds: Vec::new(),
            resolutions: ResolutionCatalog::default()
                .entries()
                .iter()
                .map(|r| [r.width(), r.height()])
                .collect(),
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            scan_interval: DEFAULT_SCAN_INTERVAL,
            cell_pixels: DEFAULT_CELL_PIXELS,
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/camgrid/camgrid.log` on Linux, or the platform
/// state directory elsewhere. Falls back to the current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("camgrid").join("camgrid.log")
    } else {
        PathBuf::from("camgrid.log")
    }
}

/// Log file path a config file asks for, or [`default_log_path`].
///
/// Needed before merging so that logging is up when merge warnings fire.
pub fn resolve_log_path(config_file: Option<&ConfigFile>) -> PathBuf {
    config_file
        .and_then(|config| config.log_file_path.clone())
        .unwrap_or_else(default_log_path)
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path (`~/.config/camgrid/config.toml` on Linux).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("camgrid").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `CAMGRID_CONFIG` environment variable
/// 3. Default path `~/.config/camgrid/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("CAMGRID_CONFIG") {
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath(
                "CAMGRID_CONFIG is set but empty".to_string(),
            ));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Parse a scan interval given in whole seconds. Zero is rejected.
fn parse_interval_secs(raw: &str) -> Option<Duration> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks `CAMGRID_SCAN_INTERVAL` (whole seconds). Unparsable values are
/// logged and ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var("CAMGRID_SCAN_INTERVAL") {
        match parse_interval_secs(&raw) {
            Some(interval) => config.scan_interval = interval,
            None => warn!(value = %raw, "Ignoring invalid CAMGRID_SCAN_INTERVAL"),
        }
    }

    config
}

/// Merge config file into defaults to create resolved config.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    let scan_interval = match config.scan_interval_secs {
        Some(0) => {
            warn!("Ignoring scan_interval_secs = 0");
            defaults.scan_interval
        }
        Some(secs) => Duration::from_secs(secs),
        None => defaults.scan_interval,
    };

    let cell_pixels = match config.cell_pixels {
        Some([width, height]) if width == 0 || height == 0 => {
            warn!(width, height, "Ignoring cell_pixels with a zero dimension");
            defaults.cell_pixels
        }
        Some(pixels) => pixels,
        None => defaults.cell_pixels,
    };
    let log_file_path = resolve_log_path(Some(&config));

    ResolvedConfig {
        feeds: config.feeds.unwrap_or(defaults.feeds),
        resolutions: config.resolutions.unwrap_or(defaults.resolutions),
        url_template: config.url_template.unwrap_or(defaults.url_template),
        scan_interval,
        cell_pixels,
        log_file_path,
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest).
/// Feeds given on the command line replace the configured list entirely.
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    feeds_override: Vec<String>,
    scan_interval_override: Option<u64>,
) -> ResolvedConfig {
    if !feeds_override.is_empty() {
        config.feeds = feeds_override;
    }

    if let Some(secs) = scan_interval_override {
        if secs > 0 {
            config.scan_interval = Duration::from_secs(secs);
        } else {
            warn!("Ignoring --scan-interval 0");
        }
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
