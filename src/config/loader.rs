//! Configuration file loading with precedence handling.

use crate::state::{SuggestionSettings, DEFAULT_MIN_TOKEN_LEN};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "BOARDSEARCH_CONFIG";
/// Environment variable overriding the page size.
pub const PAGE_SIZE_ENV: &str = "BOARDSEARCH_PAGE_SIZE";
/// Environment variable overriding the debounce window in milliseconds.
pub const DEBOUNCE_ENV: &str = "BOARDSEARCH_DEBOUNCE_MS";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues and the like).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A value parsed but is out of range.
    #[error("Invalid value for {field} in {path}: must be at least 1")]
    ZeroValue {
        /// Offending file.
        path: PathBuf,
        /// Offending key.
        field: &'static str,
    },

    /// A value parsed but is below the smallest accepted setting.
    #[error("Invalid value for {field} in {path}: must be at least {min}")]
    BelowMinimum {
        /// Offending file.
        path: PathBuf,
        /// Offending key.
        field: &'static str,
        /// Smallest accepted value.
        min: usize,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/boardsearch/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Quiet period before a suggestion fetch, in milliseconds.
    #[serde(default)]
    pub debounce_ms: Option<u64>,

    /// Shortest in-progress token that triggers a suggestion fetch.
    #[serde(default)]
    pub min_token_len: Option<usize>,

    /// Posts requested per page.
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Maximum tag candidates returned by the in-memory tag index.
    #[serde(default)]
    pub suggestion_limit: Option<usize>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

impl ConfigFile {
    fn check(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let zero = [
            ("page_size", self.page_size),
            ("suggestion_limit", self.suggestion_limit),
        ]
        .into_iter()
        .find(|(_, value)| *value == Some(0));

        if let Some((field, _)) = zero {
            return Err(ConfigError::ZeroValue {
                path: path.to_path_buf(),
                field,
            });
        }

        // The tag endpoint never sees prefixes shorter than the default.
        match self.min_token_len {
            Some(len) if len < DEFAULT_MIN_TOKEN_LEN => Err(ConfigError::BelowMinimum {
                path: path.to_path_buf(),
                field: "min_token_len",
                min: DEFAULT_MIN_TOKEN_LEN,
            }),
            _ => Ok(()),
        }
    }
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub debounce_ms: u64,
    pub min_token_len: usize,
    pub page_size: usize,
    pub suggestion_limit: usize,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        let suggestions = SuggestionSettings::default();
        Self {
            debounce_ms: suggestions.debounce.as_millis() as u64,
            min_token_len: suggestions.min_token_len,
            page_size: crate::source::DEFAULT_PAGE_SIZE,
            suggestion_limit: 10,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Settings for the suggestion pipeline.
    pub fn suggestion_settings(&self) -> SuggestionSettings {
        SuggestionSettings {
            debounce: Duration::from_millis(self.debounce_ms),
            min_token_len: self.min_token_len,
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/boardsearch/boardsearch.log` on Unix-like systems,
/// or the platform equivalent. Falls back to the current directory if no
/// state directory can be determined.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("boardsearch").join("boardsearch.log")
    } else {
        PathBuf::from("boardsearch.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but cannot be read or parsed, holds a zero
/// page size or suggestion limit, or sets `min_token_len` below 3.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
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
    config.check(&path)?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/boardsearch/config.toml` on Unix, appropriate path on
/// other platforms. Returns `None` if no config directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("boardsearch").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `BOARDSEARCH_CONFIG` environment variable
/// 3. Default path `~/.config/boardsearch/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be loaded.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        debounce_ms: config.debounce_ms.unwrap_or(defaults.debounce_ms),
        min_token_len: config.min_token_len.unwrap_or(defaults.min_token_len),
        page_size: config.page_size.unwrap_or(defaults.page_size),
        suggestion_limit: config.suggestion_limit.unwrap_or(defaults.suggestion_limit),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `BOARDSEARCH_PAGE_SIZE`: positive integer
/// - `BOARDSEARCH_DEBOUNCE_MS`: non-negative integer
///
/// Values that do not parse are ignored with a warning.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var(PAGE_SIZE_ENV) {
        match raw.trim().parse::<usize>() {
            Ok(size) if size > 0 => config.page_size = size,
            _ => warn!(var = PAGE_SIZE_ENV, value = %raw, "ignoring invalid page size"),
        }
    }

    if let Ok(raw) = std::env::var(DEBOUNCE_ENV) {
        match raw.trim().parse::<u64>() {
            Ok(ms) => config.debounce_ms = ms,
            Err(_) => warn!(var = DEBOUNCE_ENV, value = %raw, "ignoring invalid debounce"),
        }
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// Only flags the user actually passed are applied.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    page_size_override: Option<usize>,
    debounce_override: Option<u64>,
) -> ResolvedConfig {
    if let Some(size) = page_size_override.filter(|size| *size > 0) {
        config.page_size = size;
    }

    if let Some(ms) = debounce_override {
        config.debounce_ms = ms;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
