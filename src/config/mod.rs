//! Configuration module.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, ConfigError, ConfigFile,
    ResolvedConfig,
};

/// Resolve the full configuration for one run.
///
/// Defaults → config file → env vars → CLI flags.
///
/// # Errors
///
/// Returns [`ConfigError`] if a config file exists but cannot be loaded.
pub fn resolve(
    config_path: Option<std::path::PathBuf>,
    page_size_override: Option<usize>,
    debounce_override: Option<u64>,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let merged = apply_env_overrides(merge_config(file));
    Ok(apply_cli_overrides(
        merged,
        page_size_override,
        debounce_override,
    ))
}
