pub mod init;
mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/consult-ops/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("consult-ops"))
}

/// Get the default config file path (~/.config/consult-ops/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/consult-ops/config.yaml) and falls back to built-in defaults
///   when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    parse_config_file(&config_path)
}

fn parse_config_file(config_path: &Path) -> Result<Config> {
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

/// Validate every section of the config, collecting all errors.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    if let Err(e) = crate::health::validate_health_config(&config.health) {
        errors.extend(e);
    }
    if let Err(e) = crate::revenue::validate_revenue_config(&config.revenue) {
        errors.extend(e);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Resolve the store path: CLI flag, then config, then the default location.
/// A leading `~/` is expanded to the home directory.
pub fn resolve_data_path(config: &Config, cli_path: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(p) = cli_path {
        return Ok(p);
    }
    match config.data_file.as_deref() {
        Some(raw) => expand_home(raw),
        None => crate::store::get_store_path(),
    }
}

/// Who to record on history entries: CLI flag, then config, then $USER.
pub fn resolve_acting_user(config: &Config, cli_user: Option<String>) -> String {
    cli_user
        .or_else(|| config.acting_user.clone())
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "unknown".to_string())
}

fn expand_home(raw: &str) -> Result<PathBuf> {
    match raw.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir().context("Could not determine home directory")?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(raw)),
    }
}
