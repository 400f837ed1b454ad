//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `REMOTEBUILD_URL`: Server URL (required)
//! - `REMOTEBUILD_USERNAME`: Logged-in user
//! - `REMOTEBUILD_SESSION_TOKEN`: Session token from a previous login
//! - `REMOTEBUILD_MACHINE_ID`: Identifier sent on login
//! - `REMOTEBUILD_IGNORE_CERT`: Skip TLS certificate validation (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./remotebuild.toml`, `./remotebuild.json`, `./config.toml`,
//!    `./config.json` (current working directory)
//! 2. The same names next to the executable
//!
//! A missing machine id is replaced by a random one.

use std::path::{Path, PathBuf};

use remotebuild_domain::FileConfig;
use thiserror::Error;

const CONFIG_FILE_NAMES: [&str; 4] =
    ["remotebuild.toml", "remotebuild.json", "config.toml", "config.json"];

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("no config file found in any of the standard locations")]
    NoConfigFile,

    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("invalid {format} format: {message}")]
    Parse { format: &'static str, message: String },

    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the server URL is
/// not set, falls back to loading from a config file.
///
/// # Errors
/// Returns [`ConfigError`] if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
pub fn load() -> Result<FileConfig, ConfigError> {
    match load_from_env() {
        Ok(config) => {
            tracing::debug!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `REMOTEBUILD_URL` is required; everything else falls back to
/// defaults.
///
/// # Errors
/// Returns [`ConfigError::MissingEnv`] if `REMOTEBUILD_URL` is not set.
pub fn load_from_env() -> Result<FileConfig, ConfigError> {
    let mut config = FileConfig::default();

    config.server.url = env_var("REMOTEBUILD_URL")?;
    config.server.ignore_cert = env_bool("REMOTEBUILD_IGNORE_CERT", false);
    config.user.username = std::env::var("REMOTEBUILD_USERNAME").unwrap_or_default();
    config.user.session_token = std::env::var("REMOTEBUILD_SESSION_TOKEN").unwrap_or_default();
    config.machine_id = std::env::var("REMOTEBUILD_MACHINE_ID").unwrap_or_default();

    Ok(with_machine_id(config))
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations (see
/// [`probe_config_paths`]). Format is detected by file extension.
///
/// # Errors
/// Returns [`ConfigError`] if the file does not exist, cannot be read or
/// cannot be parsed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<FileConfig, ConfigError> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::NotFound(p));
            }
            p
        }
        None => probe_config_paths().ok_or(ConfigError::NoConfigFile)?,
    };

    tracing::debug!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)?;
    parse_config(&contents, &config_path).map(with_machine_id)
}

/// Parse configuration from string content
///
/// Format is detected by the extension of `path` (`.json` or `.toml`).
///
/// # Errors
/// Returns [`ConfigError`] if the format is unsupported or parsing fails.
pub fn parse_config(contents: &str, path: &Path) -> Result<FileConfig, ConfigError> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ConfigError::Parse { format: "TOML", message: e.to_string() }),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ConfigError::Parse { format: "JSON", message: e.to_string() }),
        _ => Err(ConfigError::UnsupportedFormat(extension.to_string())),
    }
}

/// Probe the standard locations for a configuration file
///
/// Searches the current working directory first, then the directory of the
/// running executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn with_machine_id(mut config: FileConfig) -> FileConfig {
    if config.machine_id.trim().is_empty() {
        config.machine_id = uuid::Uuid::new_v4().simple().to_string();
        tracing::debug!("no machine id configured, generated a random one");
    }
    config
}

/// Get required environment variable
fn env_var(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnv(key))
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
