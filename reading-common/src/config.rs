//! Configuration loading and setting resolution
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority, handled by each binary's clap `Args`)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or unreadable TOML file is never fatal: a warning is logged and
//! the remaining tiers apply.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "READING_CONFIG";

/// Environment variable overriding the database path
pub const DATABASE_ENV_VAR: &str = "READING_DATABASE";

/// Logging section of the TOML config
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Per-service section (`[exp]`, `[ai]`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServiceSection {
    /// Socket address to listen on
    pub bind: Option<String>,
}

/// Contents of `config.toml`
///
/// Every field is optional so a partial file is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TomlConfig {
    /// SQLite database file
    pub database: Option<PathBuf>,
    /// Whether gated endpoints check the internal token
    pub enforce_token: Option<bool>,
    /// Expected internal token
    pub internal_token: Option<String>,
    /// Gemini API key
    pub google_api_key: Option<String>,
    /// Gemini model name
    pub gemini_model: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub exp: ServiceSection,
    #[serde(default)]
    pub ai: ServiceSection,
}

impl TomlConfig {
    /// Parse a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Load config with graceful degradation
    ///
    /// Uses `explicit` if given, else `READING_CONFIG`, else the platform
    /// default location. Falls back to an empty config on any failure.
    pub fn load(explicit: Option<&Path>) -> Self {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from))
            .or_else(default_config_path);

        let Some(path) = path else {
            debug!("No config file location available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            debug!("Config file {} not found, using defaults", path.display());
            return Self::default();
        }

        match Self::from_file(&path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Platform config file location (`~/.config/reading/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("reading").join("config.toml"))
}

/// Platform default database location
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("reading").join("reading.db"))
        .unwrap_or_else(|| PathBuf::from("./reading_data/reading.db"))
}

/// Resolve the database path (CLI → ENV → TOML → default)
pub fn resolve_database_path(cli_arg: Option<&Path>, toml: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Some(path) = env_non_empty(DATABASE_ENV_VAR) {
        return PathBuf::from(path);
    }

    if let Some(path) = &toml.database {
        return path.clone();
    }

    default_database_path()
}

/// Resolve a string setting from ENV, then TOML
///
/// Empty and whitespace-only values count as unset in either tier.
pub fn resolve_string(env_var: &str, toml_value: Option<&str>) -> Option<String> {
    env_non_empty(env_var).or_else(|| {
        toml_value
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
    })
}

/// Resolve a boolean flag from ENV, then TOML, then `default`
///
/// An ENV value that is not a recognizable boolean is ignored with a warning.
pub fn resolve_flag(env_var: &str, toml_value: Option<bool>, default: bool) -> bool {
    if let Some(raw) = env_non_empty(env_var) {
        match parse_bool(&raw) {
            Some(value) => return value,
            None => warn!("Ignoring {}={:?}: not a boolean", env_var, raw),
        }
    }

    toml_value.unwrap_or(default)
}

/// Parse common boolean spellings (`true/false`, `1/0`, `yes/no`, `on/off`)
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
