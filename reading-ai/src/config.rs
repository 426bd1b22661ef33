//! Service settings resolved at startup

use reading_common::config::{resolve_string, TomlConfig};
use reading_common::{Error, Result};

use crate::gemini::DEFAULT_MODEL;

/// Environment variable for the listen address (read by clap)
pub const BIND_ENV_VAR: &str = "READING_AI_BIND";

/// Default listen address
pub const DEFAULT_BIND: &str = "127.0.0.1:5741";

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV_VAR: &str = "GOOGLE_API_KEY";

/// Environment variable overriding the Gemini model
pub const MODEL_ENV_VAR: &str = "READING_GEMINI_MODEL";

/// Listen address: CLI/ENV (already merged by clap) → TOML → default
pub fn resolve_bind(cli_or_env: Option<&str>, toml: &TomlConfig) -> String {
    cli_or_env
        .filter(|s| !s.trim().is_empty())
        .or(toml.ai.bind.as_deref())
        .unwrap_or(DEFAULT_BIND)
        .to_string()
}

/// Gemini API key from ENV, then TOML; the service cannot start without it
pub fn resolve_api_key(toml: &TomlConfig) -> Result<String> {
    resolve_string(API_KEY_ENV_VAR, toml.google_api_key.as_deref()).ok_or_else(|| {
        Error::Config(format!(
            "{} not set (environment or google_api_key in config file)",
            API_KEY_ENV_VAR
        ))
    })
}

/// Gemini model from ENV, then TOML, then the default
pub fn resolve_model(toml: &TomlConfig) -> String {
    resolve_string(MODEL_ENV_VAR, toml.gemini_model.as_deref())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string())
}
