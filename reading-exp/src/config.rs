//! Service settings resolved at startup

use reading_common::api::TokenPolicy;
use reading_common::config::{resolve_flag, resolve_string, TomlConfig};
use tracing::{info, warn};

/// Environment variable for the listen address (read by clap)
pub const BIND_ENV_VAR: &str = "READING_EXP_BIND";

/// Default listen address
pub const DEFAULT_BIND: &str = "127.0.0.1:5740";

/// Environment variable toggling token enforcement
pub const ENFORCE_TOKEN_ENV_VAR: &str = "READING_ENFORCE_TOKEN";

/// Environment variable holding the expected internal token
pub const INTERNAL_TOKEN_ENV_VAR: &str = "SEARCH_EXPERIENCES_TOKEN";

/// Listen address: CLI/ENV (already merged by clap) → TOML → default
pub fn resolve_bind(cli_or_env: Option<&str>, toml: &TomlConfig) -> String {
    cli_or_env
        .filter(|s| !s.trim().is_empty())
        .or(toml.exp.bind.as_deref())
        .unwrap_or(DEFAULT_BIND)
        .to_string()
}

/// Token policy from ENV, then TOML; enforcement is off by default
pub fn resolve_token_policy(toml: &TomlConfig) -> TokenPolicy {
    let enforce = resolve_flag(ENFORCE_TOKEN_ENV_VAR, toml.enforce_token, false);
    let expected = resolve_string(INTERNAL_TOKEN_ENV_VAR, toml.internal_token.as_deref());

    match (enforce, expected.is_some()) {
        (false, _) => info!("Internal token enforcement disabled"),
        (true, true) => info!("Internal token enforcement enabled"),
        (true, false) => warn!(
            "Token enforcement enabled but {} is not set; gated endpoints will reject all requests",
            INTERNAL_TOKEN_ENV_VAR
        ),
    }

    TokenPolicy::new(enforce, expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reading_common::config::ServiceSection;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var(ENFORCE_TOKEN_ENV_VAR);
        std::env::remove_var(INTERNAL_TOKEN_ENV_VAR);
    }

    #[test]
    fn test_bind_priority() {
        let toml = TomlConfig {
            exp: ServiceSection {
                bind: Some("0.0.0.0:9000".to_string()),
            },
            ..Default::default()
        };

        assert_eq!(resolve_bind(Some("127.0.0.1:1"), &toml), "127.0.0.1:1");
        assert_eq!(resolve_bind(None, &toml), "0.0.0.0:9000");
        assert_eq!(resolve_bind(None, &TomlConfig::default()), DEFAULT_BIND);
    }

    #[test]
    #[serial]
    fn test_token_policy_defaults_to_disabled() {
        clear_env();
        let policy = resolve_token_policy(&TomlConfig::default());
        assert!(!policy.is_enforced());
        assert!(policy.check(None));
    }

    #[test]
    #[serial]
    fn test_token_policy_env_overrides_toml() {
        clear_env();
        std::env::set_var(ENFORCE_TOKEN_ENV_VAR, "true");
        std::env::set_var(INTERNAL_TOKEN_ENV_VAR, "from-env");

        let toml = TomlConfig {
            enforce_token: Some(false),
            internal_token: Some("from-toml".to_string()),
            ..Default::default()
        };
        let policy = resolve_token_policy(&toml);

        assert!(policy.is_enforced());
        assert!(policy.check(Some("from-env")));
        assert!(!policy.check(Some("from-toml")));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_enforced_without_token_rejects() {
        clear_env();
        let toml = TomlConfig {
            enforce_token: Some(true),
            ..Default::default()
        };
        let policy = resolve_token_policy(&toml);

        assert!(policy.is_enforced());
        assert!(!policy.check(Some("")));
        assert!(!policy.check(Some("anything")));
    }
}
