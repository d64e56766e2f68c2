//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Secrets (API keys) are referenced by env-var name in the config and
//! resolved at runtime via `std::env::var`.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub feeds: FeedsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub name: String,
    pub currency: String,
    pub starting_balance: Decimal,
    /// Preset stake amounts offered alongside free-text stake entry.
    pub quick_stakes: Vec<Decimal>,
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedsConfig {
    pub cricket: CricketFeedConfig,
    pub sample: SampleFeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CricketFeedConfig {
    pub enabled: bool,
    pub api_key_env: String,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SampleFeedConfig {
    pub enabled: bool,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Resolve an environment variable name to its value.
    /// Useful for loading secrets referenced in the config.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_load_config() {
        // This test requires config.toml to be in the working directory.
        // In CI, copy config.toml to the test working dir.
        let result = AppConfig::load("config.toml");
        if let Ok(cfg) = result {
            assert_eq!(cfg.session.name, "ARENA-001");
            assert!(cfg.session.starting_balance > Decimal::ZERO);
            assert!(!cfg.session.quick_stakes.is_empty());
            assert!(cfg.session.refresh_interval_secs > 0);
            assert!(cfg.feeds.sample.enabled);
        }
        // If config.toml isn't found, that's acceptable in some test environments
    }

    #[test]
    fn test_parse_inline_toml() {
        let toml_src = r#"
            [session]
            name = "ARENA-001"
            currency = "USD"
            starting_balance = 1000
            quick_stakes = [5, 10, 25, 50, 100]
            refresh_interval_secs = 30

            [feeds.cricket]
            enabled = false
            api_key_env = "RAPIDAPI_KEY"
            host = "unofficial-cricbuzz.p.rapidapi.com"

            [feeds.sample]
            enabled = true
        "#;
        let cfg: AppConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(cfg.session.starting_balance, dec!(1000));
        assert_eq!(cfg.session.quick_stakes.len(), 5);
        assert_eq!(cfg.session.quick_stakes[2], dec!(25));
        assert!(!cfg.feeds.cricket.enabled);
        assert_eq!(cfg.feeds.cricket.api_key_env, "RAPIDAPI_KEY");
    }

    #[test]
    fn test_resolve_env_missing() {
        let err = AppConfig::resolve_env("ARENA_TEST_UNSET_VAR_XYZ").unwrap_err();
        assert!(err.to_string().contains("ARENA_TEST_UNSET_VAR_XYZ"));
    }
}
