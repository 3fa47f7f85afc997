//! Environment-driven configuration
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial creation

use anyhow::{Context, Result};
use std::env;

/// Default chat model when OPENAI_MODEL is unset
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default bound on the number of channels the session store keeps
pub const DEFAULT_SESSION_MAX_CHANNELS: usize = 512;

/// Runtime configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub log_level: String,
    /// Base URL of the fan-wiki MediaWiki API (e.g. `https://wiki.example.org/api.php`).
    /// Knowledge lookups are disabled when unset.
    pub wiki_api_url: Option<String>,
    /// Display name of the wiki, interpolated into the lookup-decision prompt.
    pub wiki_name: String,
    pub persona_long_name: String,
    pub persona_short_name: String,
    pub session_max_channels: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let discord_token =
            env::var("DISCORD_TOKEN").context("DISCORD_TOKEN environment variable is required")?;
        let openai_api_key = env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY environment variable is required")?;

        Ok(Config {
            discord_token,
            openai_api_key,
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            wiki_api_url: env::var("WIKI_API_URL").ok().filter(|v| !v.is_empty()),
            wiki_name: env::var("WIKI_NAME").unwrap_or_else(|_| "Harborpedia".to_string()),
            persona_long_name: env::var("PERSONA_LONG_NAME")
                .unwrap_or_else(|_| "Joss Vega".to_string()),
            persona_short_name: env::var("PERSONA_SHORT_NAME")
                .unwrap_or_else(|_| "Joss".to_string()),
            session_max_channels: env::var("SESSION_MAX_CHANNELS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SESSION_MAX_CHANNELS),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_defaults() {
        env::set_var("DISCORD_TOKEN", "test-token");
        env::set_var("OPENAI_API_KEY", "test-key");
        env::remove_var("OPENAI_MODEL");
        env::remove_var("LOG_LEVEL");
        env::remove_var("WIKI_API_URL");
        env::remove_var("WIKI_NAME");
        env::remove_var("PERSONA_LONG_NAME");
        env::remove_var("PERSONA_SHORT_NAME");
        env::remove_var("SESSION_MAX_CHANNELS");

        let config = Config::from_env().expect("config should load");
        assert_eq!(config.discord_token, "test-token");
        assert_eq!(config.openai_model, DEFAULT_MODEL);
        assert_eq!(config.log_level, "info");
        assert!(config.wiki_api_url.is_none());
        assert_eq!(config.wiki_name, "Harborpedia");
        assert_eq!(config.persona_long_name, "Joss Vega");
        assert_eq!(config.persona_short_name, "Joss");
        assert_eq!(config.session_max_channels, DEFAULT_SESSION_MAX_CHANNELS);

        env::remove_var("DISCORD_TOKEN");
        env::remove_var("OPENAI_API_KEY");
    }
}
