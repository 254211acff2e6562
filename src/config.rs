//! # Configuration Module
//!
//! Startup configuration read once from the process environment (and an
//! optional `.env` file). A missing token is fatal.

use std::str::FromStr;

use crate::errors::ConfigError;

/// Primary variable holding the bot token
pub const TOKEN_VAR: &str = "TELEGRAM_BOT_KEY";
/// Fallback variable, teloxide's conventional name
pub const FALLBACK_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub const LOG_FORMAT_VAR: &str = "BOT_LOG_FORMAT";

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::InvalidLogFormat(other.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_token", &mask_token(&self.bot_token))
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl BotConfig {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup(TOKEN_VAR)
            .or_else(|| lookup(FALLBACK_TOKEN_VAR))
            .ok_or(ConfigError::MissingToken)?;
        let bot_token = bot_token.trim().to_string();
        if bot_token.is_empty() {
            return Err(ConfigError::EmptyToken);
        }

        let log_format = match lookup(LOG_FORMAT_VAR) {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bot_token,
            log_format,
        })
    }
}

/// Keep only the bot id part of a token (`123456:***`)
fn mask_token(token: &str) -> String {
    match token.split_once(':') {
        Some((id, _)) => format!("{id}:***"),
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_primary_token_wins() {
        let config = BotConfig::from_lookup(lookup_from(&[
            (TOKEN_VAR, "111:primary"),
            (FALLBACK_TOKEN_VAR, "222:fallback"),
        ]))
        .unwrap();
        assert_eq!(config.bot_token, "111:primary");
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_fallback_token() {
        let config =
            BotConfig::from_lookup(lookup_from(&[(FALLBACK_TOKEN_VAR, " 222:fallback ")])).unwrap();
        assert_eq!(config.bot_token, "222:fallback");
    }

    #[test]
    fn test_missing_and_empty_token() {
        assert_eq!(
            BotConfig::from_lookup(lookup_from(&[])).unwrap_err(),
            ConfigError::MissingToken
        );
        assert_eq!(
            BotConfig::from_lookup(lookup_from(&[(TOKEN_VAR, "   ")])).unwrap_err(),
            ConfigError::EmptyToken
        );
    }

    #[test]
    fn test_log_format() {
        let config =
            BotConfig::from_lookup(lookup_from(&[(TOKEN_VAR, "1:a"), (LOG_FORMAT_VAR, "JSON")]))
                .unwrap();
        assert_eq!(config.log_format, LogFormat::Json);

        let err = BotConfig::from_lookup(lookup_from(&[(TOKEN_VAR, "1:a"), (LOG_FORMAT_VAR, "xml")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidLogFormat("xml".to_string()));
    }

    #[test]
    fn test_debug_masks_token() {
        let config = BotConfig::from_lookup(lookup_from(&[(TOKEN_VAR, "123456:SECRET")])).unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("123456:***"));
        assert!(!debug.contains("SECRET"));
    }
}
