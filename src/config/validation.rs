//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{BotError, Result};
use super::{Settings, StorageBackend};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_logging_config(&settings.logging)?;

    if settings.storage.backend == StorageBackend::Redis {
        validate_redis_config(&settings.redis)?;
    }

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.description_member_id.trim().is_empty() {
        return Err(BotError::Config(
            "Description member id must not be empty".to_string()
        ));
    }

    if config.channel_id.trim().is_empty() {
        return Err(BotError::Config(
            "Channel id is required".to_string()
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(BotError::Config(
            "Redis URL is required".to_string()
        ));
    }

    if config.ttl_seconds == 0 {
        return Err(BotError::Config(
            "Redis TTL must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(BotError::Config(
            "Log level is required".to_string()
        ));
    }

    if let Err(e) = tracing_subscriber::EnvFilter::try_new(&config.level) {
        return Err(BotError::Config(
            format!("Invalid log filter '{}': {}", config.level, e)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(validate_settings(&Settings::default()).is_ok());
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut settings = Settings::default();
        settings.logging.level = "info,multiturn_prompts_bot=loud".to_string();
        assert_matches!(validate_settings(&settings), Err(BotError::Config(_)));

        settings.logging.level = String::new();
        assert_matches!(validate_settings(&settings), Err(BotError::Config(_)));
    }

    #[test]
    fn test_accepts_filter_directives() {
        let mut settings = Settings::default();
        settings.logging.level = "info,multiturn_prompts_bot=debug".to_string();
        assert!(validate_settings(&settings).is_ok());

        settings.logging.level = "warn".to_string();
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_redis_checked_only_when_selected() {
        let mut settings = Settings::default();
        settings.redis.url.clear();
        assert!(validate_settings(&settings).is_ok());

        settings.storage.backend = StorageBackend::Redis;
        assert_matches!(validate_settings(&settings), Err(BotError::Config(_)));

        settings.redis.url = "redis://localhost:6379".to_string();
        settings.redis.ttl_seconds = 0;
        assert_matches!(validate_settings(&settings), Err(BotError::Config(_)));
    }

    #[test]
    fn test_rejects_blank_sentinel() {
        let mut settings = Settings::default();
        settings.bot.description_member_id = "  ".to_string();
        assert_matches!(validate_settings(&settings), Err(BotError::Config(_)));
    }
}
