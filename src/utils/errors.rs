//! Error handling for the prompts bot
//!
//! This module defines the main error type used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the prompts bot
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Unknown dialog: {0}")]
    UnknownDialog(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, BotError>;

impl BotError {
    /// Check if the error is recoverable
    ///
    /// A recoverable error aborts the current turn only; the host keeps
    /// accepting activities afterwards.
    pub fn is_recoverable(&self) -> bool {
        match self {
            BotError::Config(_) => false,
            BotError::ConfigLoad(_) => false,
            BotError::Redis(_) => true,
            BotError::Serialization(_) => false,
            BotError::Io(_) => true,
            BotError::Storage(_) => true,
            BotError::UnknownDialog(_) => false,
            BotError::InvalidStateTransition { .. } => false,
            BotError::InvalidInput(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BotError::Config(_) => ErrorSeverity::Critical,
            BotError::ConfigLoad(_) => ErrorSeverity::Critical,
            BotError::InvalidInput(_) => ErrorSeverity::Info,
            BotError::Storage(_) | BotError::Redis(_) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let err = BotError::Config("missing".to_string());
        assert!(!err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Critical);

        let err = BotError::Storage("unavailable".to_string());
        assert!(err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = BotError::UnknownDialog("nope".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Error);
        assert_eq!(err.to_string(), "Unknown dialog: nope");
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(ErrorSeverity::Warning.to_string(), "WARN");
        assert_eq!(ErrorSeverity::Critical.to_string(), "CRITICAL");
    }
}
