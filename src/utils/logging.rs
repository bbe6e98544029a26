//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the prompts bot.

use tracing::{info, warn, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use crate::config::LoggingConfig;
use crate::utils::errors::{BotError, Result};

/// Initialize logging based on configuration
///
/// Console output goes to stderr. Hold the returned guard for the lifetime
/// of the process when a log file is configured.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| BotError::Config(format!("Invalid log filter '{}': {}", config.level, e)))?;

    let console_layer = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    let (file_layer, guard) = match &config.file_path {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "promptbot.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| BotError::Config(format!("Failed to install log subscriber: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log an inbound activity entering the turn pipeline
pub fn log_turn_started(conversation_id: &str, user_id: &str, kind: &str) {
    debug!(
        conversation_id = conversation_id,
        user_id = user_id,
        kind = kind,
        "Turn started"
    );
}

/// Log dialog stack events (begin, end, cancel)
pub fn log_dialog_event(conversation_id: &str, dialog: &str, event: &str, depth: usize) {
    info!(
        conversation_id = conversation_id,
        dialog = dialog,
        event = event,
        stack_depth = depth,
        "Dialog event"
    );
}

/// Log a prompt rejecting the user's reply
pub fn log_prompt_retry(conversation_id: &str, dialog: &str, attempts: u32) {
    warn!(
        conversation_id = conversation_id,
        dialog = dialog,
        attempts = attempts,
        "Prompt input rejected, re-prompting"
    );
}

/// Log state persistence
pub fn log_state_saved(key: &str, properties: usize) {
    debug!(
        key = key,
        properties = properties,
        "State saved"
    );
}
