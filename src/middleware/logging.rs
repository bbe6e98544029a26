//! Logging middleware
//!
//! This module provides logging middleware for tracking turns, reply counts,
//! turn duration and failures.

use std::time::Instant;
use chrono::{DateTime, Utc};
use tracing::{info, debug, warn, error, Span, instrument};

use crate::models::Activity;
use crate::utils::errors::BotError;
use crate::utils::helpers::truncate_text;

/// Longest utterance excerpt written to the log
const MAX_LOGGED_TEXT: usize = 80;

/// Logging middleware for bot turns
#[derive(Debug, Clone)]
pub struct LoggingMiddleware {
    log_user_interactions: bool,
    log_performance: bool,
    log_errors: bool,
}

impl LoggingMiddleware {
    /// Create a new LoggingMiddleware instance
    pub fn new(log_user_interactions: bool, log_performance: bool, log_errors: bool) -> Self {
        Self {
            log_user_interactions,
            log_performance,
            log_errors,
        }
    }

    /// Log an inbound activity
    #[instrument(skip(self, activity), fields(activity_id = %activity.id))]
    pub fn log_activity(&self, activity: &Activity) {
        if !self.log_user_interactions {
            return;
        }

        match activity.text() {
            Some(text) => info!(
                conversation_id = %activity.conversation.id,
                user_id = %activity.from.id,
                kind = %activity.kind,
                text = %truncate_text(text, MAX_LOGGED_TEXT),
                "Activity received"
            ),
            None => info!(
                conversation_id = %activity.conversation.id,
                user_id = %activity.from.id,
                kind = %activity.kind,
                members_added = activity.members_added.len(),
                "Activity received"
            ),
        }
    }

    /// Log the replies produced by a turn that began at `started_at`
    pub fn log_replies(&self, activity: &Activity, replies: &[String], started_at: DateTime<Utc>) {
        if !self.log_user_interactions {
            return;
        }

        let turn_ms = (Utc::now() - started_at).num_milliseconds();
        if replies.is_empty() {
            debug!(
                conversation_id = %activity.conversation.id,
                turn_ms = turn_ms,
                "Turn produced no replies"
            );
        } else {
            info!(
                conversation_id = %activity.conversation.id,
                replies = replies.len(),
                turn_ms = turn_ms,
                "Turn replied"
            );
        }
    }

    /// Log error with context
    #[instrument(skip(self, error))]
    pub fn log_error(&self, error: &BotError, context: &str, conversation_id: Option<&str>) {
        if !self.log_errors {
            return;
        }

        error!(
            error = %error,
            severity = %error.severity(),
            recoverable = error.is_recoverable(),
            context = context,
            conversation_id = conversation_id,
            "Error occurred"
        );
    }

    /// Create a performance tracking span
    pub fn create_performance_span(&self, operation: &str) -> Option<PerformanceTracker> {
        if self.log_performance {
            Some(PerformanceTracker::new(operation.to_string()))
        } else {
            None
        }
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new(true, true, true)
    }
}

/// Performance tracker for measuring operation duration
pub struct PerformanceTracker {
    operation: String,
    start_time: Instant,
    span: Span,
}

impl PerformanceTracker {
    fn new(operation: String) -> Self {
        let span = tracing::info_span!("performance", operation = %operation);

        Self {
            operation,
            start_time: Instant::now(),
            span,
        }
    }

    /// Complete the performance tracking and log the result
    pub fn complete(self, success: bool) {
        let _entered = self.span.enter();
        let duration_ms = self.start_time.elapsed().as_millis();

        if success {
            debug!(
                operation = %self.operation,
                duration_ms = duration_ms,
                "Operation completed successfully"
            );
        } else {
            warn!(
                operation = %self.operation,
                duration_ms = duration_ms,
                "Operation failed"
            );
        }

        // Log slow operations
        if duration_ms > 1000 {
            warn!(
                operation = %self.operation,
                duration_ms = duration_ms,
                "Slow operation detected"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_middleware_creation() {
        let middleware = LoggingMiddleware::new(true, false, true);
        assert!(middleware.log_user_interactions);
        assert!(!middleware.log_performance);
        assert!(middleware.log_errors);
        assert!(middleware.create_performance_span("turn").is_none());
    }

    #[test]
    fn test_performance_tracker() {
        let tracker = PerformanceTracker::new("test_operation".to_string());
        std::thread::sleep(std::time::Duration::from_millis(10));
        tracker.complete(true);
    }

    #[test]
    fn test_performance_span_is_entered_on_complete() {
        use std::sync::{Arc, Mutex};
        use tracing::span::Id;
        use tracing::Subscriber;
        use tracing_subscriber::layer::{Context, SubscriberExt};
        use tracing_subscriber::registry::LookupSpan;
        use tracing_subscriber::Layer;

        struct EnteredSpans(Arc<Mutex<Vec<String>>>);

        impl<S> Layer<S> for EnteredSpans
        where
            S: Subscriber + for<'a> LookupSpan<'a>,
        {
            fn on_enter(&self, id: &Id, ctx: Context<'_, S>) {
                if let Some(span) = ctx.span(id) {
                    self.0.lock().unwrap().push(span.name().to_string());
                }
            }
        }

        let entered = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(EnteredSpans(Arc::clone(&entered)));

        tracing::subscriber::with_default(subscriber, || {
            let tracker = PerformanceTracker::new("turn".to_string());
            tracker.complete(false);
        });

        assert_eq!(*entered.lock().unwrap(), ["performance"]);
    }

    #[test]
    fn test_logging_does_not_panic_without_subscriber() {
        let middleware = LoggingMiddleware::default();
        let activity = Activity::message("console", "c", "u", "hello there");
        middleware.log_activity(&activity);
        middleware.log_replies(&activity, &["hi".to_string()], Utc::now());
        middleware.log_error(&BotError::Storage("down".to_string()), "turn", Some("c"));
        assert!(middleware.create_performance_span("turn").is_some());
    }
}
