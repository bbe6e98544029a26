//! Middleware module
//!
//! Cross-cutting concerns wrapped around every turn.

pub mod logging;

pub use logging::{LoggingMiddleware, PerformanceTracker};
