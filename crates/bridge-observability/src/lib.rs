//! Observability for the invocation bridge.
//!
//! This crate provides:
//! - `LoggingConfig` / `LogLevel` / `LogFormat` - Log output settings
//! - `init` - Installs the global `tracing` subscriber
//! - `exchange_span` - Span wrapping one exchange

mod logging;
mod span;

pub use logging::*;
pub use span::*;
