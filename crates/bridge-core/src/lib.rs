//! Core types for bridging one HTTP or WebSocket exchange to a hosted
//! application.
//!
//! This crate provides:
//! - `Message` / `Payload` - Protocol events and their raw or decoded content
//! - `Scope` - Immutable per-exchange metadata
//! - `CycleState` - Shared state tag for both cycle kinds
//! - `HttpResponse` / `WebSocketOutcome` - Finished response accumulators
//! - `ProtocolError` - The single failure kind of a cycle
//! - `CycleConfig` - Tunables for cycles and the driver

mod config;
mod error;
mod message;
mod response;
mod scope;
mod state;

pub use config::*;
pub use error::*;
pub use message::*;
pub use response::*;
pub use scope::*;
pub use state::*;
