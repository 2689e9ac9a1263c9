//! Exchange cycles for the invocation bridge.
//!
//! This crate owns the only stateful part of the bridge:
//! - `AppQueue` - FIFO of inbound messages for the application
//! - `HttpCycle` - One request/response exchange
//! - `WebSocketCycle` - Connect, accept or reject, close
//! - `Channel` / `Application` - The two sides of the message contract
//! - `run_http` / `run_websocket` - Drive an application through a cycle

mod channel;
mod driver;
mod http;
mod queue;
mod websocket;

pub use channel::*;
pub use driver::*;
pub use http::*;
pub use queue::*;
pub use websocket::*;
