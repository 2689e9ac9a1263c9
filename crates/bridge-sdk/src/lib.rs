//! Public SDK for the invocation bridge.
//!
//! This crate re-exports all bridge functionality:
//!
//! ```ignore
//! use bridge_sdk::prelude::*;
//!
//! let config = BridgeConfig::load("bridge.toml")?;
//! bridge_sdk::init_logging(&config)?;
//!
//! let scope = Scope::http("GET", "/health");
//! let response = run_http(&app, scope, Payload::empty(), &config.cycle).await?;
//! println!("{}", response.to_json()?);
//! ```

mod config;

pub use bridge_core;
pub use bridge_cycle;
pub use bridge_observability;
pub use config::*;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::*;
    pub use bridge_core::*;
    pub use bridge_cycle::*;
    pub use bridge_observability::*;
}
