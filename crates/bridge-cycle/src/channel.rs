//! The two sides of the message contract.

use async_trait::async_trait;
use bridge_core::{Message, ProtocolError, Scope};

/// What the hosted application sees of a cycle.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Wait for the next inbound message.
    async fn receive(&self) -> Message;

    /// Emit an outbound message.
    async fn send(&self, message: Message) -> Result<(), ProtocolError>;
}

/// A hosted application.
///
/// Called once per exchange with the scope and the cycle's channel.
/// Errors returned from `send` should be propagated so the driver can
/// surface them as protocol failures.
#[async_trait]
pub trait Application: Send + Sync {
    async fn call(&self, scope: &Scope, channel: &dyn Channel) -> anyhow::Result<()>;
}
