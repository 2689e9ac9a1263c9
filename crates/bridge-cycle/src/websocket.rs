//! WebSocket connect/accept/close cycle.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bridge_core::{CycleState, Message, ProtocolError, Scope, WebSocketOutcome, DEFAULT_CLOSE_CODE};
use tokio::sync::watch;
use tracing::debug;

use crate::channel::Channel;
use crate::queue::AppQueue;

/// What the application has told us about the connection so far.
#[derive(Debug, Default)]
struct Handshake {
    accepted: bool,
    subprotocol: Option<String>,
    close_code: Option<u16>,
    close_reason: Option<String>,
}

/// State machine for a WebSocket connect exchange.
///
/// From `Request`, an accept or a close opens the connection and any other
/// message rejects it. A close then always ends in `Closed`. While the
/// connection is open, outbound frames are accepted and dropped: this
/// cycle only models connect, accept or reject, and close.
#[derive(Debug)]
pub struct WebSocketCycle {
    scope: Scope,
    queue: AppQueue,
    state: watch::Sender<CycleState>,
    handshake: Mutex<Handshake>,
    default_close_code: u16,
}

impl WebSocketCycle {
    /// Create a cycle for `scope`.
    pub fn new(scope: Scope) -> Self {
        Self::with_close_code(scope, DEFAULT_CLOSE_CODE)
    }

    /// Create a cycle recording `code` for closes that carry none.
    pub fn with_close_code(scope: Scope, code: u16) -> Self {
        let (state, _) = watch::channel(CycleState::Request);
        Self {
            scope,
            queue: AppQueue::new(),
            state,
            handshake: Mutex::new(Handshake::default()),
            default_close_code: code,
        }
    }

    /// The connection scope.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Current state.
    pub fn state(&self) -> CycleState {
        *self.state.borrow()
    }

    /// Queue an inbound message for the application. Dropped once closed.
    pub fn put_message(&self, message: Message) {
        if self.state().is_closed() {
            debug!(message_type = message.message_type(), "connection closed, dropping inbound message");
            return;
        }
        self.queue.push(message);
    }

    /// Number of inbound messages waiting for the application.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Wait for the next inbound message.
    pub async fn receive(&self) -> Message {
        self.queue.receive().await
    }

    /// Apply an outbound message. Fails once the connection is closed.
    pub async fn send(&self, message: Message) -> Result<(), ProtocolError> {
        self.apply(message)
    }

    /// Resolves once the application has accepted or rejected.
    pub async fn handshake_complete(&self) {
        let mut state = self.state.subscribe();
        let _ = state.wait_for(|s| *s != CycleState::Request).await;
    }

    /// Resolves once the connection is closed.
    pub async fn closed(&self) {
        let mut state = self.state.subscribe();
        let _ = state.wait_for(|s| s.is_closed()).await;
    }

    /// Recorded close code, if the application sent a close.
    pub fn close_code(&self) -> Option<u16> {
        self.lock().close_code
    }

    /// The connection outcome as of now. A cycle still waiting on the
    /// handshake reports `Rejected`.
    pub fn outcome(&self) -> WebSocketOutcome {
        let handshake = self.lock();
        match self.state() {
            CycleState::Request => WebSocketOutcome::Rejected,
            CycleState::Response => WebSocketOutcome::Accepted {
                subprotocol: handshake.subprotocol.clone(),
            },
            CycleState::Closed => match handshake.close_code {
                Some(code) if handshake.accepted => WebSocketOutcome::Closed {
                    code,
                    reason: handshake.close_reason.clone(),
                },
                _ => WebSocketOutcome::Rejected,
            },
        }
    }

    fn apply(&self, message: Message) -> Result<(), ProtocolError> {
        let mut handshake = self.lock();
        let current = self.state();

        if current.is_closed() {
            return Err(ProtocolError::closed(message.message_type()));
        }

        let mut next = current;
        if current == CycleState::Request {
            match &message {
                Message::WebSocketAccept { subprotocol } => {
                    handshake.accepted = true;
                    handshake.subprotocol = subprotocol.clone();
                    next = CycleState::Response;
                }
                Message::WebSocketClose { .. } => {
                    handshake.accepted = true;
                    next = CycleState::Response;
                }
                other => {
                    debug!(message_type = other.message_type(), "no accept, rejecting connection");
                    next = CycleState::Closed;
                }
            }
        } else if !matches!(message, Message::WebSocketClose { .. }) {
            // Open connection: outbound frames are not relayed.
            debug!(message_type = message.message_type(), "ignoring outbound message on open connection");
        }

        if let Message::WebSocketClose { code, reason } = message {
            handshake.close_code = Some(code.unwrap_or(self.default_close_code));
            handshake.close_reason = reason;
            next = CycleState::Closed;
        }

        debug_assert!(current.can_advance_to(next));
        if next != current {
            debug!(from = %current, to = %next, "websocket cycle transition");
            self.state.send_replace(next);
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Handshake> {
        self.handshake.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Channel for WebSocketCycle {
    async fn receive(&self) -> Message {
        WebSocketCycle::receive(self).await
    }

    async fn send(&self, message: Message) -> Result<(), ProtocolError> {
        WebSocketCycle::send(self, message).await
    }
}
