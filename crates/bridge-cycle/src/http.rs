//! HTTP request/response cycle.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bridge_core::message_types::{HTTP_RESPONSE_BODY, HTTP_RESPONSE_START};
use bridge_core::{CycleState, HttpResponse, Message, ProtocolError, RawHeader, Scope};
use tokio::sync::watch;
use tracing::debug;

use crate::channel::Channel;
use crate::queue::AppQueue;

/// State machine for a single HTTP exchange.
///
/// `Request` accepts only a response start, `Response` accepts only a
/// response body, and the body closes the cycle. Only one body chunk is
/// ever taken: `more_body` is not consulted, so the reply is always the
/// first chunk the application sends.
///
/// A rejected send aborts the cycle: it closes without a response, and
/// later sends are discarded.
#[derive(Debug)]
pub struct HttpCycle {
    scope: Scope,
    queue: AppQueue,
    state: watch::Sender<CycleState>,
    accumulator: Mutex<Accumulator>,
}

#[derive(Debug, Default)]
struct Accumulator {
    response: HttpResponse,
    aborted: bool,
}

impl HttpCycle {
    /// Create a cycle for `scope`.
    pub fn new(scope: Scope) -> Self {
        let (state, _) = watch::channel(CycleState::Request);
        Self {
            scope,
            queue: AppQueue::new(),
            state,
            accumulator: Mutex::new(Accumulator::default()),
        }
    }

    /// The exchange scope.
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
            debug!(message_type = message.message_type(), "cycle closed, dropping inbound message");
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

    /// Fold an outbound message into the response.
    pub async fn send(&self, message: Message) -> Result<(), ProtocolError> {
        self.apply(message)
    }

    /// Resolves once the cycle is closed.
    pub async fn closed(&self) {
        let mut state = self.state.subscribe();
        // The sender lives in `self`, so this cannot fail while we wait.
        let _ = state.wait_for(|s| s.is_closed()).await;
    }

    /// The finished response, once the cycle has closed normally.
    pub fn response(&self) -> Option<HttpResponse> {
        let accumulator = self.lock();
        if self.state().is_closed() && !accumulator.aborted {
            Some(accumulator.response.clone())
        } else {
            None
        }
    }

    /// The response as accumulated so far.
    pub fn accumulated(&self) -> HttpResponse {
        self.lock().response.clone()
    }

    /// Whether a protocol error aborted the cycle.
    pub fn is_aborted(&self) -> bool {
        self.lock().aborted
    }

    fn apply(&self, message: Message) -> Result<(), ProtocolError> {
        let mut accumulator = self.lock();
        let current = self.state();
        let next = match advance(current, message, &mut accumulator.response) {
            Ok(next) => next,
            Err(err) => {
                debug!(state = %current, error = %err, "aborting http cycle");
                accumulator.aborted = true;
                self.transition(current, CycleState::Closed);
                return Err(err);
            }
        };

        self.transition(current, next);
        Ok(())
    }

    fn transition(&self, current: CycleState, next: CycleState) {
        debug_assert!(current.can_advance_to(next));
        if next != current {
            debug!(from = %current, to = %next, "http cycle transition");
            self.state.send_replace(next);
            if next.is_closed() {
                // Bypasses the closed check in `put_message`: this is the
                // one message allowed in after close.
                self.queue.push(Message::HttpDisconnect);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Accumulator> {
        self.accumulator.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Channel for HttpCycle {
    async fn receive(&self) -> Message {
        HttpCycle::receive(self).await
    }

    async fn send(&self, message: Message) -> Result<(), ProtocolError> {
        HttpCycle::send(self, message).await
    }
}

/// Transition function: returns the next state, updating `response`.
fn advance(
    state: CycleState,
    message: Message,
    response: &mut HttpResponse,
) -> Result<CycleState, ProtocolError> {
    match state {
        CycleState::Request => match message {
            Message::HttpResponseStart { status, headers } => {
                let headers = decode_headers(headers)?;
                response.status_code = status;
                response.headers = headers;
                response.is_base64_encoded = false;
                Ok(CycleState::Response)
            }
            other => Err(ProtocolError::unexpected(
                HTTP_RESPONSE_START,
                other.message_type(),
            )),
        },
        CycleState::Response => match message {
            Message::HttpResponseBody { body, .. } => {
                response.body = body.into_text("body")?;
                Ok(CycleState::Closed)
            }
            other => Err(ProtocolError::unexpected(
                HTTP_RESPONSE_BODY,
                other.message_type(),
            )),
        },
        CycleState::Closed => {
            debug!(
                message_type = message.message_type(),
                "response already complete, discarding outbound message"
            );
            Ok(CycleState::Closed)
        }
    }
}

fn decode_headers(headers: Vec<RawHeader>) -> Result<HashMap<String, String>, ProtocolError> {
    headers
        .into_iter()
        .map(|(name, value)| {
            let name = name.into_text("header name")?;
            let value = value.into_text("header value")?;
            Ok::<_, ProtocolError>((name, value))
        })
        .collect()
}
