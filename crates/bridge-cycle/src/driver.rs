//! Runs a hosted application through one exchange.

use bridge_core::{CycleConfig, HttpResponse, Message, Payload, ProtocolError, Scope, WebSocketOutcome};
use bridge_observability::exchange_span;
use thiserror::Error;
use tracing::{debug, warn, Instrument, Span};

use crate::channel::Application;
use crate::http::HttpCycle;
use crate::websocket::WebSocketCycle;

/// Error type for a driven exchange.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Application error: {0}")]
    Application(anyhow::Error),

    #[error("Application finished without completing the response")]
    IncompleteResponse,
}

impl DriverError {
    /// Classify an application failure. A `ProtocolError` propagated out of
    /// the application keeps its protocol classification.
    fn from_application(err: anyhow::Error) -> Self {
        match err.downcast::<ProtocolError>() {
            Ok(protocol) => Self::Protocol(protocol),
            Err(other) => Self::Application(other),
        }
    }
}

/// Drive an HTTP exchange: deliver `body` as the request and return the
/// finished response.
///
/// The application runs until the cycle closes. It is then given
/// `config.shutdown_grace` to wind down after its disconnect message;
/// past that it is dropped.
pub async fn run_http<A>(
    app: &A,
    scope: Scope,
    body: Payload,
    config: &CycleConfig,
) -> Result<HttpResponse, DriverError>
where
    A: Application + ?Sized,
{
    let span = exchange_span(&scope);
    let cycle = HttpCycle::new(scope);
    cycle.put_message(Message::HttpRequest {
        body,
        more_body: false,
    });

    let mut app_run = app.call(cycle.scope(), &cycle).instrument(span.clone());

    tokio::select! {
        result = &mut app_run => {
            // The app may finish before the close is observed here.
            if let Err(err) = result {
                application_failed(&cycle, err, &span)?;
            }
        }
        _ = cycle.closed() => {
            match tokio::time::timeout(config.shutdown_grace(), &mut app_run).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => application_failed(&cycle, err, &span)?,
                Err(_) => {
                    warn!(
                        parent: &span,
                        grace_ms = config.shutdown_grace_ms,
                        "application still running after response, abandoning it"
                    );
                }
            }
        }
    }

    let response = cycle.response().ok_or(DriverError::IncompleteResponse)?;
    debug!(parent: &span, status = response.status_code, "http exchange complete");
    Ok(response)
}

/// An application error is surfaced unless the response already completed,
/// in which case it is only logged.
fn application_failed(cycle: &HttpCycle, err: anyhow::Error, span: &Span) -> Result<(), DriverError> {
    if cycle.response().is_none() {
        return Err(DriverError::from_application(err));
    }
    warn!(parent: span, error = %err, "application failed after response completed");
    Ok(())
}

/// Drive a WebSocket connect exchange and report whether the application
/// accepted, rejected or closed the connection.
///
/// Returns as soon as the handshake is decided. An application that
/// returns without deciding is treated as rejecting.
pub async fn run_websocket<A>(
    app: &A,
    scope: Scope,
    config: &CycleConfig,
) -> Result<WebSocketOutcome, DriverError>
where
    A: Application + ?Sized,
{
    let span = exchange_span(&scope);
    let cycle = WebSocketCycle::with_close_code(scope, config.default_close_code);
    cycle.put_message(Message::WebSocketConnect);

    let app_run = app.call(cycle.scope(), &cycle).instrument(span.clone());

    tokio::select! {
        result = app_run => {
            result.map_err(DriverError::from_application)?;
        }
        _ = cycle.handshake_complete() => {}
    }

    let outcome = cycle.outcome();
    debug!(parent: &span, ?outcome, "websocket handshake complete");
    Ok(outcome)
}
