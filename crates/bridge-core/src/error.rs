//! Protocol error type.

use thiserror::Error;

/// Raised when a cycle receives a message it cannot accept in its
/// current state.
///
/// Always fatal for the cycle: nothing in this crate retries or
/// recovers from it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The message type is not the one the current state expects.
    #[error("Expected '{expected}', received: {received}")]
    UnexpectedMessage {
        expected: &'static str,
        received: String,
    },

    /// A message was sent on a connection that is already closed.
    #[error("Unexpected message '{received}', connection is closed")]
    ConnectionClosed { received: String },

    /// Transport bytes could not be decoded as UTF-8.
    #[error("Invalid UTF-8 in {field}: {reason}")]
    InvalidEncoding { field: &'static str, reason: String },
}

impl ProtocolError {
    /// Create an unexpected-message error.
    pub fn unexpected(expected: &'static str, received: impl Into<String>) -> Self {
        Self::UnexpectedMessage {
            expected,
            received: received.into(),
        }
    }

    /// Create a closed-connection error.
    pub fn closed(received: impl Into<String>) -> Self {
        Self::ConnectionClosed {
            received: received.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_message_display() {
        let err = ProtocolError::unexpected("http.response.start", "http.response.body");
        assert_eq!(
            err.to_string(),
            "Expected 'http.response.start', received: http.response.body"
        );
    }

    #[test]
    fn test_closed_display_names_message() {
        let err = ProtocolError::closed("websocket.send");
        assert!(err.to_string().contains("websocket.send"));
        assert!(err.to_string().contains("closed"));
    }
}
