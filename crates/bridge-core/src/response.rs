//! Response accumulators handed to the platform-reply serializer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Accumulated HTTP response.
///
/// Filled in by successive sends on an HTTP cycle; final only once the
/// cycle is closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Decoded headers. Later duplicates replace earlier ones.
    pub headers: HashMap<String, String>,
    /// Decoded body.
    pub body: String,
    /// Whether `body` is base64-encoded binary.
    pub is_base64_encoded: bool,
}

impl HttpResponse {
    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Get a header value (case-insensitive).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Serialize into the platform reply shape.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Result of a WebSocket connect exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum WebSocketOutcome {
    /// Handshake accepted, connection open.
    Accepted { subprotocol: Option<String> },
    /// Handshake refused, or never decided.
    Rejected,
    /// Connection closed by the application.
    Closed { code: u16, reason: Option<String> },
}

impl WebSocketOutcome {
    /// Whether the handshake went through.
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Rejected)
    }

    /// Close code, if the application closed the connection.
    pub fn close_code(&self) -> Option<u16> {
        match self {
            Self::Closed { code, .. } => Some(*code),
            _ => None,
        }
    }
}
