//! Protocol messages exchanged between a cycle and the hosted application.

use crate::error::ProtocolError;

/// Content that may arrive either as raw transport bytes or as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Raw bytes as they came off the transport.
    Bytes(Vec<u8>),
    /// Already-decoded text.
    Text(String),
}

impl Payload {
    /// An empty text payload.
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    /// Decode into text. Bytes are interpreted as UTF-8.
    ///
    /// `field` names the decoded value in the error.
    pub fn into_text(self, field: &'static str) -> Result<String, ProtocolError> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Bytes(bytes) => {
                String::from_utf8(bytes).map_err(|e| ProtocolError::InvalidEncoding {
                    field,
                    reason: e.utf8_error().to_string(),
                })
            }
        }
    }

    /// Borrow the payload as bytes regardless of variant.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Bytes(bytes) => bytes,
            Self::Text(text) => text.as_bytes(),
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Payload {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Payload {
    fn from(bytes: &[u8; N]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

/// Header pair as carried on the wire.
pub type RawHeader = (Payload, Payload);

/// Type names of the messages this core understands.
pub mod message_types {
    pub const HTTP_REQUEST: &str = "http.request";
    pub const HTTP_RESPONSE_START: &str = "http.response.start";
    pub const HTTP_RESPONSE_BODY: &str = "http.response.body";
    pub const HTTP_DISCONNECT: &str = "http.disconnect";
    pub const WEBSOCKET_CONNECT: &str = "websocket.connect";
    pub const WEBSOCKET_ACCEPT: &str = "websocket.accept";
    pub const WEBSOCKET_SEND: &str = "websocket.send";
    pub const WEBSOCKET_CLOSE: &str = "websocket.close";
    pub const WEBSOCKET_DISCONNECT: &str = "websocket.disconnect";
}

/// A single protocol event. Produced once, consumed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Inbound request body.
    HttpRequest { body: Payload, more_body: bool },
    /// Outbound status line and headers.
    HttpResponseStart { status: u16, headers: Vec<RawHeader> },
    /// Outbound response body.
    HttpResponseBody { body: Payload, more_body: bool },
    /// Inbound notice that the exchange is over.
    HttpDisconnect,
    /// Inbound connection attempt.
    WebSocketConnect,
    /// Outbound handshake acceptance.
    WebSocketAccept { subprotocol: Option<String> },
    /// Outbound frame.
    WebSocketSend { payload: Payload },
    /// Outbound close, optionally with a close code.
    WebSocketClose {
        code: Option<u16>,
        reason: Option<String>,
    },
    /// Inbound notice that the peer went away.
    WebSocketDisconnect { code: u16 },
    /// Any type tag this core does not recognise.
    Other { message_type: String },
}

impl Message {
    /// The protocol type name of this message.
    pub fn message_type(&self) -> &str {
        use message_types::*;

        match self {
            Self::HttpRequest { .. } => HTTP_REQUEST,
            Self::HttpResponseStart { .. } => HTTP_RESPONSE_START,
            Self::HttpResponseBody { .. } => HTTP_RESPONSE_BODY,
            Self::HttpDisconnect => HTTP_DISCONNECT,
            Self::WebSocketConnect => WEBSOCKET_CONNECT,
            Self::WebSocketAccept { .. } => WEBSOCKET_ACCEPT,
            Self::WebSocketSend { .. } => WEBSOCKET_SEND,
            Self::WebSocketClose { .. } => WEBSOCKET_CLOSE,
            Self::WebSocketDisconnect { .. } => WEBSOCKET_DISCONNECT,
            Self::Other { message_type } => message_type.as_str(),
        }
    }

    /// A complete, single-chunk request body.
    pub fn request(body: impl Into<Payload>) -> Self {
        Self::HttpRequest {
            body: body.into(),
            more_body: false,
        }
    }

    /// A response start with the given status and headers.
    pub fn response_start<K, V>(status: u16, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Payload>,
        V: Into<Payload>,
    {
        Self::HttpResponseStart {
            status,
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// A final response body.
    pub fn response_body(body: impl Into<Payload>) -> Self {
        Self::HttpResponseBody {
            body: body.into(),
            more_body: false,
        }
    }

    /// A handshake acceptance without a subprotocol.
    pub fn accept() -> Self {
        Self::WebSocketAccept { subprotocol: None }
    }

    /// A close with an optional code.
    pub fn close(code: Option<u16>) -> Self {
        Self::WebSocketClose { code, reason: None }
    }

    /// A message with an arbitrary type tag.
    pub fn other(message_type: impl Into<String>) -> Self {
        Self::Other {
            message_type: message_type.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Payload Tests ===

    #[test]
    fn test_payload_text_passes_through() {
        let payload = Payload::from("hello");
        assert_eq!(payload.into_text("body").unwrap(), "hello");
    }

    #[test]
    fn test_payload_bytes_decode_utf8() {
        let payload = Payload::from("héllo".as_bytes());
        assert_eq!(payload.into_text("body").unwrap(), "héllo");
    }

    #[test]
    fn test_payload_invalid_utf8_names_field() {
        let payload = Payload::from(vec![0xffu8, 0xfe]);
        let err = payload.into_text("header value").unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::InvalidEncoding {
                field: "header value",
                ..
            }
        ));
    }

    #[test]
    fn test_payload_len() {
        assert_eq!(Payload::from(b"abc").len(), 3);
        assert!(Payload::empty().is_empty());
        assert_eq!(Payload::default(), Payload::Text(String::new()));
    }

    // === Message Tests ===

    #[test]
    fn test_message_type_names() {
        assert_eq!(Message::request("").message_type(), "http.request");
        assert_eq!(
            Message::response_start(200, Vec::<(&str, &str)>::new()).message_type(),
            "http.response.start"
        );
        assert_eq!(Message::response_body("").message_type(), "http.response.body");
        assert_eq!(Message::HttpDisconnect.message_type(), "http.disconnect");
        assert_eq!(Message::WebSocketConnect.message_type(), "websocket.connect");
        assert_eq!(Message::accept().message_type(), "websocket.accept");
        assert_eq!(Message::close(None).message_type(), "websocket.close");
        assert_eq!(Message::other("unknown").message_type(), "unknown");
    }

    #[test]
    fn test_response_start_collects_headers() {
        let message = Message::response_start(201, [(&b"content-type"[..], &b"text/plain"[..])]);
        match message {
            Message::HttpResponseStart { status, headers } => {
                assert_eq!(status, 201);
                assert_eq!(headers.len(), 1);
                assert_eq!(headers[0].0, Payload::Bytes(b"content-type".to_vec()));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
