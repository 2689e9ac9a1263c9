//! Per-exchange scope.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of exchange a scope describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    Http,
    Websocket,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Websocket => write!(f, "websocket"),
        }
    }
}

/// Immutable metadata describing the incoming request or connection.
///
/// Built by the platform-event translator and handed to the application
/// as-is; cycles never modify it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    /// Exchange kind.
    #[serde(rename = "type")]
    pub kind: ScopeKind,
    /// HTTP version string (e.g. "1.1").
    #[serde(default = "default_http_version")]
    pub http_version: String,
    /// Request method, uppercase.
    #[serde(default = "default_method")]
    pub method: String,
    /// URL scheme.
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Request path, percent-decoded.
    pub path: String,
    /// Mount point of the application.
    #[serde(default)]
    pub root_path: String,
    /// Raw query string without the leading `?`.
    #[serde(default)]
    pub query_string: String,
    /// Request headers in arrival order.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    /// Client address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<(String, u16)>,
    /// Server address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<(String, u16)>,
    /// Platform-specific data (raw event, invocation context).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extensions: HashMap<String, serde_json::Value>,
}

fn default_http_version() -> String {
    "1.1".to_string()
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_scheme() -> String {
    "https".to_string()
}

impl Scope {
    /// Create an HTTP scope.
    pub fn http(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            kind: ScopeKind::Http,
            http_version: default_http_version(),
            method: method.into().to_uppercase(),
            scheme: default_scheme(),
            path: path.into(),
            root_path: String::new(),
            query_string: String::new(),
            headers: Vec::new(),
            client: None,
            server: None,
            extensions: HashMap::new(),
        }
    }

    /// Create a WebSocket scope.
    pub fn websocket(path: impl Into<String>) -> Self {
        Self {
            kind: ScopeKind::Websocket,
            scheme: "wss".to_string(),
            ..Self::http("GET", path)
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the query string.
    pub fn with_query_string(mut self, query: impl Into<String>) -> Self {
        self.query_string = query.into();
        self
    }

    /// Attach platform data under `key`.
    pub fn with_extension(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    /// Get a header value by name (case-insensitive). First match wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parse the method into a typed `http::Method`.
    pub fn http_method(&self) -> Option<http::Method> {
        http::Method::from_bytes(self.method.as_bytes()).ok()
    }

    /// Whether this scope describes a WebSocket connection.
    pub fn is_websocket(&self) -> bool {
        self.kind == ScopeKind::Websocket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_scope_defaults() {
        let scope = Scope::http("post", "/items");
        assert_eq!(scope.kind, ScopeKind::Http);
        assert_eq!(scope.method, "POST");
        assert_eq!(scope.http_method(), Some(http::Method::POST));
        assert_eq!(scope.http_version, "1.1");
        assert!(!scope.is_websocket());
    }

    #[test]
    fn test_websocket_scope() {
        let scope = Scope::websocket("/ws");
        assert!(scope.is_websocket());
        assert_eq!(scope.scheme, "wss");
        assert_eq!(scope.path, "/ws");
    }

    #[test]
    fn test_header_case_insensitive() {
        let scope = Scope::http("GET", "/").with_header("Content-Type", "text/html");
        assert_eq!(scope.header("content-type"), Some("text/html"));
        assert_eq!(scope.header("X-Missing"), None);
    }

    #[test]
    fn test_scope_serializes_kind_as_type() {
        let scope = Scope::http("GET", "/").with_query_string("a=1");
        let json = serde_json::to_value(&scope).unwrap();
        assert_eq!(json["type"], "http");
        assert_eq!(json["query_string"], "a=1");
        assert!(json.get("extensions").is_none());
    }

    #[test]
    fn test_scope_deserializes_with_defaults() {
        let scope: Scope =
            serde_json::from_str(r#"{"type": "websocket", "path": "/chat"}"#).unwrap();
        assert_eq!(scope.kind, ScopeKind::Websocket);
        assert_eq!(scope.method, "GET");
        assert!(scope.headers.is_empty());
    }

    #[test]
    fn test_extension_roundtrip_value() {
        let scope = Scope::http("GET", "/")
            .with_extension("aws.event", serde_json::json!({"requestContext": {}}));
        assert!(scope.extensions.contains_key("aws.event"));
    }
}
