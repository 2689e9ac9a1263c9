//! Per-exchange tracing span.

use bridge_core::Scope;
use tracing::Span;

/// Span covering a single exchange, tagged with what the scope describes.
pub fn exchange_span(scope: &Scope) -> Span {
    tracing::info_span!(
        "exchange",
        kind = %scope.kind,
        method = %scope.method,
        path = %scope.path,
    )
}
