//! Cycle state tag.

use std::fmt;

/// State of an exchange cycle.
///
/// Transitions only move forward: `Request` → `Response` → `Closed`. A
/// rejected WebSocket or an aborted HTTP cycle goes straight from `Request`
/// to `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleState {
    /// Waiting for the application to start its reply.
    #[default]
    Request,
    /// Reply started (HTTP) or connection open (WebSocket).
    Response,
    /// Terminal. The accumulator is final.
    Closed,
}

impl CycleState {
    /// Whether this is the terminal state.
    pub fn is_closed(self) -> bool {
        self == Self::Closed
    }

    /// Whether moving to `next` keeps the forward-only ordering.
    pub fn can_advance_to(self, next: CycleState) -> bool {
        self.rank() <= next.rank()
    }

    fn rank(self) -> u8 {
        match self {
            Self::Request => 0,
            Self::Response => 1,
            Self::Closed => 2,
        }
    }
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request => write!(f, "REQUEST"),
            Self::Response => write!(f, "RESPONSE"),
            Self::Closed => write!(f, "CLOSED"),
        }
    }
}
