use std::time::Duration;

use thiserror::Error;

/// Failure of a single request/response call across the backend boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Backend unreachable or the call itself failed.
    #[error("gateway transport error: {0}")]
    Transport(String),

    #[error("gateway call timed out after {0:?}")]
    Timeout(Duration),

    #[error("not found: {0}")]
    NotFound(String),

    /// Backend answered with something that is not a catalog payload.
    #[error("malformed gateway response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Whether repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Transport(_) | GatewayError::Timeout(_))
    }
}
