//! Store-level error taxonomy.
//!
//! Both variants are recoverable: the store clears its loading flag, keeps
//! its previous collection and `is_initialized` value, and publishes the
//! error on its observable error field.

use thiserror::Error;

use crate::ports::GatewayError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The gateway call failed, timed out, or returned garbage.
    #[error("catalog request failed: {0}")]
    Transport(String),

    /// The gateway answered with nothing where something is required.
    #[error("catalog returned no {0}")]
    EmptyResult(&'static str),
}

impl From<GatewayError> for StoreError {
    fn from(err: GatewayError) -> Self {
        StoreError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_errors_become_transport_errors() {
        let err: StoreError = GatewayError::Transport("connection reset".into()).into();
        assert_eq!(
            err,
            StoreError::Transport("gateway transport error: connection reset".into())
        );
    }

    #[test]
    fn test_empty_result_display() {
        let err = StoreError::EmptyResult("consoles");
        assert_eq!(err.to_string(), "catalog returned no consoles");
    }
}
