//! # Error Types
//!
//! Purpose: Give every failure of the receiver client a single, typed home.
//!
//! ## Error Taxonomy
//!
//! - **`InvalidArgument`**: raised before the engine is touched, for input the
//!   engine boundary cannot represent (absent item batch, empty address,
//!   port 0, oversized batch).
//! - **`Connection`**: the engine's connect primitive returned false.
//! - **`Query`**: the engine's batch primitive returned false. The engine does
//!   not say why (not connected, transport failure, engine fault), so neither
//!   do we.
//! - **`NotConnected`**: only produced when the client's local connection
//!   guard is enabled.
//! - **`Config`**: client configuration could not be read or parsed.

use thiserror::Error;

/// Result alias used across the workspace.
pub type PsiResult<T> = Result<T, PsiError>;

/// Errors surfaced by the receiver client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PsiError {
    /// Malformed input rejected before any engine call.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The engine could not establish a session with the endpoint.
    #[error("receiver could not connect to {endpoint}")]
    Connection { endpoint: String },

    /// The engine reported failure for a whole batch.
    #[error("query of {count} items failed")]
    Query { count: usize },

    /// The local guard found no live session before querying.
    #[error("receiver is not connected")]
    NotConnected,

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl PsiError {
    /// Shorthand for an `InvalidArgument` with the given reason.
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        PsiError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Returns true for errors raised before the engine was consulted.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            PsiError::InvalidArgument { .. } | PsiError::NotConnected | PsiError::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        let err = PsiError::Connection {
            endpoint: "tcp://127.0.0.1:1212".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "receiver could not connect to tcp://127.0.0.1:1212"
        );
        assert_eq!(PsiError::Query { count: 3 }.to_string(), "query of 3 items failed");
        assert_eq!(
            PsiError::invalid_argument("items").to_string(),
            "invalid argument: items"
        );
    }

    #[test]
    fn local_errors_are_classified() {
        assert!(PsiError::invalid_argument("x").is_local());
        assert!(PsiError::NotConnected.is_local());
        assert!(!PsiError::Query { count: 1 }.is_local());
        assert!(!PsiError::Connection {
            endpoint: String::new()
        }
        .is_local());
    }
}
