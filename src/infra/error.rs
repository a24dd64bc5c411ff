//! Error types for the cart engine

use thiserror::Error;

/// Errors produced while dispatching or settling cart mutations.
///
/// Backend validation outcomes (inapplicable discount code, clamped
/// quantity) are not errors: the server returns a structurally
/// successful cart that already reflects the rejection, and the UI
/// renders that state directly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartEngineError {
    /// Remote call could not be started or completed.
    #[error("connectivity error: {0}")]
    Connectivity(String),

    /// Remote call exceeded the configured deadline.
    #[error("cart API timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Backend rejected the mutation outright (malformed input,
    /// expired cart session).
    #[error("cart API error: {0}")]
    Api(String),

    /// Mutation payload failed client-side validation before dispatch.
    #[error("invalid quantity {quantity} for line mutation (max {max})")]
    InvalidQuantity { quantity: u32, max: u32 },

    /// Engine misconfiguration discovered at startup.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type for cart engine operations.
pub type Result<T> = std::result::Result<T, CartEngineError>;
