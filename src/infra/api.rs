//! Remote cart API seam
//!
//! The engine talks to the hosted commerce backend through this trait.
//! The backend owns inventory, pricing, discount validation, and
//! checkout; every successful mutation returns the full updated cart,
//! never a delta, so reconciliation is a wholesale replacement.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::{Cart, CartMutation};

use super::CartEngineError;

/// Single mutation entry point to the commerce backend.
///
/// Invariant: a returned `Cart` is complete and authoritative. Codes
/// the backend declined arrive with `applicable: false`; quantities it
/// clamped arrive already clamped. Only transport-level and outright
/// rejections surface as `Err`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CartApi: Send + Sync {
    /// Submit one mutation and return the full updated cart.
    async fn mutate(&self, mutation: &CartMutation) -> Result<Cart, CartEngineError>;

    /// Fetch the current cart, used to hydrate the confirmed cache on
    /// initial load.
    async fn fetch(&self) -> Result<Cart, CartEngineError>;
}
