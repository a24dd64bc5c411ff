//! Optimistic cart mutation engine
//!
//! Client-side protocol for mutating a server-owned shopping cart:
//! mutations render optimistically before the backend confirms, and a
//! fetch-key supersede policy guarantees that duplicate or out-of-order
//! responses never corrupt the visible cart.
//!
//! ## Modules
//!
//! - [`domain`] - Cart snapshots, mutation intents, fetch-key derivation
//! - [`projection`] - Pure overlay of active intents onto confirmed state
//! - [`engine`] - Dispatch, supersede, and reconciliation machinery
//! - [`infra`] - Remote API seam and error taxonomy
//! - [`config`] - Engine tunables
//! - [`telemetry`] - Structured logging setup
//!
//! ## Flow
//!
//! User action -> [`domain::MutationIntent`] -> dispatcher claims the
//! intent's fetch-key slot (superseding any in-flight holder) and calls
//! the remote API -> [`projection::project`] renders confirmed state +
//! active intents immediately -> the response settles through the
//! reconciler, which either replaces the confirmed cart wholesale or
//! records a per-slot failure and lets the projection roll back.

pub mod config;
pub mod domain;
pub mod engine;
pub mod infra;
pub mod projection;
pub mod telemetry;

// Re-export commonly used types
pub use config::EngineConfig;
pub use domain::{
    AddLineInput, AppliedGiftCard, Cart, CartCost, CartLine, CartMutation, DiscountCode,
    FetchKey, LineId, Money, MutationIntent, SelectedOption, UpdateLineInput, VariantId,
};
pub use engine::{CartEngine, MutationError, MutationOutcome, SlotState};
pub use infra::{CartApi, CartEngineError, Result};
pub use projection::project;
