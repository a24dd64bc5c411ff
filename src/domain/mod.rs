//! Domain models for the cart engine
//!
//! Cart snapshots, mutation intents, and fetch-key derivation.

mod cart;
mod intent;
mod types;

pub use cart::*;
pub use intent::*;
pub use types::*;
