//! Infrastructure seams for the cart engine
//!
//! - [`CartApi`] - the remote commerce backend boundary
//! - [`CartEngineError`] / [`Result`] - error taxonomy

mod api;
mod error;

pub use api::*;
pub use error::*;
