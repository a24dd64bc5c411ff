//! Core type definitions for the cart engine
//!
//! Identifiers are opaque strings assigned by the commerce backend
//! (cart lines, merchandise variants, carts). Money amounts mirror the
//! backend's decimal representation parsed into f64 for client-side
//! display math only; the server remains the authority on all pricing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a single cart line, assigned by the backend.
///
/// Optimistic lines synthesized before server confirmation use an
/// `optimistic-` prefixed id derived from the merchandise id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineId(pub String);

impl LineId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Synthetic id for a line that exists only in the optimistic
    /// projection, before the backend has confirmed the add.
    pub fn optimistic(merchandise_id: &VariantId) -> Self {
        Self(format!("optimistic-{}", merchandise_id.as_str()))
    }

    pub fn is_optimistic(&self) -> bool {
        self.0.starts_with("optimistic-")
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a merchandise variant (product + selected options).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariantId(pub String);

impl VariantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the cart session itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartId(pub String);

impl CartId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A monetary amount with its currency code.
///
/// Client-side arithmetic on these values is best-effort display math
/// during optimistic projection; confirmed totals always come from the
/// server response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub amount: f64,
    pub currency_code: String,
}

impl Money {
    pub fn new(amount: f64, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }

    pub fn zero(currency_code: impl Into<String>) -> Self {
        Self::new(0.0, currency_code)
    }

    /// Scale by a line quantity (unit cost -> line total).
    pub fn times(&self, quantity: u32) -> Self {
        Self {
            amount: self.amount * quantity as f64,
            currency_code: self.currency_code.clone(),
        }
    }

    /// Sum with another amount of the same currency.
    pub fn plus(&self, other: &Money) -> Self {
        Self {
            amount: self.amount + other.amount,
            currency_code: self.currency_code.clone(),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency_code)
    }
}

/// A selected variant option, e.g. `Size: M`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

impl SelectedOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
