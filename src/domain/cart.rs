//! Cart and cart line models
//!
//! The client holds a cached projection of the cart; the authoritative
//! copy lives server-side and every successful mutation response
//! replaces the cached state wholesale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CartId, LineId, Money, SelectedOption, VariantId};

/// One merchandise entry (variant + quantity) in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: LineId,
    pub merchandise_id: VariantId,
    pub quantity: u32,

    /// Cost of a single unit. Absent on optimistic lines until the
    /// backend confirms the add.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<Money>,

    /// Line total. During optimistic projection this is best-effort
    /// (`unit_cost * quantity`) or absent; only the server response
    /// carries the authoritative value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<Money>,

    pub product_title: String,
    pub selected_options: Vec<SelectedOption>,

    /// True while this line reflects a not-yet-confirmed mutation.
    /// The UI disables quantity controls on optimistic lines.
    #[serde(default)]
    pub is_optimistic: bool,
}

impl CartLine {
    pub fn new(
        id: LineId,
        merchandise_id: VariantId,
        quantity: u32,
        product_title: impl Into<String>,
    ) -> Self {
        Self {
            id,
            merchandise_id,
            quantity,
            unit_cost: None,
            total_cost: None,
            product_title: product_title.into(),
            selected_options: Vec::new(),
            is_optimistic: false,
        }
    }

    pub fn with_unit_cost(mut self, unit_cost: Money) -> Self {
        self.total_cost = Some(unit_cost.times(self.quantity));
        self.unit_cost = Some(unit_cost);
        self
    }

    pub fn with_selected_options(mut self, options: Vec<SelectedOption>) -> Self {
        self.selected_options = options;
        self
    }
}

/// A discount code attached to the cart. `applicable` is only known
/// after server confirmation; provisional codes carry `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountCode {
    pub code: String,
    pub applicable: bool,
}

impl DiscountCode {
    /// A code as reported applicable by the backend.
    pub fn applicable(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            applicable: true,
        }
    }

    /// A code awaiting (or denied) backend validation.
    pub fn pending(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            applicable: false,
        }
    }
}

/// A gift card applied to the cart. Only the trailing characters are
/// ever exposed client-side; `balance` is unknown until confirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedGiftCard {
    pub last_characters: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Money>,
}

/// Cart totals as computed by the backend, or recomputed best-effort
/// from projected lines while a quantity mutation is in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartCost {
    pub subtotal: Money,
    pub total: Money,
}

/// The client-side cart snapshot: lines, codes, totals, checkout link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CartId>,

    /// Ordered lines, unique by `LineId`.
    pub lines: Vec<CartLine>,

    pub discount_codes: Vec<DiscountCode>,
    pub applied_gift_cards: Vec<AppliedGiftCard>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<CartCost>,

    pub total_quantity: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,

    /// Server-side timestamp of the snapshot, metadata only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Cart {
    /// An empty cart, the confirmed state before any server response.
    pub fn empty() -> Self {
        Self {
            id: None,
            lines: Vec::new(),
            discount_codes: Vec::new(),
            applied_gift_cards: Vec::new(),
            cost: None,
            total_quantity: 0,
            checkout_url: None,
            updated_at: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, id: &LineId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.id == id)
    }

    /// Sum of line quantities. Kept consistent by the projector and by
    /// server responses; exposed for badge counts.
    pub fn computed_total_quantity(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Currency of the cart, taken from the confirmed cost or the
    /// first priced line.
    pub fn currency_code(&self) -> Option<&str> {
        if let Some(cost) = &self.cost {
            return Some(&cost.subtotal.currency_code);
        }
        self.lines
            .iter()
            .find_map(|l| l.unit_cost.as_ref())
            .map(|m| m.currency_code.as_str())
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::empty()
    }
}
