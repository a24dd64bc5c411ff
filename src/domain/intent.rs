//! Mutation intents and fetch-key derivation
//!
//! A `MutationIntent` is an immutable description of one requested cart
//! change. Its fetch key names the contended slot: intents sharing a key
//! supersede each other, intents with distinct keys run concurrently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{LineId, Money, SelectedOption, VariantId};

/// Deduplication key for concurrent mutations.
///
/// Quantity updates and removes targeting the same line set derive the
/// same key, so a remove cancels a pending quantity update on that line.
/// Code mutations each use a single well-known key per code type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchKey(String);

impl FetchKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key for quantity updates and removes over a set of line ids.
    /// Ids are sorted before joining so derivation is order-independent.
    pub fn for_lines(line_ids: &[LineId]) -> Self {
        let mut ids: Vec<&str> = line_ids.iter().map(|id| id.as_str()).collect();
        ids.sort_unstable();
        Self(format!("lines-update:{}", ids.join("-")))
    }

    /// Key for adding merchandise, per sorted variant id set, so rapid
    /// repeat clicks on one add-to-cart button supersede each other.
    pub fn for_add(merchandise_ids: &[VariantId]) -> Self {
        let mut ids: Vec<&str> = merchandise_ids.iter().map(|id| id.as_str()).collect();
        ids.sort_unstable();
        Self(format!("lines-add:{}", ids.join("-")))
    }

    /// All discount-code edits contend on one slot.
    pub fn discount_codes() -> Self {
        Self("discount-codes".to_string())
    }

    /// All gift-card edits contend on one slot.
    pub fn gift_card_codes() -> Self {
        Self("gift-card-codes".to_string())
    }
}

impl fmt::Display for FetchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input for adding one merchandise variant to the cart.
///
/// The display fields are optional; when present they let the
/// projector render a provisional line with title and options before
/// the backend confirms the add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddLineInput {
    pub merchandise_id: VariantId,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<Money>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_options: Vec<SelectedOption>,
}

impl AddLineInput {
    pub fn new(merchandise_id: VariantId, quantity: u32) -> Self {
        Self {
            merchandise_id,
            quantity,
            product_title: None,
            unit_cost: None,
            selected_options: Vec::new(),
        }
    }

    /// Attach variant display data for the optimistic projection.
    pub fn with_display(
        mut self,
        product_title: impl Into<String>,
        unit_cost: Money,
        selected_options: Vec<SelectedOption>,
    ) -> Self {
        self.product_title = Some(product_title.into());
        self.unit_cost = Some(unit_cost);
        self.selected_options = selected_options;
        self
    }
}

/// Input for changing the quantity of an existing line.
/// A quantity of 0 removes the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateLineInput {
    pub line_id: LineId,
    pub quantity: u32,
}

impl UpdateLineInput {
    pub fn new(line_id: LineId, quantity: u32) -> Self {
        Self { line_id, quantity }
    }

    /// One step up from the current quantity, as the stepper emits.
    pub fn increment(line_id: LineId, current: u32) -> Self {
        Self::new(line_id, current.saturating_add(1))
    }

    /// One step down, clamped at 0 (never negative).
    pub fn decrement(line_id: LineId, current: u32) -> Self {
        Self::new(line_id, current.saturating_sub(1))
    }
}

/// A requested change to the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CartMutation {
    AddLines { lines: Vec<AddLineInput> },
    UpdateLines { lines: Vec<UpdateLineInput> },
    RemoveLines { line_ids: Vec<LineId> },
    SetDiscountCodes { codes: Vec<String> },
    SetGiftCardCodes { codes: Vec<String> },
}

impl CartMutation {
    /// Derive the deduplication key naming this mutation's slot.
    pub fn fetch_key(&self) -> FetchKey {
        match self {
            CartMutation::AddLines { lines } => {
                let ids: Vec<VariantId> =
                    lines.iter().map(|l| l.merchandise_id.clone()).collect();
                FetchKey::for_add(&ids)
            }
            CartMutation::UpdateLines { lines } => {
                let ids: Vec<LineId> = lines.iter().map(|l| l.line_id.clone()).collect();
                FetchKey::for_lines(&ids)
            }
            CartMutation::RemoveLines { line_ids } => FetchKey::for_lines(line_ids),
            CartMutation::SetDiscountCodes { .. } => FetchKey::discount_codes(),
            CartMutation::SetGiftCardCodes { .. } => FetchKey::gift_card_codes(),
        }
    }

    /// Stable action name for logs and wire payloads.
    pub fn action_name(&self) -> &'static str {
        match self {
            CartMutation::AddLines { .. } => "lines_add",
            CartMutation::UpdateLines { .. } => "lines_update",
            CartMutation::RemoveLines { .. } => "lines_remove",
            CartMutation::SetDiscountCodes { .. } => "discount_codes_update",
            CartMutation::SetGiftCardCodes { .. } => "gift_card_codes_update",
        }
    }

    /// Whether this mutation changes line quantities, and therefore
    /// whether projected totals must be recomputed.
    pub fn affects_quantities(&self) -> bool {
        matches!(
            self,
            CartMutation::AddLines { .. }
                | CartMutation::UpdateLines { .. }
                | CartMutation::RemoveLines { .. }
        )
    }

    /// Line ids this mutation targets (empty for add and code edits).
    pub fn target_line_ids(&self) -> Vec<LineId> {
        match self {
            CartMutation::UpdateLines { lines } => {
                lines.iter().map(|l| l.line_id.clone()).collect()
            }
            CartMutation::RemoveLines { line_ids } => line_ids.clone(),
            _ => Vec::new(),
        }
    }
}

/// One dispatched mutation, tracked from submission to settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationIntent {
    /// Globally unique intent identifier.
    pub intent_id: Uuid,

    pub mutation: CartMutation,

    /// Slot this intent contends on, derived once at creation.
    pub fetch_key: FetchKey,

    /// Client-side submission timestamp, metadata only; authority
    /// within a slot is decided by dispatch sequence, not wall clock.
    pub submitted_at: DateTime<Utc>,

    /// Monotonic dispatch sequence across the engine, used to apply
    /// concurrent intents deterministically in submission order.
    pub sequence: u64,
}

impl MutationIntent {
    pub fn new(mutation: CartMutation, sequence: u64) -> Self {
        let fetch_key = mutation.fetch_key();
        Self {
            intent_id: Uuid::new_v4(),
            mutation,
            fetch_key,
            submitted_at: Utc::now(),
            sequence,
        }
    }
}
