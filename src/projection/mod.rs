//! Optimistic cart projection
//!
//! Pure overlay of in-flight mutation intents onto the last confirmed
//! cart. The projector never mutates confirmed state; it is computed
//! freshly on every read, so a settled or failed intent simply stops
//! contributing and the projection falls back to confirmed truth.
//!
//! Overlay rules:
//! - Adds synthesize provisional lines (or bump an existing line for
//!   the same merchandise) with `is_optimistic = true`.
//! - Quantity updates overlay the requested quantity; 0 removes the
//!   line from the projection.
//! - Removes omit the affected lines.
//! - Code edits overlay the requested code set; applicability and
//!   balances stay unknown until the server confirms.
//! - Totals are recomputed best-effort only while a quantity-affecting
//!   intent is active, otherwise passed through untouched.

use crate::domain::{
    AppliedGiftCard, Cart, CartCost, CartLine, CartMutation, DiscountCode, LineId, Money,
    MutationIntent,
};

/// Compute the projected cart from confirmed state and active intents.
///
/// Intents apply in dispatch order (at most one per fetch key exists at
/// a time, so ordering only matters across keys). Side-effect free and
/// idempotent: identical inputs yield structurally equal output.
pub fn project(confirmed: &Cart, intents: &[MutationIntent]) -> Cart {
    let mut projected = confirmed.clone();
    if intents.is_empty() {
        return projected;
    }

    let mut ordered: Vec<&MutationIntent> = intents.iter().collect();
    ordered.sort_by_key(|i| i.sequence);

    let recompute_totals = ordered.iter().any(|i| i.mutation.affects_quantities());

    for intent in ordered {
        apply_mutation(&mut projected, &intent.mutation);
    }

    if recompute_totals {
        projected.total_quantity = projected.computed_total_quantity();
        projected.cost = projected_cost(&projected);
    }

    projected
}

fn apply_mutation(cart: &mut Cart, mutation: &CartMutation) {
    match mutation {
        CartMutation::AddLines { lines } => {
            for input in lines {
                match cart
                    .lines
                    .iter_mut()
                    .find(|l| l.merchandise_id == input.merchandise_id)
                {
                    Some(existing) => {
                        existing.quantity = existing.quantity.saturating_add(input.quantity);
                        existing.total_cost = existing
                            .unit_cost
                            .as_ref()
                            .map(|unit| unit.times(existing.quantity));
                        existing.is_optimistic = true;
                    }
                    None => {
                        let mut line = CartLine::new(
                            LineId::optimistic(&input.merchandise_id),
                            input.merchandise_id.clone(),
                            input.quantity,
                            input.product_title.clone().unwrap_or_default(),
                        )
                        .with_selected_options(input.selected_options.clone());
                        if let Some(unit) = &input.unit_cost {
                            line = line.with_unit_cost(unit.clone());
                        }
                        line.is_optimistic = true;
                        cart.lines.push(line);
                    }
                }
            }
        }
        CartMutation::UpdateLines { lines } => {
            for input in lines {
                if input.quantity == 0 {
                    // Optimistic removal.
                    cart.lines.retain(|l| l.id != input.line_id);
                    continue;
                }
                if let Some(line) = cart.lines.iter_mut().find(|l| l.id == input.line_id) {
                    line.quantity = input.quantity;
                    line.total_cost = line
                        .unit_cost
                        .as_ref()
                        .map(|unit| unit.times(input.quantity));
                    line.is_optimistic = true;
                }
            }
        }
        CartMutation::RemoveLines { line_ids } => {
            cart.lines.retain(|l| !line_ids.contains(&l.id));
        }
        CartMutation::SetDiscountCodes { codes } => {
            let overlaid: Vec<DiscountCode> = codes
                .iter()
                .map(|code| {
                    // A code the server already validated keeps its flag.
                    cart.discount_codes
                        .iter()
                        .find(|c| &c.code == code)
                        .cloned()
                        .unwrap_or_else(|| DiscountCode::pending(code.clone()))
                })
                .collect();
            cart.discount_codes = overlaid;
        }
        CartMutation::SetGiftCardCodes { codes } => {
            let overlaid: Vec<AppliedGiftCard> = codes
                .iter()
                .map(|code| {
                    let last = last_characters(code);
                    cart.applied_gift_cards
                        .iter()
                        .find(|g| g.last_characters == last)
                        .cloned()
                        .unwrap_or(AppliedGiftCard {
                            last_characters: last,
                            balance: None,
                        })
                })
                .collect();
            cart.applied_gift_cards = overlaid;
        }
    }
}

/// Best-effort totals from projected lines. None when no line carries
/// a known cost yet (a fresh optimistic add into an empty cart).
fn projected_cost(cart: &Cart) -> Option<CartCost> {
    let currency = cart.currency_code()?.to_string();
    let subtotal = cart
        .lines
        .iter()
        .filter_map(|l| l.total_cost.as_ref())
        .fold(Money::zero(currency), |acc, t| acc.plus(t));
    // Discount math is server-side; until confirmation the projected
    // total equals the subtotal.
    Some(CartCost {
        total: subtotal.clone(),
        subtotal,
    })
}

fn last_characters(code: &str) -> String {
    let chars: Vec<char> = code.chars().collect();
    let start = chars.len().saturating_sub(4);
    chars[start..].iter().collect()
}
