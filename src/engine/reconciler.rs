//! Reconciliation of mutation outcomes
//!
//! Merges authoritative server responses back into the confirmed cart,
//! or records a per-slot failure for rollback. The active-holder check
//! is the cancellation mechanism: a response whose captured generation
//! no longer matches the slot's is discarded unconditionally, so a
//! slow or stale response can never overwrite state produced by a
//! later dispatch on the same key.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::{Cart, FetchKey};
use crate::infra::CartEngineError;

use super::state::{EngineState, MutationError};

/// Terminal result of one dispatched mutation.
#[derive(Debug)]
pub enum MutationOutcome {
    /// Full updated cart from the backend. Validation rejections
    /// (inapplicable code, clamped quantity) arrive inside this cart
    /// and are still a success at this layer.
    Success(Cart),
    /// The call never produced an authoritative cart.
    Failure(CartEngineError),
}

/// Settle the intent holding `key` at `generation`.
///
/// No-op when the slot is vacant or held at a different generation:
/// the intent was superseded (or already settled) and its outcome is
/// discarded. Idempotent by the same check.
pub(crate) async fn settle(
    state: &EngineState,
    key: &FetchKey,
    generation: u64,
    outcome: MutationOutcome,
) {
    let intent = {
        let mut slots = state.slots.lock().await;
        match slots.get(key) {
            Some(slot) if slot.generation == generation => {
                slots.remove(key).map(|slot| slot.intent)
            }
            _ => {
                debug!(
                    key = %key,
                    generation,
                    "discarding outcome of superseded mutation"
                );
                return;
            }
        }
    };
    let Some(intent) = intent else { return };

    match outcome {
        MutationOutcome::Success(cart) => {
            // Wholesale replacement: the server response is the full
            // authoritative cart, never a delta.
            *state.confirmed.write().await = cart;
            state.errors.lock().await.remove(key);
            info!(key = %key, intent_id = %intent.intent_id, "cart mutation settled");
        }
        MutationOutcome::Failure(error) => {
            warn!(
                key = %key,
                intent_id = %intent.intent_id,
                %error,
                "cart mutation failed, rolling back optimistic state"
            );
            state.errors.lock().await.insert(
                key.clone(),
                MutationError {
                    error,
                    intent_id: intent.intent_id,
                    occurred_at: Utc::now(),
                },
            );
        }
    }

    state.bump_revision();
}
