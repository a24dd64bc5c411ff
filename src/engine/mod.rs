//! Cart mutation engine
//!
//! Ties the dispatcher, reconciler, and projector together behind the
//! interface the presentation layer consumes: read the projected cart,
//! fire mutations, observe per-slot failures, and subscribe to change
//! notifications.
//!
//! Per-key slot lifecycle: `Idle -> Active -> {Settled, Superseded}`.
//! A dispatch on an occupied slot supersedes the holder and re-enters
//! `Active` for the new intent; both terminal outcomes vacate the slot
//! back to `Idle`.

mod dispatcher;
mod reconciler;
mod state;

pub use reconciler::MutationOutcome;
pub use state::{MutationError, SlotState};

use std::sync::Arc;
use tokio::sync::watch;

use crate::config::EngineConfig;
use crate::domain::{Cart, CartMutation, FetchKey, LineId, MutationIntent};
use crate::infra::{CartApi, Result};
use crate::projection::project;

use dispatcher::Dispatcher;
use state::EngineState;

/// In-process optimistic cart engine, one per storefront session.
///
/// Cheap to clone via `Arc` internals; all methods take `&self`.
pub struct CartEngine {
    state: Arc<EngineState>,
    dispatcher: Dispatcher,
    api: Arc<dyn CartApi>,
}

impl CartEngine {
    pub fn new(api: Arc<dyn CartApi>, config: EngineConfig) -> Self {
        let state = Arc::new(EngineState::new(Cart::empty()));
        let dispatcher = Dispatcher::new(Arc::clone(&state), Arc::clone(&api), config);
        Self {
            state,
            dispatcher,
            api,
        }
    }

    /// Seed the confirmed cache from an initial server load (the root
    /// loader fetches the cart before any mutation happens).
    pub async fn hydrate(&self, cart: Cart) {
        *self.state.confirmed.write().await = cart;
        self.state.bump_revision();
    }

    /// Fetch the current cart from the backend and seed the cache.
    pub async fn hydrate_from_api(&self) -> Result<()> {
        let cart = self.api.fetch().await?;
        self.hydrate(cart).await;
        Ok(())
    }

    /// Fire-and-forget mutation trigger. The returned intent carries
    /// the fetch key for error subscription; its outcome arrives
    /// asynchronously.
    pub async fn dispatch(&self, mutation: CartMutation) -> Result<MutationIntent> {
        self.dispatcher.dispatch(mutation).await
    }

    /// Current projection: confirmed state overlaid with all active
    /// intents. Recomputed freshly on every call.
    pub async fn projected_cart(&self) -> Cart {
        let intents = self.state.active_intents().await;
        let confirmed = self.state.confirmed.read().await;
        project(&confirmed, &intents)
    }

    /// Last server-confirmed cart, without optimistic overlay.
    pub async fn confirmed_cart(&self) -> Cart {
        self.state.confirmed.read().await.clone()
    }

    /// Last failure recorded for a slot, if any. Cleared by the next
    /// dispatch or success on that slot.
    pub async fn mutation_error(&self, key: &FetchKey) -> Option<MutationError> {
        self.state.errors.lock().await.get(key).cloned()
    }

    /// Whether a slot currently holds an in-flight intent.
    pub async fn slot_state(&self, key: &FetchKey) -> SlotState {
        if self.state.slots.lock().await.contains_key(key) {
            SlotState::Active
        } else {
            SlotState::Idle
        }
    }

    /// True while any active intent targets the given line, including
    /// the synthetic id of a not-yet-confirmed add. The UI disables
    /// that line's quantity controls.
    pub async fn line_busy(&self, line_id: &LineId) -> bool {
        // An add names merchandise, not a line id. When that merchandise
        // is already confirmed, the projection bumps the existing line,
        // so resolve the line's merchandise to match in-flight adds too.
        let merchandise_id = {
            let confirmed = self.state.confirmed.read().await;
            confirmed.line(line_id).map(|l| l.merchandise_id.clone())
        };
        let slots = self.state.slots.lock().await;
        slots.values().any(|slot| match &slot.intent.mutation {
            CartMutation::AddLines { lines } => lines.iter().any(|l| {
                &LineId::optimistic(&l.merchandise_id) == line_id
                    || Some(&l.merchandise_id) == merchandise_id.as_ref()
            }),
            mutation => mutation.target_line_ids().contains(line_id),
        })
    }

    /// Revision channel bumped on every dispatch and settlement; the
    /// presentation layer re-reads the projection when it ticks.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.state.subscribe()
    }
}
