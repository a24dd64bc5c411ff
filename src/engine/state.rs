//! Shared engine state
//!
//! The confirmed cart is a single-owner cache: only the reconciler
//! writes it, and only from a success outcome of the currently-active
//! intent for a slot. Slots hold at most one active intent per fetch
//! key; authority within a slot is decided by a monotonically
//! increasing generation captured at dispatch time.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{watch, Mutex, RwLock};
use uuid::Uuid;

use crate::domain::{Cart, FetchKey, MutationIntent};
use crate::infra::CartEngineError;

/// Per-slot lifecycle visible to the presentation layer.
///
/// `Superseded` and `Settled` are transient bookkeeping outcomes; by
/// the time a caller observes a slot it is either vacant or held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No intent holds the key.
    Idle,
    /// An intent is in flight for the key.
    Active,
}

/// An active intent occupying a fetch-key slot.
#[derive(Debug, Clone)]
pub(crate) struct Slot {
    /// Generation captured at dispatch. A settle whose captured
    /// generation no longer matches is a superseded discard.
    pub generation: u64,
    pub intent: MutationIntent,
}

/// A surfaced, per-slot mutation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationError {
    pub error: CartEngineError,
    pub intent_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

pub(crate) struct EngineState {
    /// Last server-confirmed cart. Written only by the reconciler.
    pub confirmed: RwLock<Cart>,

    /// Active intents, at most one per fetch key.
    pub slots: Mutex<HashMap<FetchKey, Slot>>,

    /// Last failure per fetch key, cleared on the next dispatch or
    /// success for that key.
    pub errors: Mutex<HashMap<FetchKey, MutationError>>,

    /// Engine-wide dispatch counter; doubles as slot generation so a
    /// generation is never reused across intents.
    sequence: AtomicU64,

    /// Revision bumped on every state transition; subscribers re-read
    /// the projection when it changes.
    revision: watch::Sender<u64>,
}

impl EngineState {
    pub fn new(initial: Cart) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            confirmed: RwLock::new(initial),
            slots: Mutex::new(HashMap::new()),
            errors: Mutex::new(HashMap::new()),
            sequence: AtomicU64::new(1),
            revision,
        }
    }

    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Notify subscribers that the projection may have changed.
    pub fn bump_revision(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    /// Snapshot of active intents in dispatch order.
    pub async fn active_intents(&self) -> Vec<MutationIntent> {
        let slots = self.slots.lock().await;
        let mut intents: Vec<MutationIntent> =
            slots.values().map(|slot| slot.intent.clone()).collect();
        intents.sort_by_key(|i| i.sequence);
        intents
    }
}
