//! Mutation dispatch
//!
//! Submits mutation intents to the remote cart API and enforces the
//! one-active-intent-per-key policy: a new dispatch on an occupied
//! slot supersedes the previous holder immediately rather than
//! queuing behind it. Supersession is cooperative, not a network
//! abort; the displaced request may still complete on the wire and is
//! fenced off by the reconciler's generation check.

use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, instrument};

use crate::config::EngineConfig;
use crate::domain::{CartMutation, MutationIntent};
use crate::infra::{CartApi, CartEngineError, Result};

use super::reconciler::{self, MutationOutcome};
use super::state::{EngineState, Slot};

pub(crate) struct Dispatcher {
    state: Arc<EngineState>,
    api: Arc<dyn CartApi>,
    config: EngineConfig,
}

impl Dispatcher {
    pub fn new(state: Arc<EngineState>, api: Arc<dyn CartApi>, config: EngineConfig) -> Self {
        Self { state, api, config }
    }

    /// Validate and submit one mutation. Returns the created intent;
    /// its outcome arrives asynchronously through the reconciler.
    #[instrument(skip(self, mutation), fields(action = mutation.action_name()))]
    pub async fn dispatch(&self, mutation: CartMutation) -> Result<MutationIntent> {
        self.validate(&mutation)?;

        let sequence = self.state.next_sequence();
        let intent = MutationIntent::new(mutation, sequence);
        let key = intent.fetch_key.clone();

        {
            let mut slots = self.state.slots.lock().await;
            if let Some(previous) = slots.insert(
                key.clone(),
                Slot {
                    generation: sequence,
                    intent: intent.clone(),
                },
            ) {
                debug!(
                    key = %key,
                    superseded = %previous.intent.intent_id,
                    replacement = %intent.intent_id,
                    "superseding in-flight mutation"
                );
            }
        }
        // A fresh dispatch clears the slot's stale failure.
        self.state.errors.lock().await.remove(&key);
        self.state.bump_revision();

        let state = Arc::clone(&self.state);
        let api = Arc::clone(&self.api);
        let request_timeout = self.config.request_timeout;
        let task_intent = intent.clone();
        tokio::spawn(async move {
            let outcome = match timeout(request_timeout, api.mutate(&task_intent.mutation)).await
            {
                Ok(Ok(cart)) => MutationOutcome::Success(cart),
                Ok(Err(error)) => MutationOutcome::Failure(error),
                Err(_) => MutationOutcome::Failure(CartEngineError::Timeout {
                    timeout_ms: request_timeout.as_millis() as u64,
                }),
            };
            reconciler::settle(&state, &task_intent.fetch_key, sequence, outcome).await;
        });

        Ok(intent)
    }

    fn validate(&self, mutation: &CartMutation) -> Result<()> {
        let max = self.config.max_quantity_per_line;
        let over = match mutation {
            CartMutation::AddLines { lines } => {
                lines.iter().map(|l| l.quantity).find(|q| *q > max)
            }
            CartMutation::UpdateLines { lines } => {
                lines.iter().map(|l| l.quantity).find(|q| *q > max)
            }
            _ => None,
        };
        match over {
            Some(quantity) => Err(CartEngineError::InvalidQuantity { quantity, max }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Cart, LineId, UpdateLineInput};
    use crate::infra::MockCartApi;

    fn engine_parts(api: MockCartApi) -> Dispatcher {
        let state = Arc::new(EngineState::new(Cart::empty()));
        Dispatcher::new(state, Arc::new(api), EngineConfig::default())
    }

    #[tokio::test]
    async fn over_limit_quantity_is_rejected_before_dispatch() {
        // The API must never be called.
        let mut api = MockCartApi::new();
        api.expect_mutate().never();
        let dispatcher = engine_parts(api);

        let result = dispatcher
            .dispatch(CartMutation::UpdateLines {
                lines: vec![UpdateLineInput::new(LineId::new("line-1"), 10_000)],
            })
            .await;

        assert!(matches!(
            result,
            Err(CartEngineError::InvalidQuantity { quantity: 10_000, .. })
        ));
    }

    #[tokio::test]
    async fn transport_failure_settles_as_connectivity_error() {
        let mut api = MockCartApi::new();
        api.expect_mutate()
            .returning(|_| Err(CartEngineError::Connectivity("dns failure".into())));
        let state = Arc::new(EngineState::new(Cart::empty()));
        let dispatcher = Dispatcher::new(
            Arc::clone(&state),
            Arc::new(api),
            EngineConfig::default(),
        );

        let intent = dispatcher
            .dispatch(CartMutation::UpdateLines {
                lines: vec![UpdateLineInput::new(LineId::new("line-1"), 2)],
            })
            .await
            .unwrap();

        let mut revisions = state.subscribe();
        // Dispatch bumped once; wait for the settle bump.
        while state.slots.lock().await.contains_key(&intent.fetch_key) {
            revisions.changed().await.unwrap();
        }

        let errors = state.errors.lock().await;
        let recorded = errors.get(&intent.fetch_key).expect("failure recorded");
        assert!(matches!(
            recorded.error,
            CartEngineError::Connectivity(_)
        ));
        assert_eq!(recorded.intent_id, intent.intent_id);
    }
}
