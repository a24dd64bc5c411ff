//! Common test utilities and fixtures for integration tests

#![allow(dead_code)]

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::{oneshot, Mutex, Notify};

use cart_engine::{
    Cart, CartApi, CartCost, CartEngineError, CartLine, CartMutation, LineId, Money, VariantId,
};

/// A cart API whose responses the test releases by hand, so response
/// arrival order is fully controlled and independent of dispatch order.
pub struct ScriptedCartApi {
    pending: Mutex<VecDeque<PendingCall>>,
    arrived: Notify,
    initial: Mutex<Cart>,
}

struct PendingCall {
    mutation: CartMutation,
    responder: oneshot::Sender<Result<Cart, CartEngineError>>,
}

/// One captured `mutate` call, waiting for the test to release it.
pub struct ScriptedCall {
    pub mutation: CartMutation,
    responder: oneshot::Sender<Result<Cart, CartEngineError>>,
}

impl ScriptedCall {
    /// Resolve the call with a full server cart.
    pub fn respond(self, cart: Cart) {
        // The engine may have superseded the intent and dropped the
        // receiver; that is exactly the case under test, not an error.
        let _ = self.responder.send(Ok(cart));
    }

    /// Resolve the call with a transport failure.
    pub fn fail(self, error: CartEngineError) {
        let _ = self.responder.send(Err(error));
    }
}

impl ScriptedCartApi {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            arrived: Notify::new(),
            initial: Mutex::new(Cart::empty()),
        }
    }

    pub async fn set_initial_cart(&self, cart: Cart) {
        *self.initial.lock().await = cart;
    }

    /// Take the oldest captured call, waiting for one to arrive.
    pub async fn next_call(&self) -> ScriptedCall {
        loop {
            if let Some(call) = self.pending.lock().await.pop_front() {
                return ScriptedCall {
                    mutation: call.mutation,
                    responder: call.responder,
                };
            }
            self.arrived.notified().await;
        }
    }

    pub async fn pending_calls(&self) -> usize {
        self.pending.lock().await.len()
    }
}

#[async_trait]
impl CartApi for ScriptedCartApi {
    async fn mutate(&self, mutation: &CartMutation) -> Result<Cart, CartEngineError> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.push_back(PendingCall {
            mutation: mutation.clone(),
            responder: tx,
        });
        self.arrived.notify_one();
        rx.await
            .unwrap_or_else(|_| Err(CartEngineError::Connectivity("scripted call dropped".into())))
    }

    async fn fetch(&self) -> Result<Cart, CartEngineError> {
        Ok(self.initial.lock().await.clone())
    }
}

/// Poll until the condition holds, failing the test after ~2 seconds.
/// The condition is an await-expression evaluated in the caller's
/// scope.
macro_rules! wait_for {
    ($what:expr, $cond:expr) => {{
        let mut satisfied = false;
        for _ in 0..200 {
            if $cond {
                satisfied = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        if !satisfied {
            panic!("timed out waiting for: {}", $what);
        }
    }};
}
pub(crate) use wait_for;

/// Cart line with a known unit cost, as the server would return it.
pub fn priced_line(line_id: &str, variant_id: &str, quantity: u32, unit: f64) -> CartLine {
    CartLine::new(
        LineId::new(line_id),
        VariantId::new(variant_id),
        quantity,
        format!("Product {variant_id}"),
    )
    .with_unit_cost(Money::new(unit, "EUR"))
}

/// A full server cart built from lines, with consistent totals.
pub fn server_cart(lines: Vec<CartLine>) -> Cart {
    let mut cart = Cart::empty();
    let subtotal = lines
        .iter()
        .filter_map(|l| l.total_cost.as_ref())
        .fold(Money::zero("EUR"), |acc, t| acc.plus(t));
    cart.total_quantity = lines.iter().map(|l| l.quantity).sum();
    cart.lines = lines;
    cart.cost = Some(CartCost {
        total: subtotal.clone(),
        subtotal,
    });
    cart.checkout_url = Some("https://shop.example/checkout".to_string());
    cart
}
