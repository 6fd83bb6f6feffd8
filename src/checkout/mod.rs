//! Order submission flow.
//!
//! A single attempt moves `Idle → Submitting → {Succeeded | Failed}`. The
//! cart is cleared only on success; a failed attempt leaves it intact so
//! the operator can retry. [`Checkout::settle`] returns the machine to
//! idle after the message display delay.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{error, info, instrument};

use crate::api::ApiClient;
use crate::cart::{CartCommand, CartSession};
use crate::domain::{OrderItem, OrderPayload, PaymentMethod};
use crate::error::CheckoutError;

pub const SUCCESS_MESSAGE: &str = "Order placed successfully!";

const GUEST_NAME: &str = "Guest";
const GUEST_MOBILE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// What the caller gets back after a successful placement. The item lines
/// are the local cart snapshot, not the server echo: the created-order
/// response may omit item details, and the kitchen ticket needs them.
#[derive(Debug, Clone)]
pub struct OrderReceipt {
    pub order_id: String,
    pub customer_name: String,
    pub customer_mobile: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub payment_method: PaymentMethod,
    pub placed_at: DateTime<Utc>,
    pub message: &'static str,
}

#[derive(Debug, Default)]
pub struct Checkout {
    state: SubmissionState,
}

impl Checkout {
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Submits the cart as an order. Empty carts are rejected while still
    /// idle, without touching the network.
    #[instrument(skip(self, api, cart), fields(total = cart.total(), items = cart.lines().len()))]
    pub async fn submit(
        &mut self,
        api: &ApiClient,
        cart: &mut CartSession,
        payment_method: PaymentMethod,
    ) -> Result<OrderReceipt, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if self.state == SubmissionState::Submitting {
            return Err(CheckoutError::SubmissionInFlight);
        }

        self.state = SubmissionState::Submitting;
        let payload = build_payload(cart, payment_method);

        match api.create_order(&payload).await {
            Ok(created) => {
                self.state = SubmissionState::Succeeded;
                info!(order_id = %created.id, "Order placed");
                let receipt = OrderReceipt {
                    order_id: created.id,
                    placed_at: created.created_at.unwrap_or_else(Utc::now),
                    customer_name: payload.customer_name,
                    customer_mobile: payload.customer_mobile,
                    items: payload.items,
                    total_amount: payload.total_amount,
                    payment_method,
                    message: SUCCESS_MESSAGE,
                };
                cart.dispatch(CartCommand::Clear);
                Ok(receipt)
            }
            Err(e) => {
                self.state = SubmissionState::Failed;
                error!(error = %e, "Order placement failed");
                Err(e.into())
            }
        }
    }

    /// Returns a settled attempt (succeeded or failed) to idle. A
    /// submission that is still in flight is left alone.
    pub fn acknowledge(&mut self) {
        if self.state != SubmissionState::Submitting {
            self.state = SubmissionState::Idle;
        }
    }

    /// Holds the outcome up for `delay`, then returns to idle.
    pub async fn settle(&mut self, delay: Duration) {
        tokio::time::sleep(delay).await;
        self.acknowledge();
    }
}

/// Serializes the cart for `POST /orders`, substituting the guest defaults
/// for an empty customer draft.
fn build_payload(cart: &CartSession, payment_method: PaymentMethod) -> OrderPayload {
    let name = cart.customer.name.trim();
    let mobile = cart.customer.mobile.trim();
    let total = cart.total();

    OrderPayload {
        customer_name: if name.is_empty() { GUEST_NAME.to_string() } else { name.to_string() },
        customer_mobile: if mobile.is_empty() {
            GUEST_MOBILE.to_string()
        } else {
            mobile.to_string()
        },
        items: cart
            .lines()
            .iter()
            .map(|line| OrderItem {
                item_name: line.name.clone(),
                qty: line.quantity,
                price: line.unit_price,
            })
            .collect(),
        total_amount: total,
        total_price: total,
        status: "Completed".to_string(),
        payment_method,
    }
}
