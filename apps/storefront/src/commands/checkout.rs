//! # Checkout Command
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  submit_checkout                                                        │
//! │                                                                         │
//! │  1. is_submitting? ──yes──► SUBMIT_IN_PROGRESS (nothing sent)           │
//! │  2. assemble_order(cart, form)                                          │
//! │        └─invalid──► VALIDATION_ERROR + field list (nothing sent)        │
//! │  3. POST /public/establishment/:id/order   (exactly once)               │
//! │        ├─ok────► clear cart, return order + success notice              │
//! │        └─err───► cart untouched, error notice                           │
//! │  4. is_submitting reset in every case                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use roda_client::ApiClient;
use roda_core::checkout::assemble_order;
use roda_core::{CartAction, CheckoutForm, Order};

use crate::error::Notice;
use crate::state::CartState;

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub order: Order,
    pub notice: Notice,
}

pub async fn submit_checkout(
    client: &ApiClient,
    cart: &CartState,
    establishment_id: &str,
    form: &CheckoutForm,
) -> Result<CheckoutResponse, Notice> {
    let _submitting = cart
        .submission()
        .try_begin()
        .ok_or_else(Notice::submit_in_progress)?;

    let snapshot = cart.snapshot();
    let request = assemble_order(&snapshot, form)?;
    debug!(
        establishment_id,
        lines = request.items.len(),
        total = %request.total,
        "submit_checkout command"
    );

    let order = client.public().place_order(establishment_id, &request).await?;
    cart.dispatch(CartAction::Clear);

    Ok(CheckoutResponse {
        order,
        notice: Notice::success("Order placed successfully."),
    })
}
