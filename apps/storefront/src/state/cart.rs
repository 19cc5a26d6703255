//! # Cart State
//!
//! Holds the storefront cart between commands.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  UI Action               Command                  CartAction            │
//! │  ─────────               ───────                  ──────────            │
//! │                                                                         │
//! │  Click "Adicionar" ─────► add_to_cart() ─────────► Add { product, qty } │
//! │  Click "+" ─────────────► increase_item() ───────► Increase(id)         │
//! │  Click "-" ─────────────► decrease_item() ───────► Decrease(id)         │
//! │  Type a quantity ───────► set_item_quantity() ───► SetQuantity          │
//! │  Click trash ───────────► remove_from_cart() ────► Remove(id)           │
//! │  Order placed ──────────► (checkout) ────────────► Clear                │
//! │                                                                         │
//! │  Every action is a pure Cart -> Cart transition; the state only swaps  │
//! │  the current value under the lock.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use roda_core::{Cart, CartAction, CartItem, Money};

use super::submit::SubmissionFlag;

/// Cart totals summary for responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Distinct products.
    pub item_count: usize,
    /// Sum of quantities (the badge number).
    pub total_quantity: u64,
    pub total_price: Money,
    /// `R$ 1.234,56`
    pub formatted_total: String,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        let total_price = cart.total_price();
        CartTotals {
            item_count: cart.len(),
            total_quantity: cart.total_items(),
            total_price,
            formatted_total: total_price.to_string(),
        }
    }
}

/// Cart response including items and totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.items().to_vec(),
            totals: CartTotals::from(cart),
        }
    }
}

/// The storefront cart plus its checkout submission flag.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
    submitting: SubmissionFlag,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.lock())
    }

    /// Applies an action and returns the resulting cart.
    pub fn dispatch(&self, action: CartAction) -> Cart {
        let mut cart = self.lock();
        *cart = cart.reduce(action);
        cart.clone()
    }

    /// A copy of the current cart.
    pub fn snapshot(&self) -> Cart {
        self.lock().clone()
    }

    pub fn submission(&self) -> &SubmissionFlag {
        &self.submitting
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        // The cart is replaced wholesale, so a panicked holder cannot leave
        // it half-updated.
        self.cart.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
