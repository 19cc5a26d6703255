//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Order   │       │
//! │  │  Cart    │     │          │     │   Form   │     │  Placed  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                │             │
//! │                   add_to_cart      submit_checkout        │             │
//! │                   increase_item    (checkout.rs)          │             │
//! │                   decrease_item          │                │             │
//! │                   remove_from_cart       │ failure:       │ success:   │
//! │                        │                 │ cart kept      │ cart       │
//! │                        ▼                 ▼                ▼ cleared    │
//! │                   clear_cart ─────────────────────► (back to empty)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use roda_core::{CartAction, Product};

use crate::error::Notice;
use crate::state::{CartResponse, CartState};

/// Gets the current cart contents.
pub fn get_cart(cart: &CartState) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::from(c))
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - Already in cart: quantity increases
/// - Not in cart: appended with a snapshot of the product
/// - Quantity defaults to 1; 0 leaves the cart unchanged
/// - Unavailable products are refused
pub fn add_to_cart(
    cart: &CartState,
    product: &Product,
    quantity: Option<u32>,
) -> Result<CartResponse, Notice> {
    let quantity = quantity.unwrap_or(1);
    debug!(product_id = %product.id, quantity, "add_to_cart command");

    if !product.is_available {
        return Err(Notice::validation(format!(
            "{} is not available right now",
            product.name
        )));
    }

    let updated = cart.dispatch(CartAction::Add {
        product: product.clone(),
        quantity,
    });
    Ok(CartResponse::from(&updated))
}

/// Adds a product picked by id from an already fetched menu.
pub fn add_from_menu(
    cart: &CartState,
    menu: &[Product],
    product_id: &str,
    quantity: u32,
) -> Result<CartResponse, Notice> {
    let product = menu
        .iter()
        .find(|p| p.id == product_id)
        .ok_or_else(|| Notice::not_found("Product", product_id))?;
    add_to_cart(cart, product, Some(quantity))
}

pub fn increase_item(cart: &CartState, product_id: &str) -> CartResponse {
    debug!(product_id, "increase_item command");
    CartResponse::from(&cart.dispatch(CartAction::Increase(product_id.to_string())))
}

/// Decrements by one; the line disappears when it reaches zero.
pub fn decrease_item(cart: &CartState, product_id: &str) -> CartResponse {
    debug!(product_id, "decrease_item command");
    CartResponse::from(&cart.dispatch(CartAction::Decrease(product_id.to_string())))
}

/// Sets an absolute quantity; 0 removes the line.
pub fn set_item_quantity(cart: &CartState, product_id: &str, quantity: u32) -> CartResponse {
    debug!(product_id, quantity, "set_item_quantity command");
    CartResponse::from(&cart.dispatch(CartAction::SetQuantity {
        product_id: product_id.to_string(),
        quantity,
    }))
}

pub fn remove_from_cart(cart: &CartState, product_id: &str) -> CartResponse {
    debug!(product_id, "remove_from_cart command");
    CartResponse::from(&cart.dispatch(CartAction::Remove(product_id.to_string())))
}

pub fn clear_cart(cart: &CartState) -> CartResponse {
    debug!("clear_cart command");
    CartResponse::from(&cart.dispatch(CartAction::Clear))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use roda_core::Money;

    fn menu() -> Vec<Product> {
        let mut closed = Product::new("p-3", "Feijoada", Money::from_cents(3900));
        closed.is_available = false;
        vec![
            Product::new("p-1", "Pizza", Money::from_cents(1000)),
            Product::new("p-2", "Soda", Money::from_cents(500)),
            closed,
        ]
    }

    #[test]
    fn test_walkthrough() {
        let cart = CartState::new();
        let menu = menu();

        add_from_menu(&cart, &menu, "p-1", 2).unwrap();
        add_from_menu(&cart, &menu, "p-2", 1).unwrap();
        let r = increase_item(&cart, "p-2");
        assert_eq!(r.totals.total_quantity, 4);
        assert_eq!(r.totals.total_price, Money::from_cents(3000));

        let r = decrease_item(&cart, "p-1");
        assert_eq!(r.totals.total_price, Money::from_cents(2000));

        let r = decrease_item(&cart, "p-1");
        assert_eq!(r.items.len(), 1);
        assert_eq!(r.items[0].product_id(), "p-2");

        let r = set_item_quantity(&cart, "p-2", 0);
        assert!(r.items.is_empty());
    }

    #[test]
    fn test_refuses_unknown_and_unavailable() {
        let cart = CartState::new();
        let menu = menu();

        let err = add_from_menu(&cart, &menu, "nope", 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = add_from_menu(&cart, &menu, "p-3", 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert!(get_cart(&cart).items.is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let cart = CartState::new();
        let menu = menu();
        add_from_menu(&cart, &menu, "p-1", 1).unwrap();
        add_from_menu(&cart, &menu, "p-2", 1).unwrap();

        assert_eq!(remove_from_cart(&cart, "p-1").items.len(), 1);
        assert_eq!(remove_from_cart(&cart, "missing").items.len(), 1);
        assert!(clear_cart(&cart).items.is_empty());
    }
}
