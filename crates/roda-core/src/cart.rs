//! # Cart
//!
//! Line-item aggregation behind the public cart and the manual-order cart.
//!
//! ## Reducer Model
//! Every operation takes the current snapshot and returns a new one; the
//! state owner keeps whichever snapshot is current. Nothing here is shared
//! or global.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Page Action              CartAction               Snapshot Change      │
//! │  ───────────              ──────────               ───────────────      │
//! │                                                                         │
//! │  Click "Add" ───────────► Add { product, qty } ──► push or qty += n    │
//! │                                                                         │
//! │  Click "+" ─────────────► Increase(id) ──────────► qty += 1            │
//! │                                                                         │
//! │  Click "−" ─────────────► Decrease(id) ──────────► qty -= 1            │
//! │                                                  (qty 0 → removed)     │
//! │                                                                         │
//! │  Click "Remove" ────────► Remove(id) ────────────► filtered out        │
//! │                                                                         │
//! │  Order placed ──────────► Clear ─────────────────► empty               │
//! │                                                                         │
//! │  Unknown product ids are silent no-ops. Nothing here can fail.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::checkout::OrderLine;
use crate::money::Money;
use crate::types::Product;

/// An item in the cart.
///
/// `product` is the snapshot taken when the item was first added: price
/// and availability changes made later on the backend are not reflected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product: Product,
    /// Always ≥ 1 while the item is in a cart.
    pub quantity: u32,
}

impl CartItem {
    /// Returns the product id this line is keyed by.
    #[inline]
    pub fn product_id(&self) -> &str {
        &self.product.id
    }

    /// Line total (snapshot price × quantity).
    pub fn line_total(&self) -> Money {
        self.product.price.multiply_quantity(self.quantity)
    }
}

/// A mutation that can be dispatched against a [`Cart`].
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    Add { product: Product, quantity: u32 },
    Increase(String),
    Decrease(String),
    Remove(String),
    SetQuantity { product_id: String, quantity: u32 },
    Clear,
}

/// The cart.
///
/// ## Invariants
/// - One entry per product id (adding the same product increases quantity)
/// - Every quantity is ≥ 1 (reaching 0 removes the entry)
/// - Insertion order is preserved
///
/// Deserializing replays every line through [`Cart::add_item`], so a
/// stored cart with repeated ids or zero quantities comes back normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<CartItem>,
}

#[derive(Deserialize)]
struct CartLines {
    #[serde(default)]
    items: Vec<CartItem>,
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let lines = CartLines::deserialize(deserializer)?;
        Ok(lines
            .items
            .iter()
            .fold(Cart::new(), |cart, line| cart.add_item(&line.product, line.quantity)))
    }
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Applies an action and returns the resulting snapshot.
    #[must_use]
    pub fn reduce(&self, action: CartAction) -> Cart {
        match action {
            CartAction::Add { product, quantity } => self.add_item(&product, quantity),
            CartAction::Increase(id) => self.increase(&id),
            CartAction::Decrease(id) => self.decrease(&id),
            CartAction::Remove(id) => self.remove(&id),
            CartAction::SetQuantity {
                product_id,
                quantity,
            } => self.set_quantity(&product_id, quantity),
            CartAction::Clear => self.clear(),
        }
    }

    /// Adds `quantity` units of a product.
    ///
    /// ## Behavior
    /// - Product already in cart: its quantity is incremented
    /// - Product not in cart: appended with a snapshot of the product
    /// - `quantity == 0`: no-op, so no zero-quantity row can appear
    ///
    /// No maximum quantity and no stock check is enforced client-side.
    #[must_use]
    pub fn add_item(&self, product: &Product, quantity: u32) -> Cart {
        if quantity == 0 {
            return self.clone();
        }

        let mut items = self.items.clone();
        match items.iter_mut().find(|i| i.product.id == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => items.push(CartItem {
                product: product.clone(),
                quantity,
            }),
        }
        Cart { items }
    }

    /// Increments a product's quantity by one.
    #[must_use]
    pub fn increase(&self, product_id: &str) -> Cart {
        self.map_quantity(product_id, |q| q.saturating_add(1))
    }

    /// Decrements a product's quantity by one; at zero the item is dropped.
    #[must_use]
    pub fn decrease(&self, product_id: &str) -> Cart {
        self.map_quantity(product_id, |q| q.saturating_sub(1))
    }

    /// Sets a product's quantity; zero removes the item.
    #[must_use]
    pub fn set_quantity(&self, product_id: &str, quantity: u32) -> Cart {
        self.map_quantity(product_id, |_| quantity)
    }

    /// Drops a product from the cart.
    #[must_use]
    pub fn remove(&self, product_id: &str) -> Cart {
        Cart {
            items: self
                .items
                .iter()
                .filter(|i| i.product.id != product_id)
                .cloned()
                .collect(),
        }
    }

    /// Returns an empty cart.
    #[must_use]
    pub fn clear(&self) -> Cart {
        Cart::new()
    }

    /// Rewrites the quantity of one item, then drops any item at zero.
    fn map_quantity(&self, product_id: &str, f: impl Fn(u32) -> u32) -> Cart {
        Cart {
            items: self
                .items
                .iter()
                .map(|item| {
                    if item.product.id == product_id {
                        CartItem {
                            product: item.product.clone(),
                            quantity: f(item.quantity),
                        }
                    } else {
                        item.clone()
                    }
                })
                .filter(|item| item.quantity > 0)
                .collect(),
        }
    }

    // =========================================================================
    // Derived State
    // =========================================================================

    /// Items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Looks up the line for a product.
    pub fn get(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product.id == product_id)
    }

    /// Sum of all quantities (not the number of distinct products).
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Σ quantity × snapshot price.
    pub fn total_price(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serializes the lines as `{productId, quantity}` pairs for an order.
    pub fn to_order_lines(&self) -> Vec<OrderLine> {
        self.items
            .iter()
            .map(|i| OrderLine {
                product_id: i.product.id.clone(),
                quantity: i.quantity,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, cents: i64) -> Product {
        Product::new(id, format!("Product {}", id), Money::from_cents(cents))
    }

    #[test]
    fn test_decoded_cart_merges_duplicates_and_drops_zero_lines() {
        let line = |id: &str, quantity: u32| {
            serde_json::json!({
                "product": { "id": id, "name": id, "price": 10.0 },
                "quantity": quantity
            })
        };
        let raw = serde_json::json!({
            "items": [line("a", 0), line("a", 2), line("b", 1), line("a", 1), line("c", 0)]
        });

        let cart: Cart = serde_json::from_value(raw).unwrap();

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get("a").map(|i| i.quantity), Some(3));
        assert!(cart.get("c").is_none());
        assert!(cart.items().iter().all(|i| i.quantity >= 1));
        assert_eq!(cart.items()[0].product_id(), "a");
    }

    #[test]
    fn test_total_price_saturates_on_huge_lines() {
        let a = product("a", i64::MAX);
        let b = product("b", i64::MAX);
        let cart = Cart::new().add_item(&a, 1).add_item(&b, 1);

        assert_eq!(cart.total_price(), Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_add_same_product_accumulates_into_one_item() {
        let x = product("x", 1000);
        let cart = Cart::new()
            .add_item(&x, 2)
            .add_item(&x, 5)
            .add_item(&x, 1);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_items(), 8);
        assert_eq!(cart.get("x").map(|i| i.quantity), Some(8));
    }

    #[test]
    fn test_walkthrough_scenario() {
        let x = product("x", 1000);

        let cart = Cart::new().add_item(&x, 2).add_item(&x, 1);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("x").unwrap().quantity, 3);
        assert_eq!(cart.total_price(), Money::from_cents(3000));

        let cart = cart.decrease("x");
        assert_eq!(cart.get("x").unwrap().quantity, 2);
        assert_eq!(cart.total_price(), Money::from_cents(2000));

        let cart = cart.decrease("x").decrease("x");
        assert!(cart.get("x").is_none());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_decrease_at_one_removes_item() {
        let cart = Cart::new().add_item(&product("a", 500), 1).decrease("a");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_price_is_order_independent() {
        let a = product("a", 1250);
        let b = product("b", 399);

        let one = Cart::new().add_item(&a, 2).add_item(&b, 3);
        let two = Cart::new().add_item(&b, 3).add_item(&a, 2);

        assert_eq!(one.total_price(), two.total_price());
        assert_eq!(one.total_price(), Money::from_cents(2 * 1250 + 3 * 399));
    }

    #[test]
    fn test_clear_zeroes_totals() {
        let cart = Cart::new()
            .add_item(&product("a", 100), 4)
            .add_item(&product("b", 250), 1)
            .clear();

        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Money::zero());
    }

    #[test]
    fn test_unknown_ids_are_no_ops() {
        let cart = Cart::new().add_item(&product("a", 100), 2);

        assert_eq!(cart.remove("missing"), cart);
        assert_eq!(cart.increase("missing"), cart);
        assert_eq!(cart.decrease("missing"), cart);
        assert_eq!(cart.set_quantity("missing", 7), cart);
    }

    #[test]
    fn test_add_zero_quantity_is_no_op() {
        let cart = Cart::new().add_item(&product("a", 100), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_price_snapshot_is_kept() {
        let mut pizza = product("p", 3000);
        let cart = Cart::new().add_item(&pizza, 1);

        // Price changes after the add; the line keeps its snapshot.
        pizza.price = Money::from_cents(4500);
        let cart = cart.add_item(&pizza, 1);

        assert_eq!(cart.get("p").unwrap().product.price, Money::from_cents(3000));
        assert_eq!(cart.total_price(), Money::from_cents(6000));
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let cart = Cart::new()
            .add_item(&product("a", 100), 3)
            .set_quantity("a", 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_reduce_dispatches_actions() {
        let a = product("a", 100);
        let cart = Cart::new()
            .reduce(CartAction::Add {
                product: a.clone(),
                quantity: 2,
            })
            .reduce(CartAction::Increase("a".into()));
        assert_eq!(cart.total_items(), 3);

        let cart = cart.reduce(CartAction::Remove("a".into()));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let cart = Cart::new()
            .add_item(&product("b", 1), 1)
            .add_item(&product("a", 1), 1)
            .add_item(&product("b", 1), 1);

        let ids: Vec<&str> = cart.items().iter().map(CartItem::product_id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_to_order_lines() {
        let cart = Cart::new()
            .add_item(&product("a", 100), 2)
            .add_item(&product("b", 100), 1);
        let lines = cart.to_order_lines();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_id, "a");
        assert_eq!(lines[0].quantity, 2);
    }
}
