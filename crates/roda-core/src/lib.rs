//! # roda-core: Pure Business Logic for the Roda Já Storefront
//!
//! This crate holds the logic behind the storefront and admin pages as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Roda Já Storefront Architecture                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/storefront (commands)                      │   │
//! │  │   Menu ──► Cart ──► Checkout ──► Order placed                   │   │
//! │  │   Admin: products, orders, manual orders                        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ roda-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌────────┐  │   │
//! │  │   │  types  │ │  cart   │ │ checkout │ │ session │ │listing │  │   │
//! │  │   │ Product │ │ Cart    │ │ Form     │ │ Auth    │ │ Page   │  │   │
//! │  │   │ Order   │ │ Action  │ │ Request  │ │ Role    │ │ Filter │  │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └─────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO STORAGE • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 roda-client (REST + storage)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire/domain types (Product, Order, User, ...)
//! - [`money`] - Money type with integer centavos
//! - [`cart`] - Cart reducer (add/increase/decrease/remove/clear, totals)
//! - [`checkout`] - Checkout form validation and order request assembly
//! - [`session`] - Auth session, role predicates, snapshot rehydration
//! - [`listing`] - Pagination and filters over in-memory lists
//! - [`validation`] - Field validators
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use roda_core::{Cart, Money, Product};
//!
//! let pizza = Product::new("p-1", "Pizza", Money::from_cents(1000));
//!
//! let cart = Cart::new()
//!     .add_item(&pizza, 2)
//!     .add_item(&pizza, 1);
//!
//! assert_eq!(cart.total_items(), 3);
//! assert_eq!(cart.total_price(), Money::from_cents(3000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod listing;
pub mod money;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartAction, CartItem};
pub use checkout::{
    AddressForm, CheckoutErrors, CheckoutForm, CreateOrderRequest, ManualOrderDraft, OrderLine,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use listing::{OrderFilter, Page, PageRequest, ProductFilter};
pub use money::Money;
pub use session::{AuthSession, AuthTokens, PersistedAuth};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key under which the auth session snapshot is persisted.
///
/// The web pages used the same key in browser local storage, so a
/// snapshot written by either side is readable by the other.
pub const AUTH_STORAGE_KEY: &str = "auth-storage";

/// Snapshot format version written by [`PersistedAuth`].
pub const AUTH_SNAPSHOT_VERSION: u32 = 0;

/// Default page size for admin listings.
pub const DEFAULT_PAGE_SIZE: usize = 10;
