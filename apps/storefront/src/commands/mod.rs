//! # Commands
//!
//! The operations the UI (here: the console) invokes. Each takes the
//! state it needs and returns `Result<T, Notice>`.
//!
//! - [`cart`] - storefront cart manipulation
//! - [`checkout`] - validate, submit once, clear on success
//! - [`auth`] - sign-in/up/out, password recovery, session view
//! - [`catalog`] - establishments, menus, admin products and categories
//! - [`establishment`] - own profile and addresses
//! - [`orders`] - admin order list, status updates, manual orders

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod establishment;
pub mod orders;
