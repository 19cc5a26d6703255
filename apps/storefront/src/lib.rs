//! # Roda Já Storefront
//!
//! Application layer of the Roda Já client: the customer storefront (menu,
//! cart, checkout) and the establishment admin (products, orders, manual
//! orders, profile).
//!
//! ## Module Structure
//! ```text
//! roda_storefront/
//! ├── cli.rs          ← clap definitions + dispatch for the `roda` binary
//! ├── error.rs        ← Notice: what every failing command returns
//! ├── state/
//! │   ├── cart.rs          ← CartState (shared cart + totals view)
//! │   ├── manual_order.rs  ← ManualOrderState (admin draft)
//! │   └── submit.rs        ← SubmissionFlag (one submit at a time)
//! └── commands/
//!     ├── auth.rs          ← sign in/up/out, password reset, whoami
//!     ├── cart.rs          ← add/increase/decrease/remove/clear
//!     ├── checkout.rs      ← submit_checkout
//!     ├── catalog.rs       ← establishments, menus, products
//!     ├── establishment.rs ← profile and addresses
//!     └── orders.rs        ← order table, status changes, manual orders
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr; stdout carries command output.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=roda_client=trace` - Trace HTTP calls only
/// - Default: WARN, INFO for `roda_client` and `roda_storefront`
/// - `--verbose`: INFO, DEBUG for the roda crates
pub fn init_tracing(verbose: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
}

/// Filter used when `RUST_LOG` is unset.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "info,roda_core=debug,roda_client=debug,roda_storefront=debug"
    } else {
        "warn,roda_client=info,roda_storefront=info"
    }
}
