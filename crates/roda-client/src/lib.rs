//! # roda-client: Backend Access for Roda Já
//!
//! Everything that leaves the process: HTTP calls to the Roda Já backend
//! and the persisted auth session.
//!
//! ## Module Structure
//! ```text
//! roda_client/
//! ├── config.rs      ← ClientConfig (TOML + RODA_* env overrides)
//! ├── error.rs       ← ClientError, user-facing messages
//! ├── storage.rs     ← LocalStorage (one file per key)
//! ├── session.rs     ← SessionHandle (shared, persisted AuthSession)
//! ├── http.rs        ← ApiClient (bearer auth, 401 logout, read retries)
//! └── api/
//!     ├── auth.rs            ← sign-up / sign-in / password / refresh
//!     ├── establishment.rs   ← profile and addresses
//!     ├── product.rs         ← admin catalog
//!     ├── order.rs           ← admin orders and statuses
//!     └── public.rs          ← directory, menus, checkout
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let config = ClientConfig::load_or_default(None);
//! let session = SessionHandle::rehydrate(LocalStorage::new(config.storage_dir()?));
//! let client = ApiClient::new(&config, session)?;
//!
//! client.auth().sign_in("ana@example.com", "secret").await?;
//! let orders = client.orders().list().await?;
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod storage;

pub use api::{
    AuthApi, AuthResponse, EstablishmentApi, OrderApi, ProductApi, PublicApi, SignUpRequest,
};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, GENERIC_ERROR_MESSAGE, SESSION_EXPIRED_MESSAGE};
pub use http::{ApiClient, RetryPolicy, REQUEST_ID_HEADER};
pub use session::SessionHandle;
pub use storage::LocalStorage;
