//! # State Module
//!
//! Everything a command may need, bundled in [`AppState`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐    │
//! │  │   CartState      │ │ ManualOrderState │ │   ApiClient          │    │
//! │  │                  │ │                  │ │                      │    │
//! │  │  Arc<Mutex<Cart>>│ │  Arc<Mutex<      │ │  reqwest pool        │    │
//! │  │  + submitting    │ │   Draft>>        │ │  SessionHandle       │    │
//! │  │                  │ │  + submitting    │ │  (Arc<RwLock<Auth>>) │    │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘    │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Cart and draft: Mutex, held only while swapping the value           │
//! │  • Session: tokio RwLock, shared with the transport's 401 handler      │
//! │  • Config: read-only after startup                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod manual_order;
mod submit;

pub use cart::{CartResponse, CartState, CartTotals};
pub use manual_order::ManualOrderState;
pub use submit::{SubmissionFlag, SubmissionGuard};

use tracing::info;

use roda_client::{ApiClient, ClientConfig, ClientResult, LocalStorage, SessionHandle};

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: ClientConfig,
    pub client: ApiClient,
    pub cart: CartState,
    pub manual_order: ManualOrderState,
}

impl AppState {
    /// Rehydrates the session from the configured storage dir and builds
    /// the client.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let storage = LocalStorage::new(config.storage_dir()?);
        info!(dir = ?storage.dir(), "Using session storage");

        let session = SessionHandle::rehydrate(storage);
        let client = ApiClient::new(&config, session)?;

        Ok(AppState {
            config,
            client,
            cart: CartState::new(),
            manual_order: ManualOrderState::new(),
        })
    }
}
