//! # Endpoint Wrappers
//!
//! One typed wrapper per backend area, handed out by [`ApiClient`]:
//!
//! ```rust,ignore
//! let products = client.products().list().await?;
//! let orders = client.orders().list().await?;
//! client.orders().set_delivery_status("o-1", DeliveryStatus::Ready).await?;
//! ```
//!
//! - [`auth`] - sign-up, sign-in, password recovery, token refresh
//! - [`establishment`] - the signed-in establishment's profile and addresses
//! - [`product`] - admin product list, creation, categories
//! - [`order`] - admin order list, status updates, manual orders
//! - [`public`] - unauthenticated storefront: establishments, menus, checkout

pub mod auth;
pub mod establishment;
pub mod order;
pub mod product;
pub mod public;

pub use auth::{AuthApi, AuthResponse, ResetPasswordRequest, SignInRequest, SignUpRequest};
pub use establishment::EstablishmentApi;
pub use order::{OrderApi, StatusUpdate};
pub use product::ProductApi;
pub use public::PublicApi;

use crate::http::ApiClient;

impl ApiClient {
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    pub fn establishment(&self) -> EstablishmentApi {
        EstablishmentApi::new(self.clone())
    }

    pub fn products(&self) -> ProductApi {
        ProductApi::new(self.clone())
    }

    pub fn orders(&self) -> OrderApi {
        OrderApi::new(self.clone())
    }

    pub fn public(&self) -> PublicApi {
        PublicApi::new(self.clone())
    }
}
