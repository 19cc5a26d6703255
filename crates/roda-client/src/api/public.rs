//! # Public Endpoints
//!
//! What an anonymous customer can reach: the establishment directory, a
//! menu, and checkout.

use tracing::{debug, info};

use roda_core::{CreateOrderRequest, Establishment, Order, Product};

use crate::error::ClientResult;
use crate::http::ApiClient;

#[derive(Debug, Clone)]
pub struct PublicApi {
    client: ApiClient,
}

impl PublicApi {
    pub fn new(client: ApiClient) -> Self {
        PublicApi { client }
    }

    /// `GET /public/establishment/list`
    pub async fn establishments(&self) -> ClientResult<Vec<Establishment>> {
        self.client.get(&["public", "establishment", "list"]).await
    }

    /// `GET /public/establishment/:id/product/list`
    pub async fn menu(&self, establishment_id: &str) -> ClientResult<Vec<Product>> {
        let products: Vec<Product> = self
            .client
            .get(&["public", "establishment", establishment_id, "product", "list"])
            .await?;
        debug!(establishment_id, count = products.len(), "Fetched menu");
        Ok(products)
    }

    /// `POST /public/establishment/:id/order`
    ///
    /// Sent once. A failure is returned as-is; nothing is retried.
    pub async fn place_order(
        &self,
        establishment_id: &str,
        request: &CreateOrderRequest,
    ) -> ClientResult<Order> {
        let order: Order = self
            .client
            .post(&["public", "establishment", establishment_id, "order"], request)
            .await?;
        info!(order_id = %order.id, establishment_id, total = %order.total, "Order placed");
        Ok(order)
    }
}
