//! # Order Endpoints
//!
//! Admin order management.
//!
//! ## Status Axes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Each order carries three independent statuses, each with its own      │
//! │  PATCH endpoint. None of them constrains the others.                   │
//! │                                                                         │
//! │  approval   pending ─► approved | rejected                             │
//! │  delivery   pending ─► preparing ─► ready ─► out_for_delivery          │
//! │                      ─► delivered          (or cancelled)              │
//! │  payment    pending ─► paid ─► refunded                                │
//! │                                                                         │
//! │  PATCH /establishment/order/:id/approval-status   {"status": ...}      │
//! │  PATCH /establishment/order/:id/delivery-status   {"status": ...}      │
//! │  PATCH /establishment/order/:id/payment-status    {"status": ...}      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The backend decides which transitions are legal; the client sends
//! whatever was picked.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use roda_core::{ApprovalStatus, CreateOrderRequest, DeliveryStatus, Order, PaymentStatus};

use crate::error::ClientResult;
use crate::http::ApiClient;

/// Body of the three status PATCH calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate<S> {
    pub status: S,
}

#[derive(Debug, Clone)]
pub struct OrderApi {
    client: ApiClient,
}

impl OrderApi {
    pub fn new(client: ApiClient) -> Self {
        OrderApi { client }
    }

    /// `GET /establishment/order/list`
    pub async fn list(&self) -> ClientResult<Vec<Order>> {
        let orders: Vec<Order> = self.client.get(&["establishment", "order", "list"]).await?;
        debug!(count = orders.len(), "Fetched orders");
        Ok(orders)
    }

    pub async fn set_approval_status(&self, id: &str, status: ApprovalStatus) -> ClientResult<Order> {
        info!(order_id = id, ?status, "Updating approval status");
        self.client
            .patch(
                &["establishment", "order", id, "approval-status"],
                &StatusUpdate { status },
            )
            .await
    }

    pub async fn set_delivery_status(&self, id: &str, status: DeliveryStatus) -> ClientResult<Order> {
        info!(order_id = id, ?status, "Updating delivery status");
        self.client
            .patch(
                &["establishment", "order", id, "delivery-status"],
                &StatusUpdate { status },
            )
            .await
    }

    pub async fn set_payment_status(&self, id: &str, status: PaymentStatus) -> ClientResult<Order> {
        info!(order_id = id, ?status, "Updating payment status");
        self.client
            .patch(
                &["establishment", "order", id, "payment-status"],
                &StatusUpdate { status },
            )
            .await
    }

    /// `POST /establishment/order/new`: an order keyed in by staff.
    ///
    /// The request must already be assembled (and so validated).
    pub async fn create_manual(&self, request: &CreateOrderRequest) -> ClientResult<Order> {
        let order: Order = self
            .client
            .post(&["establishment", "order", "new"], request)
            .await?;
        info!(order_id = %order.id, total = %order.total, "Manual order created");
        Ok(order)
    }
}
