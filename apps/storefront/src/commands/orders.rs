//! # Order Commands
//!
//! Admin order table, status changes and manual (staff keyed) orders.
//!
//! ## Status Change Guard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  update_order_status(order_id, change)                                  │
//! │                                                                         │
//! │  signed in? ──no──► SESSION_EXPIRED                                     │
//! │  order in list? ──no──► NOT_FOUND                                       │
//! │  can_manage(order.establishmentId)? ──no──► FORBIDDEN (nothing sent)    │
//! │  PATCH .../{approval|delivery|payment}-status                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use roda_client::{ApiClient, ClientError};
use roda_core::{
    ApprovalStatus, CartAction, CheckoutForm, DeliveryStatus, ManualOrderDraft, Order,
    OrderFilter, Page, PageRequest, PaymentStatus, Product, Role,
};

use crate::error::Notice;
use crate::state::ManualOrderState;

/// One move on one of the three status axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "axis", content = "status", rename_all = "snake_case")]
pub enum StatusChange {
    Approval(ApprovalStatus),
    Delivery(DeliveryStatus),
    Payment(PaymentStatus),
}

pub async fn list_orders(
    client: &ApiClient,
    filter: &OrderFilter,
    page: PageRequest,
) -> Result<Page<Order>, Notice> {
    debug!(?filter, page = page.page, "list_orders command");
    let orders = client.orders().list().await?;
    Ok(page.paginate(&filter.apply(&orders)))
}

pub async fn update_order_status(
    client: &ApiClient,
    order_id: &str,
    change: StatusChange,
) -> Result<Order, Notice> {
    debug!(order_id, ?change, "update_order_status command");

    let session = client.session().current().await;
    if !session.is_authenticated {
        return Err(ClientError::NotSignedIn.into());
    }

    let orders = client.orders().list().await?;
    let order = orders
        .iter()
        .find(|o| o.id == order_id)
        .ok_or_else(|| Notice::not_found("Order", order_id))?;

    if !session.can_manage_establishment(&order.establishment_id) {
        warn!(
            order_id,
            establishment_id = %order.establishment_id,
            "Status change refused for foreign establishment"
        );
        return Err(Notice::forbidden(
            "You can only manage orders of your own establishment.",
        ));
    }

    let api = client.orders();
    let updated = match change {
        StatusChange::Approval(status) => api.set_approval_status(order_id, status).await?,
        StatusChange::Delivery(status) => api.set_delivery_status(order_id, status).await?,
        StatusChange::Payment(status) => api.set_payment_status(order_id, status).await?,
    };
    Ok(updated)
}

// =============================================================================
// Manual Orders
// =============================================================================

/// Adds a product from the establishment's own catalog to the draft.
pub fn manual_order_add(
    draft: &ManualOrderState,
    products: &[Product],
    product_id: &str,
    quantity: u32,
) -> Result<ManualOrderDraft, Notice> {
    let product = products
        .iter()
        .find(|p| p.id == product_id)
        .ok_or_else(|| Notice::not_found("Product", product_id))?;
    if !product.is_available {
        return Err(Notice::validation(format!(
            "{} is not available right now",
            product.name
        )));
    }
    debug!(product_id, quantity, "manual_order_add command");
    Ok(draft.dispatch(CartAction::Add {
        product: product.clone(),
        quantity,
    }))
}

pub fn manual_order_update(draft: &ManualOrderState, action: CartAction) -> ManualOrderDraft {
    draft.dispatch(action)
}

pub fn manual_order_set_form(draft: &ManualOrderState, form: CheckoutForm) -> ManualOrderDraft {
    draft.set_form(form)
}

/// Sends the draft to `POST /establishment/order/new`.
///
/// Only establishment admins and masters may key orders in. The draft is
/// reset on success and kept on any failure.
pub async fn submit_manual_order(
    client: &ApiClient,
    draft: &ManualOrderState,
) -> Result<Order, Notice> {
    let _submitting = draft
        .submission()
        .try_begin()
        .ok_or_else(Notice::submit_in_progress)?;

    let session = client.session().current().await;
    if !session.is_authenticated {
        return Err(ClientError::NotSignedIn.into());
    }
    if !matches!(session.role(), Some(Role::Master | Role::EstablishmentAdmin)) {
        return Err(Notice::forbidden(
            "Only establishment staff can create manual orders.",
        ));
    }

    let request = draft.snapshot().assemble()?;
    let order = client.orders().create_manual(&request).await?;
    draft.reset();

    info!(order_id = %order.id, "Manual order submitted");
    Ok(order)
}
