//! Storefront commands against a mock backend.

use httpmock::prelude::*;
use httpmock::Method::PATCH;
use serde_json::json;
use std::path::Path;

use roda_client::ClientConfig;
use roda_core::{
    AddressForm, AuthTokens, CartAction, CheckoutForm, DeliveryStatus, DeliveryType, Money,
    PaymentMethod, Product, Role, User,
};
use roda_storefront::cli::{execute, Cli};
use roda_storefront::commands::{cart, checkout, orders};
use roda_storefront::error::ErrorCode;
use roda_storefront::state::AppState;

use clap::Parser;

fn app_for(server: &MockServer, dir: &Path) -> AppState {
    let mut config = ClientConfig::default();
    config.api.base_url = server.base_url();
    config.api.initial_backoff_ms = 1;
    config.api.max_backoff_ms = 5;
    config.storage.dir = Some(dir.to_path_buf());
    AppState::new(config).unwrap()
}

async fn sign_in_as(app: &AppState, role: Role, establishment_id: Option<&str>) {
    app.client
        .session()
        .sign_in(
            User {
                id: "u-1".into(),
                name: "Ana".into(),
                email: "ana@example.com".into(),
                role,
                establishment_id: establishment_id.map(str::to_string),
            },
            AuthTokens {
                access_token: "tok-123".into(),
                refresh_token: "ref-456".into(),
            },
        )
        .await
        .unwrap();
}

fn pickup_form() -> CheckoutForm {
    CheckoutForm {
        name: "Maria".into(),
        email: "maria@example.com".into(),
        phone: "11999990000".into(),
        delivery_type: DeliveryType::Pickup,
        payment_method: Some(PaymentMethod::Pix),
        address: AddressForm::default(),
        notes: None,
    }
}

fn order_json(id: &str, establishment_id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "establishmentId": establishment_id,
        "customer": { "name": "Maria", "email": "maria@example.com", "phone": "11999990000" },
        "items": [{ "productId": "p-1", "quantity": 2 }],
        "total": 20.0,
        "paymentMethod": "pix",
        "deliveryType": "pickup",
        "createdAt": "2026-03-01T12:00:00Z"
    })
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn checkout_success_clears_cart() {
    let server = MockServer::start();
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&server, dir.path());

    let place = server.mock(|when, then| {
        when.method(POST)
            .path("/public/establishment/e-1/order")
            .json_body(json!({
                "items": [{ "productId": "p-1", "quantity": 2 }],
                "total": 20.0,
                "paymentMethod": "pix",
                "deliveryType": "pickup",
                "customer": { "name": "Maria", "email": "maria@example.com", "phone": "11999990000" }
            }));
        then.status(201).json_body(order_json("o-1", "e-1"));
    });

    let pizza = Product::new("p-1", "Pizza", Money::from_cents(1000));
    cart::add_to_cart(&app.cart, &pizza, Some(2)).unwrap();

    let response = checkout::submit_checkout(&app.client, &app.cart, "e-1", &pickup_form())
        .await
        .unwrap();

    place.assert_hits(1);
    assert_eq!(response.order.id, "o-1");
    assert_eq!(response.notice.code, ErrorCode::Ok);
    assert!(cart::get_cart(&app.cart).items.is_empty());
    assert!(!app.cart.submission().is_submitting());
}

#[tokio::test]
async fn checkout_failure_keeps_cart() {
    let server = MockServer::start();
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&server, dir.path());

    let place = server.mock(|when, then| {
        when.method(POST).path("/public/establishment/e-1/order");
        then.status(500).json_body(json!({ "message": "Kitchen closed" }));
    });

    let pizza = Product::new("p-1", "Pizza", Money::from_cents(1000));
    cart::add_to_cart(&app.cart, &pizza, Some(2)).unwrap();

    let notice = checkout::submit_checkout(&app.client, &app.cart, "e-1", &pickup_form())
        .await
        .unwrap_err();

    place.assert_hits(1);
    assert_eq!(notice.code, ErrorCode::RequestFailed);
    assert_eq!(notice.message, "Kitchen closed");
    assert_eq!(cart::get_cart(&app.cart).totals.total_quantity, 2);
    assert!(!app.cart.submission().is_submitting());
}

#[tokio::test]
async fn checkout_with_invalid_form_sends_nothing() {
    let server = MockServer::start();
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&server, dir.path());

    let place = server.mock(|when, then| {
        when.method(POST).path("/public/establishment/e-1/order");
        then.status(201).json_body(order_json("o-1", "e-1"));
    });

    let pizza = Product::new("p-1", "Pizza", Money::from_cents(1000));
    cart::add_to_cart(&app.cart, &pizza, None).unwrap();

    let form = CheckoutForm {
        email: String::new(),
        payment_method: None,
        ..pickup_form()
    };
    let notice = checkout::submit_checkout(&app.client, &app.cart, "e-1", &form)
        .await
        .unwrap_err();

    place.assert_hits(0);
    assert_eq!(notice.code, ErrorCode::ValidationError);
    let fields: Vec<&str> = notice.fields.iter().map(|f| f.field.as_str()).collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"paymentMethod"));
}

#[tokio::test]
async fn checkout_refused_while_another_is_in_flight() {
    let server = MockServer::start();
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&server, dir.path());

    let place = server.mock(|when, then| {
        when.method(POST).path("/public/establishment/e-1/order");
        then.status(201).json_body(order_json("o-1", "e-1"));
    });

    app.cart.dispatch(CartAction::Add {
        product: Product::new("p-1", "Pizza", Money::from_cents(1000)),
        quantity: 1,
    });

    let _in_flight = app.cart.submission().try_begin().unwrap();
    let notice = checkout::submit_checkout(&app.client, &app.cart, "e-1", &pickup_form())
        .await
        .unwrap_err();

    place.assert_hits(0);
    assert_eq!(notice.code, ErrorCode::SubmitInProgress);
    assert_eq!(cart::get_cart(&app.cart).items.len(), 1);
}

#[tokio::test]
async fn checkout_command_builds_cart_from_menu() {
    let server = MockServer::start();
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&server, dir.path());

    server.mock(|when, then| {
        when.method(GET).path("/public/establishment/e-1/product/list");
        then.status(200).json_body(json!([
            { "id": "p-1", "name": "Pizza", "price": "10,00" },
            { "id": "p-2", "name": "Soda", "price": 5 }
        ]));
    });
    let place = server.mock(|when, then| {
        when.method(POST)
            .path("/public/establishment/e-1/order")
            .body_contains("\"total\":25.0");
        then.status(201).json_body(order_json("o-7", "e-1"));
    });

    let cli = Cli::try_parse_from([
        "roda", "checkout", "e-1",
        "--item", "p-1:2", "--item", "p-2",
        "--name", "Maria", "--email", "maria@example.com", "--phone", "11999990000",
        "--payment", "cash", "--pickup",
    ])
    .unwrap();

    let output = execute(&app, cli.command).await.unwrap();

    place.assert_hits(1);
    assert_eq!(output["order"]["id"], "o-7");
    assert!(cart::get_cart(&app.cart).items.is_empty());
}

// =============================================================================
// Order Status
// =============================================================================

#[tokio::test]
async fn status_change_on_foreign_establishment_is_forbidden() {
    let server = MockServer::start();
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&server, dir.path());
    sign_in_as(&app, Role::EstablishmentAdmin, Some("e-1")).await;

    server.mock(|when, then| {
        when.method(GET).path("/establishment/order/list");
        then.status(200).json_body(json!([order_json("o-2", "e-2")]));
    });
    let patch = server.mock(|when, then| {
        when.method(PATCH).path("/establishment/order/o-2/delivery-status");
        then.status(200).json_body(order_json("o-2", "e-2"));
    });

    let notice = orders::update_order_status(
        &app.client,
        "o-2",
        orders::StatusChange::Delivery(DeliveryStatus::Ready),
    )
    .await
    .unwrap_err();

    patch.assert_hits(0);
    assert_eq!(notice.code, ErrorCode::Forbidden);
}

#[tokio::test]
async fn status_change_on_own_establishment_is_sent() {
    let server = MockServer::start();
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&server, dir.path());
    sign_in_as(&app, Role::EstablishmentAdmin, Some("e-1")).await;

    server.mock(|when, then| {
        when.method(GET).path("/establishment/order/list");
        then.status(200).json_body(json!([order_json("o-1", "e-1")]));
    });
    let patch = server.mock(|when, then| {
        when.method(PATCH)
            .path("/establishment/order/o-1/delivery-status")
            .header("authorization", "Bearer tok-123")
            .json_body(json!({ "status": "ready" }));
        then.status(200).json_body(order_json("o-1", "e-1"));
    });

    let order = orders::update_order_status(
        &app.client,
        "o-1",
        orders::StatusChange::Delivery(DeliveryStatus::Ready),
    )
    .await
    .unwrap();

    patch.assert_hits(1);
    assert_eq!(order.id, "o-1");
}

#[tokio::test]
async fn status_change_on_unknown_order_is_not_found() {
    let server = MockServer::start();
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&server, dir.path());
    sign_in_as(&app, Role::Master, None).await;

    server.mock(|when, then| {
        when.method(GET).path("/establishment/order/list");
        then.status(200).json_body(json!([]));
    });

    let notice = orders::update_order_status(
        &app.client,
        "o-404",
        orders::StatusChange::Delivery(DeliveryStatus::Ready),
    )
    .await
    .unwrap_err();

    assert_eq!(notice.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn status_change_requires_sign_in() {
    let server = MockServer::start();
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&server, dir.path());

    let list = server.mock(|when, then| {
        when.method(GET).path("/establishment/order/list");
        then.status(200).json_body(json!([]));
    });

    let notice = orders::update_order_status(
        &app.client,
        "o-1",
        orders::StatusChange::Delivery(DeliveryStatus::Ready),
    )
    .await
    .unwrap_err();

    list.assert_hits(0);
    assert_eq!(notice.code, ErrorCode::SessionExpired);
}

// =============================================================================
// Manual Orders
// =============================================================================

#[tokio::test]
async fn manual_order_resets_draft_on_success() {
    let server = MockServer::start();
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&server, dir.path());
    sign_in_as(&app, Role::EstablishmentAdmin, Some("e-1")).await;

    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/establishment/order/new")
            .header("authorization", "Bearer tok-123");
        then.status(201).json_body(order_json("o-9", "e-1"));
    });

    let products = vec![Product::new("p-1", "Marmita", Money::from_cents(1000))];
    orders::manual_order_add(&app.manual_order, &products, "p-1", 2).unwrap();
    orders::manual_order_set_form(&app.manual_order, pickup_form());

    let order = orders::submit_manual_order(&app.client, &app.manual_order)
        .await
        .unwrap();

    create.assert_hits(1);
    assert_eq!(order.id, "o-9");
    assert!(app.manual_order.snapshot().cart.is_empty());
}

#[tokio::test]
async fn manual_order_refused_for_customers() {
    let server = MockServer::start();
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&server, dir.path());
    sign_in_as(&app, Role::User, None).await;

    let create = server.mock(|when, then| {
        when.method(POST).path("/establishment/order/new");
        then.status(201).json_body(order_json("o-9", "e-1"));
    });

    let products = vec![Product::new("p-1", "Marmita", Money::from_cents(1000))];
    orders::manual_order_add(&app.manual_order, &products, "p-1", 1).unwrap();
    orders::manual_order_set_form(&app.manual_order, pickup_form());

    let notice = orders::submit_manual_order(&app.client, &app.manual_order)
        .await
        .unwrap_err();

    create.assert_hits(0);
    assert_eq!(notice.code, ErrorCode::Forbidden);
    assert_eq!(app.manual_order.snapshot().cart.total_items(), 1);
}
