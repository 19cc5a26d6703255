//! # Checkout
//!
//! Turns a cart plus the customer-entered form into an order-creation
//! request.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Assembly                                    │
//! │                                                                         │
//! │  Cart ──────────┐                                                       │
//! │                 ├──► validate_checkout() ──► CheckoutErrors (inline)   │
//! │  CheckoutForm ──┘           │                                           │
//! │                             ▼ ok                                        │
//! │                      assemble_order()                                   │
//! │                             │                                           │
//! │                             ▼                                           │
//! │  CreateOrderRequest {                                                   │
//! │     items:  [{productId, quantity}, ...]                               │
//! │     total, paymentMethod, deliveryType, customer,                      │
//! │     address (only for delivery), notes                                 │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation is required-field only: name, e-mail, phone, a selected
//! payment method, and the address fields when the order is delivered.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Address, Customer, DeliveryType, PaymentMethod};
use crate::validation::require;

// =============================================================================
// Form Types
// =============================================================================

/// Address inputs as typed into the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AddressForm {
    pub street: String,
    pub number: String,
    #[serde(default)]
    pub complement: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// The checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub delivery_type: DeliveryType,
    /// `None` until the customer picks one.
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub address: AddressForm,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Default for CheckoutForm {
    fn default() -> Self {
        CheckoutForm {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            delivery_type: DeliveryType::Delivery,
            payment_method: None,
            address: AddressForm::default(),
            notes: None,
        }
    }
}

// =============================================================================
// Request Types
// =============================================================================

/// One `{productId, quantity}` pair of an order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: u32,
}

/// Body of the order-creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<OrderLine>,
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub delivery_type: DeliveryType,
    pub customer: Customer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// =============================================================================
// Errors
// =============================================================================

/// Every field-level failure of one checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutErrors {
    errors: Vec<ValidationError>,
}

impl CheckoutErrors {
    /// All failures in form order.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// The failure attached to a field, if any.
    pub fn for_field(&self, field: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.field() == field)
    }

    /// Whether the given field failed.
    pub fn has(&self, field: &str) -> bool {
        self.for_field(field).is_some()
    }
}

impl fmt::Display for CheckoutErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for CheckoutErrors {}

// =============================================================================
// Validation & Assembly
// =============================================================================

/// Collects failures instead of stopping at the first one.
#[derive(Default)]
struct Collector {
    errors: Vec<ValidationError>,
}

impl Collector {
    fn require(&mut self, field: &str, value: &str) -> String {
        match require(field, value) {
            Ok(v) => v.to_string(),
            Err(e) => {
                self.errors.push(e);
                String::new()
            }
        }
    }

    fn finish(self) -> Result<(), CheckoutErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CheckoutErrors {
                errors: self.errors,
            })
        }
    }
}

/// Validates the cart and form.
///
/// ## Rules
/// - Cart must not be empty (field `items`)
/// - `name`, `email`, `phone` are required
/// - `paymentMethod` must be selected
/// - For `delivery`: `address.street`, `address.number`,
///   `address.neighborhood`, `address.city`, `address.state` and
///   `address.zipCode` are required; `complement` never is
/// - For `pickup`: address fields are ignored
pub fn validate_checkout(cart: &Cart, form: &CheckoutForm) -> Result<(), CheckoutErrors> {
    let mut c = Collector::default();
    check(&mut c, cart, form);
    c.finish()
}

fn check(c: &mut Collector, cart: &Cart, form: &CheckoutForm) -> (Customer, Option<Address>) {
    if cart.is_empty() {
        c.errors.push(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    let customer = Customer {
        name: c.require("name", &form.name),
        email: c.require("email", &form.email),
        phone: c.require("phone", &form.phone),
    };

    if form.payment_method.is_none() {
        c.errors.push(ValidationError::NotSelected {
            field: "paymentMethod".to_string(),
        });
    }

    let address = match form.delivery_type {
        DeliveryType::Pickup => None,
        DeliveryType::Delivery => {
            let a = &form.address;
            let complement = a.complement.trim();
            Some(Address {
                id: None,
                street: c.require("address.street", &a.street),
                number: c.require("address.number", &a.number),
                complement: (!complement.is_empty()).then(|| complement.to_string()),
                neighborhood: c.require("address.neighborhood", &a.neighborhood),
                city: c.require("address.city", &a.city),
                state: c.require("address.state", &a.state),
                zip_code: c.require("address.zipCode", &a.zip_code),
            })
        }
    };

    (customer, address)
}

/// Validates and builds the order-creation request.
///
/// The total is computed from the cart's price snapshots.
pub fn assemble_order(cart: &Cart, form: &CheckoutForm) -> Result<CreateOrderRequest, CheckoutErrors> {
    let mut c = Collector::default();
    let (customer, address) = check(&mut c, cart, form);
    c.finish()?;

    let payment_method = form.payment_method.ok_or_else(|| CheckoutErrors {
        errors: vec![ValidationError::NotSelected {
            field: "paymentMethod".to_string(),
        }],
    })?;

    let notes = form
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    Ok(CreateOrderRequest {
        items: cart.to_order_lines(),
        total: cart.total_price(),
        payment_method,
        delivery_type: form.delivery_type,
        customer,
        address,
        notes,
    })
}

// =============================================================================
// Manual Order Draft
// =============================================================================

/// An order an establishment admin is building on a customer's behalf.
///
/// Uses the same cart reducer and form rules as the public checkout; it is
/// submitted to the admin endpoint instead of the public one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManualOrderDraft {
    pub cart: Cart,
    pub form: CheckoutForm,
}

impl ManualOrderDraft {
    /// Creates an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and builds the request.
    pub fn assemble(&self) -> Result<CreateOrderRequest, CheckoutErrors> {
        assemble_order(&self.cart, &self.form)
    }

    /// Resets the draft after a successful submission.
    #[must_use]
    pub fn cleared(&self) -> ManualOrderDraft {
        ManualOrderDraft::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Product;

    fn cart() -> Cart {
        Cart::new()
            .add_item(&Product::new("a", "Açaí 500ml", Money::from_cents(1800)), 2)
            .add_item(&Product::new("b", "Pastel", Money::from_cents(700)), 1)
    }

    fn filled_address() -> AddressForm {
        AddressForm {
            street: "Rua da Aurora".into(),
            number: "120".into(),
            complement: String::new(),
            neighborhood: "Boa Vista".into(),
            city: "Recife".into(),
            state: "PE".into(),
            zip_code: "50050-000".into(),
        }
    }

    fn form(delivery_type: DeliveryType) -> CheckoutForm {
        CheckoutForm {
            name: "Maria".into(),
            email: "maria@example.com".into(),
            phone: "81999990000".into(),
            delivery_type,
            payment_method: Some(PaymentMethod::Pix),
            address: AddressForm::default(),
            notes: None,
        }
    }

    #[test]
    fn test_pickup_needs_no_address() {
        assert!(validate_checkout(&cart(), &form(DeliveryType::Pickup)).is_ok());

        let request = assemble_order(&cart(), &form(DeliveryType::Pickup)).unwrap();
        assert!(request.address.is_none());
    }

    #[test]
    fn test_delivery_fails_on_any_empty_address_field() {
        let fields: [(&str, fn(&mut AddressForm)); 6] = [
            ("address.street", |a| a.street.clear()),
            ("address.number", |a| a.number.clear()),
            ("address.neighborhood", |a| a.neighborhood.clear()),
            ("address.city", |a| a.city.clear()),
            ("address.state", |a| a.state.clear()),
            ("address.zipCode", |a| a.zip_code = "  ".into()),
        ];

        for (field, blank) in fields {
            let mut f = form(DeliveryType::Delivery);
            f.address = filled_address();
            blank(&mut f.address);

            let errors = validate_checkout(&cart(), &f).unwrap_err();
            assert!(errors.has(field), "expected error on {}", field);
            assert_eq!(errors.errors().len(), 1);
        }
    }

    #[test]
    fn test_delivery_with_full_address_passes() {
        let mut f = form(DeliveryType::Delivery);
        f.address = filled_address();

        let request = assemble_order(&cart(), &f).unwrap();
        let address = request.address.unwrap();
        assert_eq!(address.city, "Recife");
        assert!(address.complement.is_none());
    }

    #[test]
    fn test_all_missing_fields_are_reported() {
        let f = CheckoutForm::default();
        let errors = validate_checkout(&Cart::new(), &f).unwrap_err();

        for field in ["items", "name", "email", "phone", "paymentMethod", "address.street"] {
            assert!(errors.has(field), "missing error for {}", field);
        }
    }

    #[test]
    fn test_assembled_request_shape() {
        let mut f = form(DeliveryType::Pickup);
        f.payment_method = Some(PaymentMethod::CreditCard);
        f.notes = Some("  sem cebola ".into());

        let request = assemble_order(&cart(), &f).unwrap();
        assert_eq!(request.total, Money::from_cents(2 * 1800 + 700));
        assert_eq!(request.items.len(), 2);
        assert_eq!(request.notes.as_deref(), Some("sem cebola"));

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["items"][0]["productId"], "a");
        assert_eq!(json["items"][0]["quantity"], 2);
        assert_eq!(json["total"], 43.0);
        assert_eq!(json["paymentMethod"], "credit_card");
        assert_eq!(json["deliveryType"], "pickup");
        assert_eq!(json["customer"]["name"], "Maria");
        assert!(json.get("address").is_none());
    }

    #[test]
    fn test_blank_notes_are_dropped() {
        let mut f = form(DeliveryType::Pickup);
        f.notes = Some("   ".into());
        assert!(assemble_order(&cart(), &f).unwrap().notes.is_none());
    }

    #[test]
    fn test_manual_order_draft() {
        let mut draft = ManualOrderDraft::new();
        assert!(draft.assemble().is_err());

        draft.cart = cart();
        draft.form = form(DeliveryType::Pickup);
        assert!(draft.assemble().is_ok());
        assert!(draft.cleared().cart.is_empty());
    }
}
