//! # Listing Helpers
//!
//! Pagination and filtering over lists already held in memory (the admin
//! product and order tables fetch everything and slice locally).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{ApprovalStatus, DeliveryStatus, Order, PaymentStatus, Product};
use crate::DEFAULT_PAGE_SIZE;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, per_page: usize) -> Self {
        PageRequest { page, per_page }
    }

    /// Slices `items` into the requested page.
    ///
    /// Page 0 is read as page 1 and `per_page` 0 as 1. A page past the end
    /// yields no items but still reports the real totals.
    pub fn paginate<T: Clone>(&self, items: &[T]) -> Page<T> {
        let per_page = self.per_page.max(1);
        let page = self.page.max(1);
        let total_items = items.len();
        let total_pages = total_items.div_ceil(per_page);

        let start = (page - 1).saturating_mul(per_page);
        let slice = items.iter().skip(start).take(per_page).cloned().collect();

        Page {
            items: slice,
            page,
            per_page,
            total_items,
            total_pages,
        }
    }
}

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Filters for the admin orders table. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilter {
    pub approval_status: Option<ApprovalStatus>,
    pub delivery_status: Option<DeliveryStatus>,
    pub payment_status: Option<PaymentStatus>,
    /// Case-insensitive substring of the customer name.
    pub customer: Option<String>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        if self.approval_status.is_some_and(|s| s != order.approval_status) {
            return false;
        }
        if self.delivery_status.is_some_and(|s| s != order.delivery_status) {
            return false;
        }
        if self.payment_status.is_some_and(|s| s != order.payment_status) {
            return false;
        }
        match self.customer.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => contains_ci(&order.customer.name, needle),
            _ => true,
        }
    }

    /// Keeps matching orders, preserving order.
    pub fn apply(&self, orders: &[Order]) -> Vec<Order> {
        orders.iter().filter(|o| self.matches(o)).cloned().collect()
    }
}

/// Filters for the product list and the public menu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    /// Exact category name, case-insensitive.
    pub category: Option<String>,
    /// Case-insensitive substring of the product name.
    pub search: Option<String>,
    pub only_available: bool,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if self.only_available && !product.is_available {
            return false;
        }
        if let Some(category) = self.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            let same = product
                .category
                .as_deref()
                .is_some_and(|c| c.to_lowercase() == category.to_lowercase());
            if !same {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => contains_ci(&product.name, needle),
            _ => true,
        }
    }

    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        products.iter().filter(|p| self.matches(p)).cloned().collect()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{Customer, DeliveryType, PaymentMethod};
    use chrono::Utc;

    fn order(id: &str, customer: &str, approval: ApprovalStatus) -> Order {
        Order {
            id: id.into(),
            establishment_id: "e-1".into(),
            customer: Customer {
                name: customer.into(),
                email: "c@example.com".into(),
                phone: "1".into(),
            },
            items: vec![],
            total: Money::from_cents(1000),
            payment_method: PaymentMethod::Cash,
            delivery_type: DeliveryType::Pickup,
            address: None,
            notes: None,
            approval_status: approval,
            delivery_status: DeliveryStatus::Pending,
            payment_status: PaymentStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (1..=23).collect();

        let page = PageRequest::new(1, 10).paginate(&items);
        assert_eq!(page.items, (1..=10).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());
        assert!(!page.has_previous());

        let last = PageRequest::new(3, 10).paginate(&items);
        assert_eq!(last.items, vec![21, 22, 23]);
        assert!(!last.has_next());

        let beyond = PageRequest::new(9, 10).paginate(&items);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_items, 23);
    }

    #[test]
    fn test_paginate_degenerate_requests() {
        let items = vec!['a', 'b'];
        let page = PageRequest::new(0, 0).paginate(&items);
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 1);
        assert_eq!(page.items, vec!['a']);

        let empty: Vec<char> = vec![];
        assert_eq!(PageRequest::default().paginate(&empty).total_pages, 0);
    }

    #[test]
    fn test_order_filter() {
        let orders = vec![
            order("1", "Maria Souza", ApprovalStatus::Pending),
            order("2", "João", ApprovalStatus::Approved),
            order("3", "maria clara", ApprovalStatus::Approved),
        ];

        let by_status = OrderFilter {
            approval_status: Some(ApprovalStatus::Approved),
            ..Default::default()
        };
        assert_eq!(by_status.apply(&orders).len(), 2);

        let by_name = OrderFilter {
            customer: Some("MARIA".into()),
            ..Default::default()
        };
        let ids: Vec<String> = by_name.apply(&orders).into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec!["1", "3"]);

        assert_eq!(OrderFilter::default().apply(&orders).len(), 3);
    }

    #[test]
    fn test_product_filter() {
        let mut soda = Product::new("1", "Guaraná Lata", Money::from_cents(600));
        soda.category = Some("Bebidas".into());
        let mut burger = Product::new("2", "X-Tudo", Money::from_cents(2800));
        burger.category = Some("Lanches".into());
        burger.is_available = false;
        let products = vec![soda, burger];

        let drinks = ProductFilter {
            category: Some("bebidas".into()),
            ..Default::default()
        };
        assert_eq!(drinks.apply(&products).len(), 1);

        let available = ProductFilter {
            only_available: true,
            ..Default::default()
        };
        assert_eq!(available.apply(&products)[0].id, "1");

        let search = ProductFilter {
            search: Some("tudo".into()),
            ..Default::default()
        };
        assert_eq!(search.apply(&products)[0].id, "2");
    }
}
