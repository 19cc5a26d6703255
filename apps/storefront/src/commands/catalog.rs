//! # Catalog Commands
//!
//! Public directory and menus for customers; the product table for admins.
//! Lists are fetched whole and filtered/paged locally.

use tracing::debug;

use roda_client::ApiClient;
use roda_core::{
    Establishment, NewProduct, Page, PageRequest, Product, ProductCategory, ProductFilter,
};

use crate::error::Notice;

pub async fn list_establishments(client: &ApiClient) -> Result<Vec<Establishment>, Notice> {
    debug!("list_establishments command");
    Ok(client.public().establishments().await?)
}

/// A menu, narrowed by the filter.
pub async fn get_menu(
    client: &ApiClient,
    establishment_id: &str,
    filter: &ProductFilter,
) -> Result<Vec<Product>, Notice> {
    debug!(establishment_id, ?filter, "get_menu command");
    let products = client.public().menu(establishment_id).await?;
    Ok(filter.apply(&products))
}

/// The admin product table.
pub async fn list_products(
    client: &ApiClient,
    filter: &ProductFilter,
    page: PageRequest,
) -> Result<Page<Product>, Notice> {
    debug!(?filter, page = page.page, "list_products command");
    let products = client.products().list().await?;
    Ok(page.paginate(&filter.apply(&products)))
}

pub async fn create_product(client: &ApiClient, product: &NewProduct) -> Result<Product, Notice> {
    debug!(name = %product.name, "create_product command");
    Ok(client.products().create(product).await?)
}

pub async fn list_categories(client: &ApiClient) -> Result<Vec<ProductCategory>, Notice> {
    Ok(client.products().categories().await?)
}
