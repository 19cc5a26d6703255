//! # Product Endpoints
//!
//! Admin-side catalog. Listing returns everything; filtering and paging
//! happen locally with [`roda_core::ProductFilter`] and
//! [`roda_core::PageRequest`].

use tracing::{debug, info};

use roda_core::validation::validate_new_product;
use roda_core::{NewProduct, Product, ProductCategory};

use crate::error::ClientResult;
use crate::http::ApiClient;

#[derive(Debug, Clone)]
pub struct ProductApi {
    client: ApiClient,
}

impl ProductApi {
    pub fn new(client: ApiClient) -> Self {
        ProductApi { client }
    }

    /// `GET /establishment/product/list`
    pub async fn list(&self) -> ClientResult<Vec<Product>> {
        let products: Vec<Product> = self
            .client
            .get(&["establishment", "product", "list"])
            .await?;
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    /// `POST /establishment/product/new`, after local validation.
    pub async fn create(&self, product: &NewProduct) -> ClientResult<Product> {
        validate_new_product(product)?;

        let created: Product = self
            .client
            .post(&["establishment", "product", "new"], product)
            .await?;
        info!(product_id = %created.id, name = %created.name, "Product created");
        Ok(created)
    }

    /// `GET /establishment/product/categories`
    pub async fn categories(&self) -> ClientResult<Vec<ProductCategory>> {
        self.client
            .get(&["establishment", "product", "categories"])
            .await
    }
}
