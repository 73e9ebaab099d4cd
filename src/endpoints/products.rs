//! Product catalog routes (`/productos`).

use crate::cart::CatalogSource;
use crate::client::ApiClient;
use crate::config::PRODUCTS_PATH;
use crate::error::Result;
use crate::models::{DeleteAck, Product, ProductDraft, ProductId, ProductUpdate};
use crate::validation;

/// Endpoint wrapper for the product catalog.
pub struct ProductApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ProductApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List every product.
    pub fn list(&self) -> Result<Vec<Product>> {
        self.client.get(PRODUCTS_PATH, &[])
    }

    pub fn get(&self, id: ProductId) -> Result<Product> {
        self.client.get(&format!("{PRODUCTS_PATH}/{id}"), &[])
    }

    /// List products whose name or barcode contains `term` (case-insensitive).
    ///
    /// The backend has no search route, so this filters the full list.
    pub fn search(&self, term: &str) -> Result<Vec<Product>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|p| p.matches(term))
            .collect())
    }

    /// Validate and create a product.
    pub fn create(&self, draft: &ProductDraft) -> Result<Product> {
        let draft = validation::validate_product(draft)?;
        tracing::info!(name = %draft.name, "creating product");
        self.client.post(PRODUCTS_PATH, &draft)
    }

    pub fn update(&self, id: ProductId, update: &ProductUpdate) -> Result<Product> {
        self.client.patch(&format!("{PRODUCTS_PATH}/{id}"), update)
    }

    pub fn delete(&self, id: ProductId) -> Result<DeleteAck> {
        tracing::info!(product_id = %id, "deleting product");
        self.client.delete(&format!("{PRODUCTS_PATH}/{id}"))
    }
}

impl CatalogSource for ProductApi<'_> {
    fn fetch_products(&self) -> Result<Vec<Product>> {
        self.list()
    }
}
