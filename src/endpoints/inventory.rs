//! Inventory routes (`/inventario`): the stock movement ledger, the
//! low-stock report and direct stock corrections.

use serde_json::json;

use crate::client::ApiClient;
use crate::config::{
    DEFAULT_LOW_STOCK_LIMIT, INVENTORY_PATH, INVENTORY_PRODUCT_PATH, LOW_STOCK_PATH,
};
use crate::error::{Result, StoreError};
use crate::models::{LowStockProduct, ProductId, StockMovement, StockMovementDraft};

pub struct InventoryApi<'a> {
    client: &'a ApiClient,
}

impl<'a> InventoryApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// All recorded stock movements.
    pub fn movements(&self) -> Result<Vec<StockMovement>> {
        self.client.get(INVENTORY_PATH, &[])
    }

    /// Stock movements for one product.
    pub fn movements_for(&self, product_id: ProductId) -> Result<Vec<StockMovement>> {
        self.client
            .get(&format!("{INVENTORY_PRODUCT_PATH}/{product_id}"), &[])
    }

    /// Record an inbound or outbound movement.
    pub fn record_movement(&self, draft: &StockMovementDraft) -> Result<StockMovement> {
        if draft.quantity == 0 {
            return Err(StoreError::InvalidArgument(
                "movement quantity must be greater than 0".into(),
            ));
        }
        tracing::info!(
            product_id = %draft.product_id,
            kind = ?draft.kind,
            quantity = draft.quantity,
            "recording stock movement"
        );
        self.client.post(INVENTORY_PATH, draft)
    }

    /// Products at or below the stock `limit` (defaults to 10).
    pub fn low_stock(&self, limit: Option<u32>) -> Result<Vec<LowStockProduct>> {
        let limit = limit.unwrap_or(DEFAULT_LOW_STOCK_LIMIT);
        self.client
            .get(LOW_STOCK_PATH, &[("limite", limit.to_string())])
    }

    /// Overwrite a product's stock count.
    pub fn set_stock(&self, product_id: ProductId, stock: u32) -> Result<serde_json::Value> {
        tracing::info!(product_id = %product_id, stock, "setting stock");
        self.client.patch(
            &format!("{INVENTORY_PRODUCT_PATH}/{product_id}"),
            &json!({ "stock": stock }),
        )
    }
}
