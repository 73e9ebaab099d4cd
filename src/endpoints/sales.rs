//! Sales routes (`/ventas`).
//!
//! Unlike the catalog routes, the sales routes wrap payloads in a
//! `{ "data": ... }` envelope; [`Enveloped`] accepts both shapes.

use crate::cart::SalesEndpoint;
use crate::client::ApiClient;
use crate::config::SALES_PATH;
use crate::error::{Result, StoreError};
use crate::models::{DeleteAck, Enveloped, Sale, SaleId, SaleUpdate, TransactionRequest};

pub struct SaleApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SaleApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn list(&self) -> Result<Vec<Sale>> {
        let resp: Enveloped<Vec<Sale>> = self.client.get(SALES_PATH, &[])?;
        Ok(resp.into_inner())
    }

    pub fn get(&self, id: SaleId) -> Result<Sale> {
        let resp: Enveloped<Sale> = self.client.get(&format!("{SALES_PATH}/{id}"), &[])?;
        Ok(resp.into_inner())
    }

    /// Record a complete multi-line sale.
    ///
    /// The backend records every line and decrements stock for each, or
    /// records nothing. A 409 response surfaces as
    /// [`StoreError::StockConflict`].
    pub fn submit_transaction(&self, request: &TransactionRequest) -> Result<Sale> {
        tracing::info!(
            lines = request.lines.len(),
            total = %request.total,
            seller_id = %request.seller_id,
            "submitting sale"
        );
        // Only here does 409 mean stock moved under the cart.
        let resp: Enveloped<Sale> = self.client.post(SALES_PATH, request).map_err(|e| match e {
            StoreError::Conflict(message) => StoreError::StockConflict(message),
            other => other,
        })?;
        let sale = resp.into_inner();
        tracing::info!(sale_id = %sale.id, "sale recorded");
        Ok(sale)
    }

    pub fn update(&self, id: SaleId, update: &SaleUpdate) -> Result<Sale> {
        let resp: Enveloped<Sale> = self.client.patch(&format!("{SALES_PATH}/{id}"), update)?;
        Ok(resp.into_inner())
    }

    pub fn delete(&self, id: SaleId) -> Result<DeleteAck> {
        let resp: Option<Enveloped<DeleteAck>> = self.client.delete(&format!("{SALES_PATH}/{id}"))?;
        Ok(resp.map(Enveloped::into_inner).unwrap_or_default())
    }
}

impl SalesEndpoint for SaleApi<'_> {
    fn submit_transaction(&self, request: &TransactionRequest) -> Result<Sale> {
        SaleApi::submit_transaction(self, request)
    }
}
