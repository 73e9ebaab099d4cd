use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Customer, CustomerId, Product, ProductId, SaleId, UserId};

// ---------------------------------------------------------------------------
// Sale: A persisted transaction as returned by `/ventas`
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    #[serde(rename = "venta_id")]
    pub id: SaleId,
    #[serde(rename = "usuario_id", default, skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<UserId>,
    #[serde(rename = "cliente_id", default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    #[serde(rename = "fecha", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(rename = "cliente", default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    #[serde(rename = "detalles", default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<SaleDetail>,
}

/// One persisted line of a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleDetail {
    #[serde(rename = "detalle_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "venta_id", default, skip_serializing_if = "Option::is_none")]
    pub sale_id: Option<SaleId>,
    #[serde(rename = "producto_id")]
    pub product_id: ProductId,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
    #[serde(rename = "precio_unitario", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(rename = "producto", default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

/// Partial update of a recorded sale; only `Some` fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaleUpdate {
    #[serde(rename = "cliente_id", skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub total: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// TransactionRequest: Body of a sale submission
// ---------------------------------------------------------------------------

/// Snapshot of a cart at submission time.
///
/// Built fresh for every attempt and never mutated afterward; the backend
/// records all lines and decrements stock for each of them, or none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    #[serde(rename = "cliente_id", default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    #[serde(rename = "usuario_id")]
    pub seller_id: UserId,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(rename = "detalles")]
    pub lines: Vec<TransactionLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionLine {
    #[serde(rename = "producto_id")]
    pub product_id: ProductId,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
    #[serde(rename = "precio_unitario", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
}
