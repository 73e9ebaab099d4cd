use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Category, CategoryId, ProductId};

// ---------------------------------------------------------------------------
// Product: Catalog record as returned by `/productos`
// ---------------------------------------------------------------------------

/// A sellable product. Read-only from the cart's point of view: stock only
/// changes server side and is observed by refetching the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "producto_id")]
    pub id: ProductId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unit price. The backend sends either a number or a numeric string.
    #[serde(rename = "precio", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    /// Units available for sale.
    #[serde(default)]
    pub stock: u32,
    #[serde(rename = "codigo_barra", default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(rename = "categoria_id", default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(rename = "categoria", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(rename = "imagen_url", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "activo", default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(rename = "fecha_creacion", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Product {
    /// Minimal constructor for the fields the cart cares about.
    pub fn new(id: i64, name: impl Into<String>, unit_price: Decimal, stock: u32) -> Self {
        Self {
            id: ProductId(id),
            name: name.into(),
            description: None,
            unit_price,
            stock,
            barcode: None,
            category_id: None,
            category: None,
            image_url: None,
            active: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Case-insensitive substring match on name or barcode.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&term)
            || self
                .barcode
                .as_deref()
                .map(|b| b.to_lowercase().contains(&term))
                .unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// ProductDraft / ProductUpdate: Request bodies
// ---------------------------------------------------------------------------

/// Body for creating a product. Validated and trimmed before sending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "precio", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub stock: u32,
    #[serde(rename = "codigo_barra", default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(rename = "categoria_id", default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(rename = "imagen_url", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Partial update; only `Some` fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "precio",
        with = "rust_decimal::serde::float_option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub unit_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(rename = "codigo_barra", skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(rename = "categoria_id", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(rename = "imagen_url", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "activo", skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}
