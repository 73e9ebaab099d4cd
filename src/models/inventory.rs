use serde::{Deserialize, Serialize};

use super::{CategoryId, ProductId};

// ---------------------------------------------------------------------------
// StockMovement: Inventory ledger entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    /// Goods received (`entrada`).
    #[serde(rename = "entrada")]
    In,
    /// Goods removed (`salida`).
    #[serde(rename = "salida")]
    Out,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    #[serde(rename = "inventario_id", default)]
    pub id: Option<i64>,
    #[serde(rename = "producto_id")]
    pub product_id: ProductId,
    #[serde(rename = "tipo_movimiento")]
    pub kind: MovementKind,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
    #[serde(rename = "fecha", default)]
    pub date: Option<String>,
}

/// Body for recording a new movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovementDraft {
    #[serde(rename = "producto_id")]
    pub product_id: ProductId,
    #[serde(rename = "tipo_movimiento")]
    pub kind: MovementKind,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
}

// ---------------------------------------------------------------------------
// LowStockProduct: Row of the low-stock report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockProduct {
    #[serde(rename = "producto_id")]
    pub product_id: ProductId,
    #[serde(rename = "nombre")]
    pub name: String,
    pub stock: u32,
    #[serde(rename = "codigo_barra", default)]
    pub barcode: Option<String>,
    #[serde(rename = "categoria_id", default)]
    pub category_id: Option<CategoryId>,
    #[serde(rename = "categoria_nombre", default)]
    pub category_name: Option<String>,
}

// ---------------------------------------------------------------------------
// StockLevel: Coarse classification used for badges and alerts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StockLevel {
    Out,
    Low,
    Medium,
    High,
}

impl StockLevel {
    /// Classify `current` against a reorder `minimum`.
    pub fn classify(current: u32, minimum: u32) -> Self {
        if current == 0 {
            StockLevel::Out
        } else if current <= minimum {
            StockLevel::Low
        } else if u64::from(current) <= u64::from(minimum) * 2 {
            StockLevel::Medium
        } else {
            StockLevel::High
        }
    }

    pub fn needs_attention(self) -> bool {
        matches!(self, StockLevel::Out | StockLevel::Low)
    }
}
