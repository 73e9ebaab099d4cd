use serde::{Deserialize, Serialize};

use super::CustomerId;

// ---------------------------------------------------------------------------
// Customer: Optional buyer attached to a sale
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "cliente_id")]
    pub id: CustomerId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellido", default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    #[serde(rename = "direccion", default)]
    pub address: Option<String>,
    #[serde(rename = "fecha_creacion", default)]
    pub created_at: Option<String>,
}

impl Customer {
    /// First and last name joined for display.
    pub fn full_name(&self) -> String {
        match self.last_name.as_deref().map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {}", self.name, last),
            _ => self.name.clone(),
        }
    }
}
