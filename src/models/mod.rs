pub mod category;
pub mod customer;
pub mod ids;
pub mod inventory;
pub mod product;
pub mod sale;
pub mod user;

pub use category::*;
pub use customer::*;
pub use ids::*;
pub use inventory::*;
pub use product::*;
pub use sale::*;
pub use user::*;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

/// The backend's `{ success, data, message }` wrapper used by auth and sales.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub error: Option<String>,
}

fn default_success() -> bool {
    true
}

/// A payload that may or may not be wrapped in a `{ data: ... }` envelope.
///
/// The sales routes wrap their payloads while the catalog routes return them
/// bare, so decoding accepts both shapes.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Enveloped<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Enveloped<T> {
    pub fn into_inner(self) -> T {
        match self {
            Enveloped::Wrapped { data } => data,
            Enveloped::Bare(value) => value,
        }
    }
}

/// Body returned by the delete routes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteAck {
    #[serde(rename = "msj", default)]
    pub message: String,
}
