//! Backend location, route paths and client defaults.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api/v1";

/// Environment variable consulted when no base URL is set on the builder.
pub const API_URL_ENV: &str = "STORE_API_URL";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default `limite` for the low-stock report.
pub const DEFAULT_LOW_STOCK_LIMIT: u32 = 10;

pub const SESSION_FILE: &str = "session.json";

// -- Endpoint paths (relative to the base URL) ------------------------------

pub const LOGIN_PATH: &str = "/auth/login";
pub const PRODUCTS_PATH: &str = "/productos";
pub const CATEGORIES_PATH: &str = "/categorias";
pub const CUSTOMERS_PATH: &str = "/clientes";
pub const SALES_PATH: &str = "/ventas";
pub const INVENTORY_PATH: &str = "/inventario";
pub const INVENTORY_PRODUCT_PATH: &str = "/inventario/producto";
pub const LOW_STOCK_PATH: &str = "/inventario/stock-bajo";

/// Resolve the base URL: explicit value, then `STORE_API_URL`, then the default.
pub fn resolve_base_url(explicit: Option<String>) -> String {
    let url = explicit
        .or_else(|| std::env::var(API_URL_ENV).ok().filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    url.trim_end_matches('/').to_string()
}

pub fn default_session_dir() -> PathBuf {
    if let Some(config) = dirs::config_dir() {
        config.join("store-admin-sdk")
    } else {
        PathBuf::from(".store-admin-sdk")
    }
}
