//! Endpoint wrappers for the store backend.
//!
//! Each module provides a struct that borrows the SDK's [`ApiClient`](crate::client::ApiClient)
//! and exposes typed methods for one REST resource, returning `Result<T>`.

pub mod auth;
pub mod categories;
pub mod customers;
pub mod inventory;
pub mod products;
pub mod sales;

pub use auth::AuthApi;
pub use categories::CategoryApi;
pub use customers::CustomerApi;
pub use inventory::InventoryApi;
pub use products::ProductApi;
pub use sales::SaleApi;
