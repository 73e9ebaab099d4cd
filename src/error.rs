use crate::validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// 409 from a route where it carries no stock meaning (e.g. a
    /// duplicate category name).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backend refused a sale because stock changed since the cart was
    /// built. The catalog must be refreshed before resubmitting.
    #[error("Stock conflict: {0}")]
    StockConflict(String),

    #[error("Login failed: {0}")]
    Auth(String),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Cannot submit an empty cart")]
    EmptyCart,

    #[error("A sale is already being submitted for this cart")]
    SubmitInProgress,

    #[error("Catalog is stale after a stock conflict; refresh before resubmitting")]
    StaleCatalog,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl StoreError {
    /// Whether this error is the recoverable stale-stock case.
    pub fn is_stock_conflict(&self) -> bool {
        matches!(self, StoreError::StockConflict(_))
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
