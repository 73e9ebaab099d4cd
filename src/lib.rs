//! Store admin SDK for Rust.
//!
//! Provides a typed client for the store's REST backend (products,
//! categories, customers, inventory, sales, login) and the checkout cart used
//! to assemble and submit a sale.
//!
//! # Quick start
//!
//! ```no_run
//! use store_admin_sdk::StoreSdk;
//!
//! let sdk = StoreSdk::builder().build().unwrap();
//! let user = sdk.auth().login("seller@store.com", "secret").unwrap();
//!
//! // Assemble a sale
//! let mut cart = sdk.checkout().unwrap();
//! let first = cart.catalog()[0].id;
//! cart.add_product(first);
//!
//! // Submit it; the catalog is refetched afterwards
//! let receipt = cart.submit(&sdk, &sdk, user.id).unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cart;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod session;
pub mod validation;

#[cfg(feature = "async")]
pub use async_client::{AsyncCheckout, AsyncStoreSdk};
pub use cart::{
    Cart, CartChange, CartLine, CartWorkflow, CatalogSource, CustomerSource, Rejection,
    SaleReceipt, SalesEndpoint, StockAdjustment, SubmitState,
};
pub use client::{ApiClient, Credentials};
pub use error::{Result, StoreError};
pub use session::SessionStore;

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use models::{AuthUser, Customer, Product, Sale, TransactionRequest, UserId};

// ---------------------------------------------------------------------------
// StoreSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`StoreSdk`] instance.
///
/// Use [`StoreSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](StoreSdkBuilder::build) to create the SDK.
#[derive(Debug, Clone)]
pub struct StoreSdkBuilder {
    base_url: Option<String>,
    token: Option<String>,
    session_dir: Option<PathBuf>,
    persist_session: bool,
    timeout: Duration,
}

impl Default for StoreSdkBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            session_dir: None,
            persist_session: true,
            timeout: config::DEFAULT_TIMEOUT,
        }
    }
}

impl StoreSdkBuilder {
    /// Set the backend base URL (e.g. `http://localhost:3000/api/v1`).
    ///
    /// If not set, `STORE_API_URL` is consulted, then the built-in default.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Use an explicit bearer token instead of the persisted session's.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set a custom session directory.
    ///
    /// If not set, the platform config directory is used (e.g.
    /// `~/.config/store-admin-sdk` on Linux).
    pub fn session_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.session_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable reading and writing the session file.
    ///
    /// Defaults to `true`.
    pub fn persist_session(mut self, persist: bool) -> Self {
        self.persist_session = persist;
        self
    }

    /// Set the HTTP request timeout.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the SDK.
    ///
    /// Loads the persisted session once; its token becomes the client's
    /// credential unless [`token()`](Self::token) was given. No request is
    /// made.
    pub fn build(self) -> Result<StoreSdk> {
        let session = SessionStore::new(self.session_dir, self.persist_session)?;
        let user = session.load();
        let credentials = self
            .token
            .or_else(|| user.as_ref().map(|u| u.token.clone()))
            .map(Credentials::bearer);
        let base_url = config::resolve_base_url(self.base_url);
        tracing::debug!(%base_url, authenticated = credentials.is_some(), "building store SDK");
        let client = ApiClient::new(base_url, self.timeout, credentials)?;
        Ok(StoreSdk {
            client,
            session,
            user: RefCell::new(user),
        })
    }
}

// ---------------------------------------------------------------------------
// StoreSdk
// ---------------------------------------------------------------------------

/// The main entry point for the store SDK.
///
/// Owns the [`ApiClient`] and [`SessionStore`] and exposes per-resource
/// endpoint wrappers that borrow from it.
///
/// Created via [`StoreSdk::builder()`].
pub struct StoreSdk {
    client: ApiClient,
    session: SessionStore,
    user: RefCell<Option<AuthUser>>,
}

impl StoreSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> StoreSdkBuilder {
        StoreSdkBuilder::default()
    }

    // -- Endpoint accessors ------------------------------------------------

    pub fn auth(&self) -> endpoints::AuthApi<'_> {
        endpoints::AuthApi::new(&self.client, &self.session, &self.user)
    }

    pub fn products(&self) -> endpoints::ProductApi<'_> {
        endpoints::ProductApi::new(&self.client)
    }

    pub fn categories(&self) -> endpoints::CategoryApi<'_> {
        endpoints::CategoryApi::new(&self.client)
    }

    pub fn customers(&self) -> endpoints::CustomerApi<'_> {
        endpoints::CustomerApi::new(&self.client)
    }

    pub fn sales(&self) -> endpoints::SaleApi<'_> {
        endpoints::SaleApi::new(&self.client)
    }

    pub fn inventory(&self) -> endpoints::InventoryApi<'_> {
        endpoints::InventoryApi::new(&self.client)
    }

    // -- Checkout ----------------------------------------------------------

    /// Open a cart with the current catalog.
    pub fn checkout(&self) -> Result<CartWorkflow> {
        CartWorkflow::open(self)
    }

    /// Id of the logged-in user, recorded as the seller on submitted sales.
    pub fn seller_id(&self) -> Option<UserId> {
        self.user.borrow().as_ref().map(|u| u.id)
    }

    /// Submit `cart` with the logged-in user as seller.
    ///
    /// Fails with [`StoreError::Unauthorized`] when nobody is logged in.
    pub fn submit_cart(&self, cart: &mut CartWorkflow) -> Result<SaleReceipt> {
        let seller_id = self
            .seller_id()
            .ok_or_else(|| StoreError::Unauthorized("no logged-in seller".into()))?;
        cart.submit(self, self, seller_id)
    }

    /// Return a reference to the underlying [`ApiClient`].
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }
}

impl CatalogSource for StoreSdk {
    fn fetch_products(&self) -> Result<Vec<Product>> {
        self.products().list()
    }
}

impl SalesEndpoint for StoreSdk {
    fn submit_transaction(&self, request: &TransactionRequest) -> Result<Sale> {
        self.sales().submit_transaction(request)
    }
}

impl CustomerSource for StoreSdk {
    fn fetch_customers(&self) -> Result<Vec<Customer>> {
        self.customers().list()
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for StoreSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let user = self.user.borrow();
        write!(
            f,
            "StoreSdk(base_url={}, user={}, authenticated={})",
            self.client.base_url(),
            user.as_ref().map(|u| u.email.as_str()).unwrap_or("-"),
            self.client.has_credentials()
        )
    }
}
