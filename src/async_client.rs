//! Async wrappers around [`StoreSdk`] and [`CartWorkflow`] for use in async
//! runtimes (Tokio, etc.).
//!
//! Runs all SDK operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//!
//! # Example
//!
//! ```no_run
//! use store_admin_sdk::AsyncStoreSdk;
//! use store_admin_sdk::models::{ProductId, UserId};
//!
//! #[tokio::main]
//! async fn main() {
//!     let sdk = AsyncStoreSdk::builder().build().await.unwrap();
//!
//!     // Run any sync SDK method via closure
//!     let products = sdk.run(|s| s.products().list()).await.unwrap();
//!
//!     // Assemble and submit a sale
//!     let checkout = sdk.checkout().await.unwrap();
//!     checkout.with_cart(|c| c.add_product(ProductId(1))).unwrap();
//!     let receipt = checkout.submit(UserId(7)).await.unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::cart::{CartWorkflow, SaleReceipt, StockAdjustment};
use crate::error::{Result, StoreError};
use crate::models::UserId;
use crate::{StoreSdk, StoreSdkBuilder};

fn join_error(e: tokio::task::JoinError) -> StoreError {
    StoreError::InvalidArgument(format!("Task join error: {e}"))
}

/// Lock `m`, recovering the guard if another task panicked while holding it.
/// A started submission must always reach `finish_submit`.
fn lock<'a, T>(m: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    m.lock().unwrap_or_else(|poisoned| {
        tracing::warn!(lock = what, "recovering poisoned lock");
        poisoned.into_inner()
    })
}

// ---------------------------------------------------------------------------
// AsyncStoreSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncStoreSdk`] instance.
#[derive(Debug, Clone, Default)]
pub struct AsyncStoreSdkBuilder {
    inner: StoreSdkBuilder,
}

impl AsyncStoreSdkBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.inner = self.inner.base_url(url);
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.inner = self.inner.token(token);
        self
    }

    pub fn session_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path: PathBuf = path.as_ref().to_path_buf();
        self.inner = self.inner.session_dir(path);
        self
    }

    pub fn persist_session(mut self, persist: bool) -> Self {
        self.inner = self.inner.persist_session(persist);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }

    /// Build the async SDK.
    ///
    /// Initialization runs on the blocking thread pool, since the blocking
    /// HTTP client must not be created on an async worker.
    pub async fn build(self) -> Result<AsyncStoreSdk> {
        let builder = self.inner;
        tokio::task::spawn_blocking(move || {
            let sdk = builder.build()?;
            Ok(AsyncStoreSdk {
                inner: Arc::new(Mutex::new(sdk)),
            })
        })
        .await
        .map_err(join_error)?
    }
}

// ---------------------------------------------------------------------------
// AsyncStoreSdk
// ---------------------------------------------------------------------------

/// Async wrapper around [`StoreSdk`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`]. The underlying [`StoreSdk`] is
/// protected by a [`Mutex`] since it uses `RefCell` internally.
#[derive(Clone)]
pub struct AsyncStoreSdk {
    inner: Arc<Mutex<StoreSdk>>,
}

impl AsyncStoreSdk {
    pub fn builder() -> AsyncStoreSdkBuilder {
        AsyncStoreSdkBuilder::default()
    }

    /// Run a sync SDK operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&StoreSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = lock(&sdk, "SDK");
            f(&guard)
        })
        .await
        .map_err(join_error)?
    }

    /// Open a cart with the current catalog.
    pub async fn checkout(&self) -> Result<AsyncCheckout> {
        let workflow = self.run(|s| s.checkout()).await?;
        Ok(AsyncCheckout {
            sdk: self.inner.clone(),
            cart: Arc::new(Mutex::new(workflow)),
        })
    }

    /// Close the SDK, releasing the HTTP client off the async workers.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            drop(self.inner);
            Ok(())
        })
        .await
        .map_err(join_error)?
    }
}

// ---------------------------------------------------------------------------
// AsyncCheckout
// ---------------------------------------------------------------------------

/// A cart shared between async tasks.
///
/// Cart mutations take the lock briefly and never do I/O. [`submit`](Self::submit)
/// holds the cart lock only to start and to finish the submission, so other
/// tasks can observe the cart while the request is in flight; during that
/// window mutations are rejected with [`Rejection::Locked`](crate::Rejection::Locked)
/// and a second submit fails with [`StoreError::SubmitInProgress`].
///
/// The submission runs to completion on the blocking pool even if the
/// awaiting future is dropped, so a sale that the backend records is always
/// reflected in the cart (cleared) and catalog (refetched).
#[derive(Clone)]
pub struct AsyncCheckout {
    sdk: Arc<Mutex<StoreSdk>>,
    cart: Arc<Mutex<CartWorkflow>>,
}

impl AsyncCheckout {
    /// Inspect or mutate the cart under its lock.
    pub fn with_cart<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut CartWorkflow) -> T,
    {
        let mut cart = lock(&self.cart, "cart");
        Ok(f(&mut cart))
    }

    /// A copy of the current cart state.
    pub fn snapshot(&self) -> Result<CartWorkflow> {
        self.with_cart(|c| c.clone())
    }

    /// Submit the cart as one sale.
    pub async fn submit(&self, seller_id: UserId) -> Result<SaleReceipt> {
        let sdk = self.sdk.clone();
        let cart = self.cart.clone();
        tokio::task::spawn_blocking(move || {
            let request = lock(&cart, "cart").begin_submit(seller_id)?;

            let sdk = lock(&sdk, "SDK");
            let outcome = sdk.sales().submit_transaction(&request);

            let mut cart = lock(&cart, "cart");
            cart.finish_submit(request, outcome, &*sdk)
        })
        .await
        .map_err(join_error)?
    }

    /// Refetch the catalog and reconcile the cart.
    pub async fn refresh_catalog(&self) -> Result<Vec<StockAdjustment>> {
        let sdk = self.sdk.clone();
        let cart = self.cart.clone();
        tokio::task::spawn_blocking(move || {
            let sdk = lock(&sdk, "SDK");
            let mut cart = lock(&cart, "cart");
            cart.refresh_catalog(&*sdk)
        })
        .await
        .map_err(join_error)?
    }
}
