//! The checkout cart: assembling and submitting one sale.
//!
//! [`CartWorkflow`] holds a catalog snapshot and a [`Cart`] of product lines.
//! Quantities are bounded by each product's stock, line subtotals and the
//! total are kept in step with every change, and the whole cart is submitted
//! to a [`SalesEndpoint`] as a single [`TransactionRequest`].
//!
//! Mutations never fail with an error. Each one reports a [`CartChange`], and
//! anything that would break a line's bounds comes back as
//! [`CartChange::Rejected`] with the state left as it was.
//!
//! Stock is authoritative on the backend: after a recorded sale the catalog
//! is refetched rather than decremented locally.

use rust_decimal::Decimal;

use crate::error::{Result, StoreError};
use crate::models::{
    Customer, CustomerId, Product, ProductId, Sale, TransactionLine, TransactionRequest, UserId,
};

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// Source of current product records.
pub trait CatalogSource {
    fn fetch_products(&self) -> Result<Vec<Product>>;
}

/// Accepts a complete sale. Must record all lines or none.
pub trait SalesEndpoint {
    fn submit_transaction(&self, request: &TransactionRequest) -> Result<Sale>;
}

/// Source of selectable buyers.
pub trait CustomerSource {
    fn fetch_customers(&self) -> Result<Vec<Customer>>;
}

// ---------------------------------------------------------------------------
// CartLine
// ---------------------------------------------------------------------------

/// One product/quantity pairing.
///
/// Always satisfies `1 <= quantity <= product.stock` and
/// `subtotal == quantity * product.unit_price`.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    product: Product,
    quantity: u32,
    subtotal: Decimal,
}

impl CartLine {
    fn new(product: Product) -> Self {
        let subtotal = product.unit_price;
        Self {
            product,
            quantity: 1,
            subtotal,
        }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.product.unit_price
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    /// `quantity * unit_price`, or `None` if it does not fit a `Decimal`.
    fn subtotal_for(&self, quantity: u32) -> Option<Decimal> {
        self.product.unit_price.checked_mul(Decimal::from(quantity))
    }

    fn to_transaction_line(&self) -> TransactionLine {
        TransactionLine {
            product_id: self.product.id,
            quantity: self.quantity,
            unit_price: self.product.unit_price,
            subtotal: self.subtotal,
        }
    }
}

// ---------------------------------------------------------------------------
// CartChange / Rejection / StockAdjustment
// ---------------------------------------------------------------------------

/// Why a mutation was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("product {product_id} is out of stock")]
    OutOfStock { product_id: ProductId },

    #[error("requested {requested} of product {product_id} but only {available} in stock")]
    StockLimit {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    #[error("product {product_id} is not in the cart")]
    NotInCart { product_id: ProductId },

    #[error("product {product_id} is not in the catalog")]
    UnknownProduct { product_id: ProductId },

    #[error("amount for product {product_id} is too large to represent")]
    AmountOverflow { product_id: ProductId },

    #[error("cart is locked while a sale is being submitted")]
    Locked,
}

/// Outcome of a cart mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum CartChange {
    /// A new line was created.
    Added(CartLine),
    /// An existing line's quantity changed.
    Updated(CartLine),
    Removed(ProductId),
    /// Nothing to do (e.g. removing a line that is not there).
    Unchanged,
    Rejected(Rejection),
}

impl CartChange {
    pub fn is_rejected(&self) -> bool {
        matches!(self, CartChange::Rejected(_))
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            CartChange::Rejected(r) => Some(r),
            _ => None,
        }
    }

    /// The resulting line for `Added` and `Updated`.
    pub fn line(&self) -> Option<&CartLine> {
        match self {
            CartChange::Added(line) | CartChange::Updated(line) => Some(line),
            _ => None,
        }
    }
}

/// A change forced onto a line when refreshed stock no longer covers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockAdjustment {
    /// The product vanished from the catalog or sold out.
    Removed {
        product_id: ProductId,
        previous_quantity: u32,
    },
    /// Stock dropped below the line's quantity.
    Clamped {
        product_id: ProductId,
        from: u32,
        to: u32,
    },
    Repriced {
        product_id: ProductId,
        from: Decimal,
        to: Decimal,
    },
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

/// Ordered lines keyed by product id, plus an optional buyer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
    customer: Option<CustomerId>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product.id == product_id)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn customer(&self) -> Option<CustomerId> {
        self.customer
    }

    /// Total units across all lines.
    pub fn units(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of line subtotals; zero when empty.
    ///
    /// Mutations refuse any change that would overflow the total, so this
    /// only saturates if a catalog refresh repriced lines past `Decimal::MAX`.
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .fold(Decimal::ZERO, |acc, l| acc.saturating_add(l.subtotal))
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines.iter().position(|l| l.product.id == product_id)
    }

    /// Whether the total stays representable with line `replacing` (or a new
    /// line, for `None`) at `subtotal`.
    fn total_fits(&self, replacing: Option<usize>, subtotal: Decimal) -> bool {
        self.lines
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != replacing)
            .try_fold(subtotal, |acc, (_, l)| acc.checked_add(l.subtotal))
            .is_some()
    }

    /// Set line `idx` to `quantity`, refusing amounts that overflow.
    fn resize(&mut self, idx: usize, quantity: u32) -> CartChange {
        let product_id = self.lines[idx].product.id;
        let subtotal = match self.lines[idx].subtotal_for(quantity) {
            Some(subtotal) if self.total_fits(Some(idx), subtotal) => subtotal,
            _ => return CartChange::Rejected(Rejection::AmountOverflow { product_id }),
        };
        let line = &mut self.lines[idx];
        line.quantity = quantity;
        line.subtotal = subtotal;
        CartChange::Updated(line.clone())
    }

    /// Add one unit of `product`, creating the line if needed.
    ///
    /// An existing line is bounded by the stock of the product snapshot it
    /// was created with (refreshed by [`CartWorkflow::refresh_catalog`]),
    /// not by `product.stock`.
    pub fn add_line(&mut self, product: &Product) -> CartChange {
        if product.stock == 0 {
            return CartChange::Rejected(Rejection::OutOfStock {
                product_id: product.id,
            });
        }

        match self.position(product.id) {
            Some(idx) => {
                let line = &self.lines[idx];
                let requested = u64::from(line.quantity) + 1;
                if requested > u64::from(line.product.stock) {
                    return CartChange::Rejected(Rejection::StockLimit {
                        product_id: product.id,
                        requested,
                        available: line.product.stock,
                    });
                }
                let next = line.quantity + 1;
                self.resize(idx, next)
            }
            None => {
                if !self.total_fits(None, product.unit_price) {
                    return CartChange::Rejected(Rejection::AmountOverflow {
                        product_id: product.id,
                    });
                }
                let line = CartLine::new(product.clone());
                self.lines.push(line.clone());
                CartChange::Added(line)
            }
        }
    }

    /// Set a line's quantity. Zero or negative removes the line; more than
    /// the product's stock is rejected and the line keeps its quantity.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> CartChange {
        let Some(idx) = self.position(product_id) else {
            return CartChange::Rejected(Rejection::NotInCart { product_id });
        };

        if quantity <= 0 {
            self.lines.remove(idx);
            return CartChange::Removed(product_id);
        }

        let available = self.lines[idx].product.stock;
        if quantity > i64::from(available) {
            return CartChange::Rejected(Rejection::StockLimit {
                product_id,
                requested: quantity as u64,
                available,
            });
        }

        // 0 < quantity <= available, so it fits in u32.
        self.resize(idx, quantity as u32)
    }

    pub fn remove_line(&mut self, product_id: ProductId) -> CartChange {
        match self.position(product_id) {
            Some(idx) => {
                self.lines.remove(idx);
                CartChange::Removed(product_id)
            }
            None => CartChange::Unchanged,
        }
    }

    pub fn set_customer(&mut self, customer: Option<CustomerId>) {
        self.customer = customer;
    }

    /// Remove every line and the selected customer.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.customer = None;
    }

    /// Snapshot the cart as a submission body.
    pub fn to_request(&self, seller_id: UserId) -> TransactionRequest {
        TransactionRequest {
            customer_id: self.customer,
            seller_id,
            total: self.total(),
            lines: self.lines.iter().map(CartLine::to_transaction_line).collect(),
        }
    }

    /// Bring every line in line with a fresh catalog.
    ///
    /// Lines whose product vanished, sold out, or whose repriced subtotal no
    /// longer fits a `Decimal` are dropped.
    fn reconcile(&mut self, catalog: &[Product]) -> Vec<StockAdjustment> {
        let mut adjustments = Vec::new();

        self.lines.retain_mut(|line| {
            let product_id = line.product.id;
            let kept = catalog
                .iter()
                .find(|p| p.id == product_id && p.stock > 0)
                .and_then(|p| {
                    let quantity = line.quantity.min(p.stock);
                    p.unit_price
                        .checked_mul(Decimal::from(quantity))
                        .map(|subtotal| (p, quantity, subtotal))
                });
            let Some((fresh, quantity, subtotal)) = kept else {
                adjustments.push(StockAdjustment::Removed {
                    product_id,
                    previous_quantity: line.quantity,
                });
                return false;
            };

            if fresh.unit_price != line.product.unit_price {
                adjustments.push(StockAdjustment::Repriced {
                    product_id,
                    from: line.product.unit_price,
                    to: fresh.unit_price,
                });
            }
            if quantity < line.quantity {
                adjustments.push(StockAdjustment::Clamped {
                    product_id,
                    from: line.quantity,
                    to: quantity,
                });
            }

            line.product = fresh.clone();
            line.quantity = quantity;
            line.subtotal = subtotal;
            true
        });

        adjustments
    }
}

// ---------------------------------------------------------------------------
// CartWorkflow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
}

/// Result of a recorded sale.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleReceipt {
    /// The sale as persisted by the backend.
    pub sale: Sale,
    /// The exact body that was submitted.
    pub request: TransactionRequest,
    /// False if the post-sale catalog refetch failed; the catalog is then
    /// flagged stale and must be refreshed before the next submission.
    pub catalog_refreshed: bool,
}

/// A sale in progress: catalog snapshot, cart, and submission state.
#[derive(Debug, Clone, Default)]
pub struct CartWorkflow {
    catalog: Vec<Product>,
    cart: Cart,
    state: SubmitState,
    catalog_stale: bool,
}

impl CartWorkflow {
    /// An empty workflow with no catalog loaded.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: Vec<Product>) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// Open a workflow with a freshly fetched catalog.
    pub fn open<C: CatalogSource + ?Sized>(source: &C) -> Result<Self> {
        Ok(Self::with_catalog(source.fetch_products()?))
    }

    // -- Accessors ----------------------------------------------------------

    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    pub fn product(&self, product_id: ProductId) -> Option<&Product> {
        self.catalog.iter().find(|p| p.id == product_id)
    }

    /// Catalog products whose name or barcode contains `term`.
    pub fn search(&self, term: &str) -> Vec<&Product> {
        self.catalog.iter().filter(|p| p.matches(term)).collect()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    pub fn customer(&self) -> Option<CustomerId> {
        self.cart.customer()
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmitState::Submitting
    }

    pub fn is_catalog_stale(&self) -> bool {
        self.catalog_stale
    }

    pub fn total(&self) -> Decimal {
        self.cart.total()
    }

    // -- Mutations ----------------------------------------------------------

    pub fn add_line(&mut self, product: &Product) -> CartChange {
        if self.is_submitting() {
            return CartChange::Rejected(Rejection::Locked);
        }
        self.cart.add_line(product)
    }

    /// Add one unit of a catalog product by id.
    pub fn add_product(&mut self, product_id: ProductId) -> CartChange {
        if self.is_submitting() {
            return CartChange::Rejected(Rejection::Locked);
        }
        match self.catalog.iter().find(|p| p.id == product_id) {
            Some(product) => self.cart.add_line(product),
            None => CartChange::Rejected(Rejection::UnknownProduct { product_id }),
        }
    }

    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> CartChange {
        if self.is_submitting() {
            return CartChange::Rejected(Rejection::Locked);
        }
        self.cart.update_quantity(product_id, quantity)
    }

    pub fn remove_line(&mut self, product_id: ProductId) -> CartChange {
        if self.is_submitting() {
            return CartChange::Rejected(Rejection::Locked);
        }
        self.cart.remove_line(product_id)
    }

    /// Attach (or with `None`, detach) the buyer.
    pub fn select_customer(
        &mut self,
        customer: Option<CustomerId>,
    ) -> std::result::Result<(), Rejection> {
        if self.is_submitting() {
            return Err(Rejection::Locked);
        }
        self.cart.set_customer(customer);
        Ok(())
    }

    /// Abandon the sale in progress.
    pub fn cancel(&mut self) -> std::result::Result<(), Rejection> {
        if self.is_submitting() {
            return Err(Rejection::Locked);
        }
        self.cart.clear();
        Ok(())
    }

    /// Refetch the catalog and reconcile the cart with the new stock.
    pub fn refresh_catalog<C: CatalogSource + ?Sized>(
        &mut self,
        source: &C,
    ) -> Result<Vec<StockAdjustment>> {
        if self.is_submitting() {
            return Err(StoreError::SubmitInProgress);
        }
        let catalog = source.fetch_products()?;
        let adjustments = self.cart.reconcile(&catalog);
        for adj in &adjustments {
            tracing::info!(adjustment = ?adj, "cart line adjusted to refreshed stock");
        }
        tracing::debug!(products = catalog.len(), "catalog refreshed");
        self.catalog = catalog;
        self.catalog_stale = false;
        Ok(adjustments)
    }

    // -- Submission ---------------------------------------------------------

    /// Validate, snapshot the cart and lock it.
    ///
    /// Fails with [`StoreError::SubmitInProgress`] if a submission is already
    /// running, [`StoreError::EmptyCart`] for an empty cart, and
    /// [`StoreError::StaleCatalog`] while a refresh is owed. On success the
    /// workflow is `Submitting` until [`finish_submit`](Self::finish_submit).
    pub fn begin_submit(&mut self, seller_id: UserId) -> Result<TransactionRequest> {
        if self.is_submitting() {
            return Err(StoreError::SubmitInProgress);
        }
        if self.cart.is_empty() {
            return Err(StoreError::EmptyCart);
        }
        if self.catalog_stale {
            return Err(StoreError::StaleCatalog);
        }
        let request = self.cart.to_request(seller_id);
        self.state = SubmitState::Submitting;
        tracing::debug!(
            lines = request.lines.len(),
            total = %request.total,
            "cart locked for submission"
        );
        Ok(request)
    }

    /// Apply the endpoint's answer to a submission started by
    /// [`begin_submit`](Self::begin_submit).
    ///
    /// On success the cart and customer are cleared and the catalog is
    /// refetched once. On failure the cart is left exactly as it was; a stock
    /// conflict additionally flags the catalog stale.
    pub fn finish_submit<C: CatalogSource + ?Sized>(
        &mut self,
        request: TransactionRequest,
        outcome: Result<Sale>,
        catalog: &C,
    ) -> Result<SaleReceipt> {
        if !self.is_submitting() {
            return Err(StoreError::InvalidArgument(
                "no submission in progress".into(),
            ));
        }
        self.state = SubmitState::Idle;

        match outcome {
            Ok(sale) => {
                self.cart.clear();
                let catalog_refreshed = match self.refresh_catalog(catalog) {
                    Ok(_) => true,
                    Err(e) => {
                        tracing::warn!(error = %e, "sale recorded but catalog refresh failed");
                        self.catalog_stale = true;
                        false
                    }
                };
                Ok(SaleReceipt {
                    sale,
                    request,
                    catalog_refreshed,
                })
            }
            Err(e) => {
                if e.is_stock_conflict() {
                    tracing::warn!(error = %e, "stock changed since the cart was built");
                    self.catalog_stale = true;
                } else {
                    tracing::warn!(error = %e, "sale submission failed");
                }
                Err(e)
            }
        }
    }

    /// Unlock the cart after a submission that never reached the endpoint.
    ///
    /// Lines and customer are left untouched.
    pub fn abort_submit(&mut self) {
        if self.is_submitting() {
            tracing::debug!("submission aborted before reaching the backend");
            self.state = SubmitState::Idle;
        }
    }

    /// Submit the cart as one sale and refresh the catalog afterwards.
    pub fn submit<E, C>(
        &mut self,
        endpoint: &E,
        catalog: &C,
        seller_id: UserId,
    ) -> Result<SaleReceipt>
    where
        E: SalesEndpoint + ?Sized,
        C: CatalogSource + ?Sized,
    {
        let request = self.begin_submit(seller_id)?;
        let outcome = endpoint.submit_transaction(&request);
        self.finish_submit(request, outcome, catalog)
    }
}
