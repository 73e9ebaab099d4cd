//! Shared test fixtures for the store SDK integration tests.
//!
//! Provides in-process fakes for the cart's collaborators (`FakeCatalog`,
//! `FakeSales`) and `start_backend()`, which serves a small fake REST backend
//! with axum on a background thread.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use store_admin_sdk::models::{Product, Sale, SaleId, TransactionRequest};
use store_admin_sdk::{CatalogSource, Result, SalesEndpoint, StoreError, StoreSdk};

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

pub fn product(id: i64, price: Decimal, stock: u32) -> Product {
    Product::new(id, format!("Product {id}"), price, stock)
}

// ---------------------------------------------------------------------------
// FakeCatalog
// ---------------------------------------------------------------------------

/// Catalog source that serves a mutable product list and counts fetches.
pub struct FakeCatalog {
    pub products: RefCell<Vec<Product>>,
    pub fetches: Cell<usize>,
    pub fail: Cell<bool>,
}

impl FakeCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: RefCell::new(products),
            fetches: Cell::new(0),
            fail: Cell::new(false),
        }
    }

    pub fn set_stock(&self, id: i64, stock: u32) {
        for p in self.products.borrow_mut().iter_mut() {
            if p.id.0 == id {
                p.stock = stock;
            }
        }
    }
}

impl CatalogSource for FakeCatalog {
    fn fetch_products(&self) -> Result<Vec<Product>> {
        self.fetches.set(self.fetches.get() + 1);
        if self.fail.get() {
            return Err(StoreError::Api {
                status: 503,
                message: "catalog unavailable".into(),
            });
        }
        Ok(self.products.borrow().clone())
    }
}

// ---------------------------------------------------------------------------
// FakeSales
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalesMode {
    Accept,
    Conflict,
    ServerError,
}

/// Sales endpoint that records every request and answers per `mode`.
pub struct FakeSales {
    pub mode: Cell<SalesMode>,
    pub requests: RefCell<Vec<TransactionRequest>>,
}

impl FakeSales {
    pub fn new(mode: SalesMode) -> Self {
        Self {
            mode: Cell::new(mode),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl SalesEndpoint for FakeSales {
    fn submit_transaction(&self, request: &TransactionRequest) -> Result<Sale> {
        self.requests.borrow_mut().push(request.clone());
        match self.mode.get() {
            SalesMode::Accept => Ok(Sale {
                id: SaleId(self.calls() as i64),
                seller_id: Some(request.seller_id),
                customer_id: request.customer_id,
                date: None,
                total: request.total,
                customer: None,
                details: Vec::new(),
            }),
            SalesMode::Conflict => Err(StoreError::StockConflict("Stock insuficiente".into())),
            SalesMode::ServerError => Err(StoreError::Api {
                status: 500,
                message: "HTTP error! status: 500".into(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Fake REST backend
// ---------------------------------------------------------------------------

pub const VALID_PASSWORD: &str = "secret";
pub const TOKEN: &str = "tok-123";

/// Mutable state behind the fake backend.
pub struct BackendState {
    pub products: Vec<Value>,
    pub categories: Vec<Value>,
    pub customers: Vec<Value>,
    pub sales: Vec<Value>,
    pub movements: Vec<Value>,
    /// `Authorization` header of every request, in arrival order.
    pub auth_headers: Vec<Option<String>>,
    /// Number of `POST /ventas` requests received.
    pub sale_posts: usize,
    /// Delay applied to `POST /ventas`.
    pub sale_delay: Duration,
}

impl BackendState {
    fn seeded() -> Self {
        Self {
            products: vec![
                json!({"producto_id": 1, "nombre": "Arroz 1kg", "precio": 1000, "stock": 5,
                       "codigo_barra": "7701234", "categoria_id": 1}),
                json!({"producto_id": 2, "nombre": "Aceite", "precio": "2500.50", "stock": 3,
                       "categoria_id": 1}),
                json!({"producto_id": 3, "nombre": "Sal", "precio": 800, "stock": 0,
                       "categoria_id": 2}),
            ],
            categories: vec![
                json!({"categoria_id": 1, "nombre": "Granos", "activo": true}),
                json!({"categoria_id": 2, "nombre": "Condimentos", "descripcion": "Sal y especias", "activo": true}),
            ],
            customers: vec![
                json!({"cliente_id": 1, "nombre": "Cliente General", "email": "general@tienda.com"}),
                json!({"cliente_id": 2, "nombre": "Juan", "apellido": "Pérez"}),
            ],
            sales: Vec::new(),
            movements: Vec::new(),
            auth_headers: Vec::new(),
            sale_posts: 0,
            sale_delay: Duration::ZERO,
        }
    }

    pub fn stock_of(&self, id: i64) -> Option<i64> {
        self.products
            .iter()
            .find(|p| p["producto_id"] == id)
            .and_then(|p| p["stock"].as_i64())
    }
}

pub type Shared = Arc<Mutex<BackendState>>;

pub struct FakeBackend {
    pub base_url: String,
    pub state: Shared,
}

impl FakeBackend {
    /// An SDK pointed at this backend with no session persistence.
    pub fn sdk(&self) -> StoreSdk {
        StoreSdk::builder()
            .base_url(&self.base_url)
            .persist_session(false)
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    pub fn last_auth_header(&self) -> Option<String> {
        self.state.lock().unwrap().auth_headers.last().cloned().flatten()
    }
}

/// Start the fake backend on an ephemeral port.
pub fn start_backend() -> FakeBackend {
    let state: Shared = Arc::new(Mutex::new(BackendState::seeded()));

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    listener.set_nonblocking(true).unwrap();

    let app = router(state.clone());
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    FakeBackend {
        base_url: format!("http://{addr}/api/v1"),
        state,
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/productos", get(list_products).post(create_product))
        .route(
            "/api/v1/productos/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route("/api/v1/categorias", get(list_categories).post(create_category))
        .route(
            "/api/v1/categorias/{id}",
            get(get_category).patch(update_category).delete(delete_category),
        )
        .route("/api/v1/clientes", get(list_customers))
        .route("/api/v1/ventas", get(list_sales).post(create_sale))
        .route(
            "/api/v1/ventas/{id}",
            get(get_sale).patch(update_sale).delete(delete_sale),
        )
        .route("/api/v1/inventario", get(list_movements).post(create_movement))
        .route("/api/v1/inventario/stock-bajo", get(low_stock))
        .route(
            "/api/v1/inventario/producto/{id}",
            get(product_movements).patch(set_stock),
        )
        .with_state(state)
}

type Reply = (StatusCode, Json<Value>);

fn record(state: &Shared, headers: &HeaderMap) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.lock().unwrap().auth_headers.push(auth);
}

fn merge(target: &mut Value, patch: &Value) {
    if let (Some(target), Some(patch)) = (target.as_object_mut(), patch.as_object()) {
        for (k, v) in patch {
            target.insert(k.clone(), v.clone());
        }
    }
}

async fn login(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    record(&state, &headers);
    match body["password"].as_str() {
        Some(VALID_PASSWORD) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {"id": 7, "nombre": "Ana", "email": body["email"], "rol": "vendedor", "token": TOKEN}
            })),
        ),
        Some("inactive") => (
            StatusCode::OK,
            Json(json!({"success": false, "data": null, "message": "Usuario inactivo"})),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Credenciales inválidas"})),
        ),
    }
}

async fn list_products(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    record(&state, &headers);
    let products = state.lock().unwrap().products.clone();
    (StatusCode::OK, Json(Value::Array(products)))
}

async fn get_product(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Reply {
    record(&state, &headers);
    let st = state.lock().unwrap();
    match st.products.iter().find(|p| p["producto_id"] == id) {
        Some(p) => (StatusCode::OK, Json(p.clone())),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Producto no encontrado"})),
        ),
    }
}

async fn create_product(State(state): State<Shared>, headers: HeaderMap, Json(mut body): Json<Value>) -> Reply {
    record(&state, &headers);
    let mut st = state.lock().unwrap();
    body["producto_id"] = json!(100 + st.products.len() as i64);
    st.products.push(body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn update_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    record(&state, &headers);
    let mut st = state.lock().unwrap();
    match st.products.iter_mut().find(|p| p["producto_id"] == id) {
        Some(p) => {
            merge(p, &body);
            (StatusCode::OK, Json(p.clone()))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Producto no encontrado"})),
        ),
    }
}

async fn delete_product(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Reply {
    record(&state, &headers);
    state
        .lock()
        .unwrap()
        .products
        .retain(|p| p["producto_id"] != id);
    (StatusCode::OK, Json(json!({"msj": "Producto eliminado"})))
}

async fn list_categories(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    record(&state, &headers);
    let categories = state.lock().unwrap().categories.clone();
    (StatusCode::OK, Json(Value::Array(categories)))
}

async fn create_category(State(state): State<Shared>, headers: HeaderMap, Json(mut body): Json<Value>) -> Reply {
    record(&state, &headers);
    let mut st = state.lock().unwrap();
    if st.categories.iter().any(|c| c["nombre"] == body["nombre"]) {
        return (
            StatusCode::CONFLICT,
            Json(json!({"message": "La categoria ya existe"})),
        );
    }
    body["categoria_id"] = json!(10 + st.categories.len() as i64);
    body["activo"] = json!(true);
    st.categories.push(body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn get_category(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Reply {
    record(&state, &headers);
    let st = state.lock().unwrap();
    match st.categories.iter().find(|c| c["categoria_id"] == id) {
        Some(c) => (StatusCode::OK, Json(c.clone())),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Categoría no encontrada"})),
        ),
    }
}

async fn update_category(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    record(&state, &headers);
    let mut st = state.lock().unwrap();
    match st.categories.iter_mut().find(|c| c["categoria_id"] == id) {
        Some(c) => {
            merge(c, &body);
            (StatusCode::OK, Json(c.clone()))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Categoría no encontrada"})),
        ),
    }
}

async fn delete_category(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Reply {
    record(&state, &headers);
    state
        .lock()
        .unwrap()
        .categories
        .retain(|c| c["categoria_id"] != id);
    (StatusCode::OK, Json(json!({"msj": "Categoría eliminada"})))
}

async fn list_customers(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    record(&state, &headers);
    let customers = state.lock().unwrap().customers.clone();
    (StatusCode::OK, Json(Value::Array(customers)))
}

async fn list_sales(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    record(&state, &headers);
    let sales = state.lock().unwrap().sales.clone();
    (StatusCode::OK, Json(json!({"success": true, "data": sales})))
}

async fn get_sale(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Reply {
    record(&state, &headers);
    let st = state.lock().unwrap();
    match st.sales.iter().find(|s| s["venta_id"] == id) {
        Some(s) => (StatusCode::OK, Json(json!({"success": true, "data": s}))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "Venta no encontrada"})),
        ),
    }
}

async fn update_sale(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    record(&state, &headers);
    let mut st = state.lock().unwrap();
    match st.sales.iter_mut().find(|s| s["venta_id"] == id) {
        Some(s) => {
            merge(s, &body);
            (StatusCode::OK, Json(json!({"success": true, "data": s})))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "Venta no encontrada"})),
        ),
    }
}

/// Sale deletion answers with an empty body.
async fn delete_sale(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> StatusCode {
    record(&state, &headers);
    state.lock().unwrap().sales.retain(|s| s["venta_id"] != id);
    StatusCode::NO_CONTENT
}

/// Records the sale atomically: every line must be covered by stock, or
/// nothing changes and 409 is returned.
async fn create_sale(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    record(&state, &headers);
    let delay = {
        let mut st = state.lock().unwrap();
        st.sale_posts += 1;
        st.sale_delay
    };
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let mut st = state.lock().unwrap();
    let lines = body["detalles"].as_array().cloned().unwrap_or_default();
    for line in &lines {
        let available = st.stock_of(line["producto_id"].as_i64().unwrap_or(-1)).unwrap_or(0);
        if line["cantidad"].as_i64().unwrap_or(0) > available {
            return (
                StatusCode::CONFLICT,
                Json(json!({"success": false, "message": "Stock insuficiente"})),
            );
        }
    }
    for line in &lines {
        let id = line["producto_id"].as_i64().unwrap_or(-1);
        let qty = line["cantidad"].as_i64().unwrap_or(0);
        if let Some(p) = st.products.iter_mut().find(|p| p["producto_id"] == id) {
            let stock = p["stock"].as_i64().unwrap_or(0);
            p["stock"] = json!(stock - qty);
        }
    }

    let mut sale = body.clone();
    sale["venta_id"] = json!(st.sales.len() as i64 + 1);
    sale["fecha"] = json!("2026-10-16T10:00:00Z");
    st.sales.push(sale.clone());
    (StatusCode::CREATED, Json(json!({"success": true, "data": sale})))
}

async fn list_movements(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    record(&state, &headers);
    let movements = state.lock().unwrap().movements.clone();
    (StatusCode::OK, Json(Value::Array(movements)))
}

async fn create_movement(State(state): State<Shared>, headers: HeaderMap, Json(mut body): Json<Value>) -> Reply {
    record(&state, &headers);
    let mut st = state.lock().unwrap();
    body["inventario_id"] = json!(st.movements.len() as i64 + 1);
    body["fecha"] = json!("2026-10-16T10:00:00Z");
    st.movements.push(body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn product_movements(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Reply {
    record(&state, &headers);
    let st = state.lock().unwrap();
    let rows: Vec<Value> = st
        .movements
        .iter()
        .filter(|m| m["producto_id"] == id)
        .cloned()
        .collect();
    (StatusCode::OK, Json(Value::Array(rows)))
}

async fn low_stock(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<std::collections::HashMap<String, String>>,
) -> Reply {
    record(&state, &headers);
    let limit: i64 = params
        .get("limite")
        .and_then(|v| v.parse().ok())
        .unwrap_or(-1);
    let st = state.lock().unwrap();
    let rows: Vec<Value> = st
        .products
        .iter()
        .filter(|p| p["stock"].as_i64().unwrap_or(0) <= limit)
        .map(|p| {
            json!({
                "producto_id": p["producto_id"],
                "nombre": p["nombre"],
                "stock": p["stock"],
                "categoria_id": p["categoria_id"],
            })
        })
        .collect();
    (StatusCode::OK, Json(Value::Array(rows)))
}

async fn set_stock(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    record(&state, &headers);
    let mut st = state.lock().unwrap();
    match st.products.iter_mut().find(|p| p["producto_id"] == id) {
        Some(p) => {
            p["stock"] = body["stock"].clone();
            (StatusCode::OK, Json(json!({"producto_id": id, "stock": body["stock"]})))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Producto no encontrado"})),
        ),
    }
}
