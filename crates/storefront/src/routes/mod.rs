//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Home page
//! GET  /health                        - Health check
//!
//! # Catalogue
//! GET  /products                      - Product listing (?category=&page=)
//! GET  /products/{id}                 - Product detail
//! GET  /stores/{slug}                 - Store page
//! GET  /search                        - Product and store search (?q=)
//!
//! # Cart
//! GET  /cart                          - Cart page
//! POST /cart/add                      - Add a SKU
//! POST /cart/update                   - Change a line's quantity
//! POST /cart/remove                   - Remove a line
//!
//! # Checkout and orders (requires auth)
//! GET  /checkout                      - Checkout form
//! POST /checkout                      - Place order
//! GET  /orders                        - Order history
//! GET  /orders/{id}                   - Order detail
//!
//! # Auth
//! GET  /auth/login                    - Login page
//! POST /auth/login                    - Login action
//! GET  /auth/register                 - Register page
//! POST /auth/register                 - Register action
//! POST /auth/logout                   - Logout action
//!
//! # Seller dashboard (requires seller)
//! GET  /dashboard                     - Redirect to orders
//! GET  /dashboard/orders              - Incoming store orders
//! GET  /dashboard/products            - Store catalogue
//! GET  /dashboard/products/new        - New product form
//! POST /dashboard/products            - Create product
//! GET  /dashboard/products/{id}/edit  - Edit product form
//! POST /dashboard/products/{id}       - Update product
//! GET  /dashboard/store               - Store settings
//! POST /dashboard/store               - Save store settings
//!
//! # API
//! GET  /api/notifications/stream      - Server-sent notification events
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod dashboard;
pub mod home;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod search;
pub mod stores;

use axum::{
    Router,
    http::StatusCode,
    response::Response,
    routing::{get, post},
};

use crate::error::error_page;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create the seller dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/orders", get(dashboard::orders))
        .route(
            "/products",
            get(dashboard::products).post(dashboard::create_product),
        )
        .route("/products/new", get(dashboard::new_product))
        .route("/products/{id}", post(dashboard::update_product))
        .route("/products/{id}/edit", get(dashboard::edit_product))
        .route(
            "/store",
            get(dashboard::store_settings).post(dashboard::update_store),
        )
}

/// Create the JSON/streaming API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/notifications/stream", get(notifications::stream))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .route("/stores/{slug}", get(stores::show))
        .route("/search", get(search::search))
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::show).post(checkout::place))
        .nest("/orders", order_routes())
        .nest("/auth", auth_routes())
        .nest("/dashboard", dashboard_routes())
        .nest("/api", api_routes())
        .fallback(not_found)
}

/// Fallback for unknown paths.
pub async fn not_found() -> Response {
    error_page(
        StatusCode::NOT_FOUND,
        "We couldn't find what you were looking for.".to_string(),
    )
}
