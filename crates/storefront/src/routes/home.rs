//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use bazaar_core::view::{ProductCard, StoreHeaderView};
use tracing::instrument;

use crate::api::{self, products::ProductQuery};
use crate::filters;
use crate::middleware::Page;
use crate::models::Nav;
use crate::state::AppState;

/// How many products and stores the home page features.
const FEATURED_LIMIT: usize = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: Nav,
    pub products: Vec<ProductCard>,
    pub stores: Vec<StoreHeaderView>,
}

/// Display the home page.
///
/// The home page stays up when the backend is down: each section degrades
/// to empty and the failure is logged.
#[instrument(skip(state, page))]
pub async fn home(State(state): State<AppState>, page: Page) -> impl IntoResponse {
    let query = ProductQuery::default();
    let (products, stores) = tokio::join!(
        api::products::list(state.api(), &query),
        api::stores::list(state.api()),
    );

    let products = products
        .inspect_err(|e| tracing::warn!(error = %e, "Failed to load featured products"))
        .unwrap_or_default()
        .iter()
        .take(FEATURED_LIMIT)
        .map(|product| ProductCard::from_product(product, state.cdn()))
        .collect();

    let stores = stores
        .inspect_err(|e| tracing::warn!(error = %e, "Failed to load stores"))
        .unwrap_or_default()
        .iter()
        .take(FEATURED_LIMIT)
        .map(|store| StoreHeaderView::from_store(store, state.cdn()))
        .collect();

    HomeTemplate {
        nav: page.nav,
        products,
        stores,
    }
}
