//! Search route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use bazaar_core::view::{ProductCard, StoreHeaderView};
use serde::Deserialize;
use tracing::instrument;

use crate::api;
use crate::error::Result;
use crate::filters;
use crate::middleware::Page;
use crate::models::{Breadcrumb, Nav};
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Search page template.
#[derive(Template, WebTemplate)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub nav: Nav,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub query: String,
    pub products: Vec<ProductCard>,
    pub stores: Vec<StoreHeaderView>,
}

impl SearchTemplate {
    /// Whether a query was run and nothing matched.
    #[must_use]
    pub fn no_results(&self) -> bool {
        !self.query.is_empty() && self.products.is_empty() && self.stores.is_empty()
    }
}

/// Display search results for products and stores.
#[instrument(skip(state, page))]
pub async fn search(
    State(state): State<AppState>,
    page: Page,
    Query(query): Query<SearchQuery>,
) -> Result<SearchTemplate> {
    let q = query.q.trim().to_string();
    let results = api::search::query(state.api(), &q).await?;

    Ok(SearchTemplate {
        nav: page.nav,
        breadcrumbs: vec![Breadcrumb::link("Home", "/"), Breadcrumb::current("Search")],
        query: q,
        products: results
            .products
            .iter()
            .map(|product| ProductCard::from_product(product, state.cdn()))
            .collect(),
        stores: results
            .stores
            .iter()
            .map(|store| StoreHeaderView::from_store(store, state.cdn()))
            .collect(),
    })
}
