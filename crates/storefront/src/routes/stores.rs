//! Store page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use bazaar_core::view::{ProductCard, StoreHeaderView};
use tracing::instrument;

use crate::api;
use crate::error::Result;
use crate::filters;
use crate::middleware::Page;
use crate::models::{Breadcrumb, Nav};
use crate::state::AppState;

/// Store page template.
#[derive(Template, WebTemplate)]
#[template(path = "stores/show.html")]
pub struct StoreShowTemplate {
    pub nav: Nav,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub store: StoreHeaderView,
    pub products: Vec<ProductCard>,
}

/// Display a store's public page and its products.
#[instrument(skip(state, page))]
pub async fn show(
    State(state): State<AppState>,
    page: Page,
    Path(slug): Path<String>,
) -> Result<StoreShowTemplate> {
    let store = api::stores::get_by_slug(state.api(), &slug).await?;
    let products = api::products::by_store(state.api(), &store.id).await?;

    Ok(StoreShowTemplate {
        nav: page.nav,
        breadcrumbs: vec![
            Breadcrumb::link("Home", "/"),
            Breadcrumb::current(store.name.clone()),
        ],
        store: StoreHeaderView::from_store(&store, state.cdn()),
        products: products
            .iter()
            .map(|product| ProductCard::from_product(product, state.cdn()))
            .collect(),
    })
}
