//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use bazaar_core::ProductId;
use bazaar_core::view::{ProductCard, ProductDetail};
use serde::Deserialize;
use tracing::instrument;

use crate::api::{self, products::ProductQuery};
use crate::error::Result;
use crate::filters;
use crate::middleware::Page;
use crate::models::{Breadcrumb, Nav};
use crate::state::AppState;

/// Listing filters from the query string.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub category: Option<String>,
    pub page: Option<u32>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub nav: Nav,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub products: Vec<ProductCard>,
    pub category: Option<String>,
    pub current_page: u32,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub nav: Nav,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub product: ProductDetail,
}

fn listing_url(category: Option<&str>, page: u32) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    if let Some(category) = category {
        query.append_pair("category", category);
    }
    query.append_pair("page", &page.to_string());
    format!("/products?{}", query.finish())
}

/// Display product listing page.
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: Page,
    Query(query): Query<ListingQuery>,
) -> Result<ProductsIndexTemplate> {
    let category = query
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    let current_page = query.page.unwrap_or(1).max(1);

    let products = api::products::list(
        state.api(),
        &ProductQuery {
            category: category.clone(),
            page: Some(current_page),
        },
    )
    .await?;

    let mut breadcrumbs = vec![Breadcrumb::link("Home", "/")];
    match &category {
        Some(category) => {
            breadcrumbs.push(Breadcrumb::link("Products", "/products"));
            breadcrumbs.push(Breadcrumb::current(category.clone()));
        }
        None => breadcrumbs.push(Breadcrumb::current("Products")),
    }

    let prev_url =
        (current_page > 1).then(|| listing_url(category.as_deref(), current_page - 1));
    let next_url =
        (!products.is_empty()).then(|| listing_url(category.as_deref(), current_page + 1));

    Ok(ProductsIndexTemplate {
        nav: page.nav,
        breadcrumbs,
        products: products
            .iter()
            .map(|product| ProductCard::from_product(product, state.cdn()))
            .collect(),
        category,
        current_page,
        prev_url,
        next_url,
    })
}

/// Display product detail page.
#[instrument(skip(state, page))]
pub async fn show(
    State(state): State<AppState>,
    page: Page,
    Path(id): Path<String>,
) -> Result<ProductShowTemplate> {
    let product = api::products::get(state.api(), &ProductId::new(id)).await?;
    let store = product.store.as_ref().and_then(|s| s.store());
    let detail = ProductDetail::from_product(&product, store, state.cdn());

    let mut breadcrumbs = vec![
        Breadcrumb::link("Home", "/"),
        Breadcrumb::link("Products", "/products"),
    ];
    if !product.category.trim().is_empty() {
        breadcrumbs.push(Breadcrumb::link(
            product.category.clone(),
            listing_url(Some(&product.category), 1),
        ));
    }
    breadcrumbs.push(Breadcrumb::current(product.name.clone()));

    Ok(ProductShowTemplate {
        nav: page.nav,
        breadcrumbs,
        product: detail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_url_encodes_category() {
        assert_eq!(
            listing_url(Some("Home & Living"), 2),
            "/products?category=Home+%26+Living&page=2"
        );
        assert_eq!(listing_url(None, 1), "/products?page=1");
    }
}
