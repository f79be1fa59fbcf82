//! Buyer order history.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use bazaar_core::OrderId;
use bazaar_core::view::OrderView;
use tracing::instrument;

use crate::api;
use crate::error::Result;
use crate::filters;
use crate::middleware::{Page, RequireUser};
use crate::models::{Breadcrumb, Nav};
use crate::state::AppState;

/// Order list template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub nav: Nav,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub orders: Vec<OrderView>,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub nav: Nav,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub order: OrderView,
}

/// List the signed-in buyer's orders, newest first.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    page: Page,
) -> Result<OrdersIndexTemplate> {
    let mut orders = api::orders::list_mine(state.api(), &current.token).await?;
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(OrdersIndexTemplate {
        nav: page.nav,
        breadcrumbs: vec![Breadcrumb::link("Home", "/"), Breadcrumb::current("Orders")],
        orders: orders
            .iter()
            .map(|order| OrderView::from_order(order, state.cdn()))
            .collect(),
    })
}

/// Show one order with its per-store fulfillment.
#[instrument(skip(state, current, page))]
pub async fn show(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    page: Page,
    Path(id): Path<String>,
) -> Result<OrderShowTemplate> {
    let order = api::orders::get(state.api(), &OrderId::new(id), &current.token).await?;
    let view = OrderView::from_order(&order, state.cdn());

    Ok(OrderShowTemplate {
        nav: page.nav,
        breadcrumbs: vec![
            Breadcrumb::link("Home", "/"),
            Breadcrumb::link("Orders", "/orders"),
            Breadcrumb::current(format!("Order {}", view.id)),
        ],
        order: view,
    })
}
