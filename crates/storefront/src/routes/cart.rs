//! Cart route handlers.
//!
//! The cart lives in the session. Adding an item looks the product up on
//! the backend so the line carries the current name, variant and price.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use bazaar_core::view::{ImageCdn, ImageTransform, format_attributes};
use bazaar_core::{ProductId, SkuId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{Page, load_cart, store_cart};
use crate::models::{Breadcrumb, Cart, CartItem, Nav};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub sku_id: String,
    pub product_id: String,
    pub name: String,
    pub variant_label: String,
    pub image_url: Option<String>,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    #[must_use]
    pub fn from_cart(cart: &Cart, cdn: &ImageCdn) -> Self {
        Self {
            lines: cart
                .items()
                .iter()
                .map(|item| CartLineView {
                    sku_id: item.sku_id.to_string(),
                    product_id: item.product_id.to_string(),
                    name: item.name.clone(),
                    variant_label: item.variant_label.clone(),
                    image_url: cdn.url(item.image.as_deref(), ImageTransform::Avatar),
                    unit_price: item.unit_price.to_string(),
                    quantity: item.quantity,
                    line_total: item.line_total().to_string(),
                })
                .collect(),
            subtotal: cart.subtotal().to_string(),
            item_count: cart.count(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    /// Omitted for single-variant products.
    pub sku_id: Option<String>,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub sku_id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub sku_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub nav: Nav,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub cart: CartView,
}

/// Display cart page.
#[instrument(skip(state, page))]
pub async fn show(State(state): State<AppState>, page: Page) -> impl IntoResponse {
    CartShowTemplate {
        cart: CartView::from_cart(&page.cart, state.cdn()),
        nav: page.nav,
        breadcrumbs: vec![Breadcrumb::link("Home", "/"), Breadcrumb::current("Cart")],
    }
}

/// Add a SKU to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = api::products::get(state.api(), &ProductId::new(form.product_id)).await?;

    let sku = match form.sku_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(sku_id) => product.sku(&SkuId::new(sku_id)),
        None if product.skus.len() == 1 => product.skus.first(),
        None => return Err(AppError::BadRequest("Please choose an option".to_string())),
    }
    .ok_or_else(|| AppError::BadRequest("That option is no longer available".to_string()))?;

    if sku.stock == 0 {
        return Err(AppError::BadRequest("That option is out of stock".to_string()));
    }

    let mut cart = load_cart(&session).await;
    let line = CartItem {
        sku_id: sku.id.clone(),
        product_id: product.id.clone(),
        name: product.name.clone(),
        variant_label: if sku.attributes.is_empty() {
            String::new()
        } else {
            format_attributes(&sku.attributes)
        },
        unit_price: sku.effective_price(product.default_price),
        image: product.image.clone(),
        quantity: form.quantity.unwrap_or(1),
    };
    cart.add(line, sku.stock);
    store_cart(&session, &cart).await?;

    add_breadcrumb("cart", "Added to cart", Some(&[("sku_id", sku.id.as_str())]));
    Ok(Redirect::to("/cart").into_response())
}

/// Change a line's quantity.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await;
    cart.update(&SkuId::new(form.sku_id), form.quantity);
    store_cart(&session, &cart).await?;
    Ok(Redirect::to("/cart"))
}

/// Remove a line.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await;
    cart.remove(&SkuId::new(form.sku_id));
    store_cart(&session, &cart).await?;
    Ok(Redirect::to("/cart"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::Price;

    use super::*;

    #[test]
    fn test_cart_view_formats_prices() {
        let mut cart = Cart::default();
        let line = CartItem {
            sku_id: SkuId::new("s1"),
            product_id: ProductId::new("p1"),
            name: "Scarf".to_string(),
            variant_label: "color: red".to_string(),
            unit_price: Price::from(250),
            image: Some("scarves/red".to_string()),
            quantity: 2,
        };
        cart.add(line, 10);

        let view = CartView::from_cart(&cart, &ImageCdn::new("demo"));
        assert_eq!(view.subtotal, "500.00");
        assert_eq!(view.item_count, 2);
        assert_eq!(view.lines[0].unit_price, "250.00");
        assert!(view.lines[0].image_url.as_deref().unwrap().ends_with("/scarves/red"));
    }
}
