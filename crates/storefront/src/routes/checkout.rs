//! Checkout route handlers.
//!
//! Checkout turns the session cart into one backend order. The backend
//! splits it into per-store suborders and reprices every line.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use bazaar_core::payload::{CheckoutForm, build_place_order};
use tower_sessions::Session;
use tracing::instrument;

use super::cart::CartView;
use crate::api::{self, ApiError};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{Page, RequireUser, store_cart};
use crate::models::{Breadcrumb, Cart, Nav};
use crate::state::AppState;

/// A payment choice on the checkout page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Payment options in display order.
pub const PAYMENT_OPTIONS: &[PaymentOption] = &[
    PaymentOption {
        value: "card",
        label: "Credit or debit card",
    },
    PaymentOption {
        value: "promptpay-only",
        label: "PromptPay",
    },
    PaymentOption {
        value: "cod",
        label: "Cash on delivery",
    },
];

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub nav: Nav,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub cart: CartView,
    pub form: CheckoutForm,
    pub payment_options: &'static [PaymentOption],
    pub payment_public_key: String,
    pub error: Option<String>,
}

impl CheckoutTemplate {
    fn new(state: &AppState, nav: Nav, cart: &Cart, form: CheckoutForm, error: Option<String>) -> Self {
        Self {
            nav,
            breadcrumbs: vec![
                Breadcrumb::link("Home", "/"),
                Breadcrumb::link("Cart", "/cart"),
                Breadcrumb::current("Checkout"),
            ],
            cart: CartView::from_cart(cart, state.cdn()),
            form,
            payment_options: PAYMENT_OPTIONS,
            payment_public_key: state.config().public_keys.payment_public_key.clone(),
            error,
        }
    }
}

/// Fields the shipping address cannot do without.
fn missing_fields(form: &CheckoutForm) -> Vec<&'static str> {
    [
        ("recipient name", &form.recipient_name),
        ("phone", &form.phone),
        ("address", &form.line1),
        ("province", &form.province),
        ("postal code", &form.postal_code),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(label, _)| label)
    .collect()
}

/// Display the checkout form.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    page: Page,
) -> Response {
    if page.cart.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    let form = CheckoutForm {
        fe_method: "card".to_string(),
        recipient_name: current.user.name.clone(),
        email: current.user.email.clone(),
        ..CheckoutForm::default()
    };

    CheckoutTemplate::new(&state, page.nav, &page.cart, form, None).into_response()
}

/// Place the order.
///
/// Validation failures and backend rejections (out of stock, invalid
/// address) re-render the form with the message and keep the cart.
#[instrument(skip_all)]
pub async fn place(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    page: Page,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    if page.cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let missing = missing_fields(&form);
    if !missing.is_empty() {
        let error = format!("Please fill in: {}", missing.join(", "));
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            CheckoutTemplate::new(&state, page.nav, &page.cart, form, Some(error)),
        )
            .into_response());
    }

    let payload = build_place_order(&form, &page.cart.lines());
    let order = match api::orders::place(state.api(), &payload, &current.token).await {
        Ok(order) => order,
        Err(ApiError::Status { status, message })
            if status.is_client_error()
                && status != StatusCode::UNAUTHORIZED
                && status != StatusCode::FORBIDDEN =>
        {
            tracing::info!(%status, %message, "Order rejected by backend");
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                CheckoutTemplate::new(&state, page.nav, &page.cart, form, Some(message)),
            )
                .into_response());
        }
        Err(e) => return Err(AppError::Api(e)),
    };

    store_cart(&session, &Cart::default()).await?;
    add_breadcrumb("checkout", "Order placed", Some(&[("order_id", order.id.as_str())]));
    tracing::info!(order_id = %order.id, "Order placed");

    Ok(Redirect::to(&format!("/orders/{}", order.id)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_lists_blank_required_fields() {
        let form = CheckoutForm {
            recipient_name: "Mali".to_string(),
            phone: " ".to_string(),
            line1: "1 Sukhumvit Rd".to_string(),
            province: "Bangkok".to_string(),
            ..CheckoutForm::default()
        };
        assert_eq!(missing_fields(&form), vec!["phone", "postal code"]);
    }

    #[test]
    fn test_payment_options_map_to_backend_methods() {
        let methods: Vec<String> = PAYMENT_OPTIONS
            .iter()
            .map(|option| bazaar_core::payload::payment_method_for(option.value).to_string())
            .collect();
        assert_eq!(methods, vec!["card", "promptpay", "cod"]);
    }
}
