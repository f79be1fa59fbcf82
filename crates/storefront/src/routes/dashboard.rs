//! Seller dashboard route handlers.
//!
//! Every page requires a seller (or admin) account. All reads and writes go
//! through the seller's own token; the backend scopes them to their store.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use bazaar_core::payload::{
    ProductEditorState, StoreProfileForm, VariantRow, attribute_text, build_product_create,
    build_product_update, build_store_profile,
};
use bazaar_core::view::{ProductCard, StoreOrderView, VariantView, classify_status, format_attributes};
use bazaar_core::{ProductId, ProductStatus, Store, StoreId};
use tracing::instrument;

use crate::api::{self, ApiError};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{Page, RequireSeller};
use crate::models::{Nav, Tab, dashboard_tabs};
use crate::state::AppState;

/// Blank variant rows offered when creating a product.
const NEW_VARIANT_ROWS: usize = 3;

/// Statuses a seller can pick in the editor.
const EDITABLE_STATUSES: [ProductStatus; 3] = [
    ProductStatus::Active,
    ProductStatus::Draft,
    ProductStatus::Archived,
];

// =============================================================================
// View Types
// =============================================================================

/// One variant row as the editor form renders it.
#[derive(Debug, Clone, Default)]
pub struct VariantRowView {
    pub id: String,
    pub attributes: String,
    pub price: String,
    pub stock: u32,
    pub sku_code: String,
}

impl From<&VariantRow> for VariantRowView {
    fn from(row: &VariantRow) -> Self {
        Self {
            id: row.id.as_ref().map(ToString::to_string).unwrap_or_default(),
            attributes: attribute_text(&row.attributes),
            price: row.price.map(|p| p.to_string()).unwrap_or_default(),
            stock: row.stock,
            sku_code: row.sku_code.clone(),
        }
    }
}

/// A status choice in the editor.
#[derive(Debug, Clone)]
pub struct StatusOption {
    pub value: &'static str,
    pub selected: bool,
}

/// Product editor form values.
#[derive(Debug, Clone)]
pub struct ProductEditorView {
    pub name: String,
    pub description: String,
    pub category: String,
    pub image: String,
    pub default_price: String,
    pub statuses: Vec<StatusOption>,
    /// Editable rows (new products only).
    pub variant_rows: Vec<VariantRowView>,
    /// Read-only variants of an existing product.
    pub variants: Vec<VariantView>,
}

impl ProductEditorView {
    fn new(state: &ProductEditorState, spare_rows: usize) -> Self {
        let mut variant_rows: Vec<VariantRowView> =
            state.variants.iter().map(VariantRowView::from).collect();
        variant_rows.extend(std::iter::repeat_with(VariantRowView::default).take(spare_rows));

        Self {
            name: state.name.clone(),
            description: state.description.clone(),
            category: state.category.clone(),
            image: state.image.clone(),
            default_price: state.default_price.to_string(),
            statuses: EDITABLE_STATUSES
                .iter()
                .map(|status| StatusOption {
                    value: status.as_str(),
                    selected: *status == state.status,
                })
                .collect(),
            variant_rows,
            variants: Vec::new(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Incoming store orders.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/orders.html")]
pub struct DashboardOrdersTemplate {
    pub nav: Nav,
    pub tabs: Vec<Tab>,
    pub orders: Vec<StoreOrderView>,
}

/// The seller's products.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/products.html")]
pub struct DashboardProductsTemplate {
    pub nav: Nav,
    pub tabs: Vec<Tab>,
    pub products: Vec<ProductCard>,
}

/// Product create/edit form.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/product_form.html")]
pub struct ProductFormTemplate {
    pub nav: Nav,
    pub tabs: Vec<Tab>,
    pub title: String,
    pub action: String,
    pub is_new: bool,
    pub editor: ProductEditorView,
    pub error: Option<String>,
}

/// Store settings form.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/store.html")]
pub struct StoreSettingsTemplate {
    pub nav: Nav,
    pub tabs: Vec<Tab>,
    pub form: StoreProfileForm,
    pub slug: String,
    pub status: String,
    pub status_class: &'static str,
    pub masked_account: Option<String>,
    pub saved: bool,
    pub error: Option<String>,
}

impl StoreSettingsTemplate {
    fn new(nav: Nav, store: &Store, form: StoreProfileForm) -> Self {
        Self {
            nav,
            tabs: dashboard_tabs("/dashboard/store"),
            form,
            slug: store.slug.clone(),
            status: store.status.as_str().to_string(),
            status_class: classify_status(store.status.as_str()).badge_class(),
            masked_account: store
                .banking
                .as_ref()
                .filter(|b| !b.account_number.is_empty())
                .map(bazaar_core::BankingDetails::masked_account_number),
            saved: false,
            error: None,
        }
    }
}

/// Backend validation failures are shown on the form.
fn form_error(err: ApiError) -> std::result::Result<String, AppError> {
    match err {
        ApiError::Status { status, message }
            if status.is_client_error()
                && status != StatusCode::UNAUTHORIZED
                && status != StatusCode::FORBIDDEN
                && status != StatusCode::NOT_FOUND =>
        {
            Ok(message)
        }
        other => Err(AppError::Api(other)),
    }
}

// =============================================================================
// Orders
// =============================================================================

/// `/dashboard` lands on the orders tab.
pub async fn index() -> Redirect {
    Redirect::to("/dashboard/orders")
}

/// Suborders addressed to the seller's store, newest first.
#[instrument(skip_all)]
pub async fn orders(
    State(state): State<AppState>,
    RequireSeller(current): RequireSeller,
    page: Page,
) -> Result<DashboardOrdersTemplate> {
    let mut orders = api::orders::store_orders(state.api(), &current.token).await?;
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(DashboardOrdersTemplate {
        nav: page.nav,
        tabs: dashboard_tabs("/dashboard/orders"),
        orders: orders
            .iter()
            .map(|order| StoreOrderView::from_store_order(order, state.cdn()))
            .collect(),
    })
}

// =============================================================================
// Products
// =============================================================================

/// The seller's catalogue, drafts included.
#[instrument(skip_all)]
pub async fn products(
    State(state): State<AppState>,
    RequireSeller(current): RequireSeller,
    page: Page,
) -> Result<DashboardProductsTemplate> {
    let store = api::stores::secure_detail(state.api(), &current.token).await?;
    let products = api::products::by_store(state.api(), &store.id).await?;

    Ok(DashboardProductsTemplate {
        nav: page.nav,
        tabs: dashboard_tabs("/dashboard/products"),
        products: products
            .iter()
            .map(|product| ProductCard::from_product(product, state.cdn()))
            .collect(),
    })
}

fn new_product_form(nav: Nav, editor: &ProductEditorState, error: Option<String>) -> ProductFormTemplate {
    ProductFormTemplate {
        nav,
        tabs: dashboard_tabs("/dashboard/products"),
        title: "New product".to_string(),
        action: "/dashboard/products".to_string(),
        is_new: true,
        editor: ProductEditorView::new(editor, NEW_VARIANT_ROWS),
        error,
    }
}

/// Empty product editor.
#[instrument(skip_all)]
pub async fn new_product(RequireSeller(_current): RequireSeller, page: Page) -> ProductFormTemplate {
    new_product_form(page.nav, &ProductEditorState::default(), None)
}

/// Create a product from the editor.
#[instrument(skip_all)]
pub async fn create_product(
    State(state): State<AppState>,
    RequireSeller(current): RequireSeller,
    page: Page,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let editor = ProductEditorState::from_form(&pairs);
    if editor.name.is_empty() {
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            new_product_form(page.nav, &editor, Some("Please enter a product name".to_string())),
        )
            .into_response());
    }

    let payload = build_product_create(&editor);
    match api::products::create(state.api(), &payload, &current.token).await {
        Ok(product) => {
            add_breadcrumb("dashboard", "Product created", Some(&[("product_id", product.id.as_str())]));
            tracing::info!(product_id = %product.id, "Product created");
            Ok(Redirect::to("/dashboard/products").into_response())
        }
        Err(e) => {
            let message = form_error(e)?;
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                new_product_form(page.nav, &editor, Some(message)),
            )
                .into_response())
        }
    }
}

fn edit_product_form(
    nav: Nav,
    id: &ProductId,
    editor: &ProductEditorState,
    variants: Vec<VariantView>,
    error: Option<String>,
) -> ProductFormTemplate {
    let mut view = ProductEditorView::new(editor, 0);
    view.variant_rows.clear();
    view.variants = variants;

    ProductFormTemplate {
        nav,
        tabs: dashboard_tabs("/dashboard/products"),
        title: format!("Edit {}", editor.name),
        action: format!("/dashboard/products/{id}"),
        is_new: false,
        editor: view,
        error,
    }
}

/// Load a product and check it belongs to the seller's store.
async fn owned_product(
    state: &AppState,
    current: &crate::models::CurrentSession,
    id: &ProductId,
) -> Result<bazaar_core::Product> {
    let product = api::products::get(state.api(), id).await?;
    check_ownership(&product, current.user.store_id.as_ref())?;
    Ok(product)
}

/// A seller may only touch products of the store on their profile.
fn check_ownership(product: &bazaar_core::Product, store_id: Option<&StoreId>) -> Result<()> {
    let Some(mine) = store_id else {
        return Err(AppError::Forbidden("Your account has no store".to_string()));
    };
    match product.store_id() {
        Some(owner) if owner == mine => Ok(()),
        _ => Err(AppError::Forbidden("This product belongs to another store".to_string())),
    }
}

fn variant_views(product: &bazaar_core::Product) -> Vec<VariantView> {
    product
        .skus
        .iter()
        .map(|sku| VariantView {
            id: sku.id.to_string(),
            label: format_attributes(&sku.attributes),
            price: sku.effective_price(product.default_price).to_string(),
            stock: sku.stock,
            in_stock: sku.in_stock(),
        })
        .collect()
}

/// Editor prefilled from an existing product.
#[instrument(skip(state, current, page))]
pub async fn edit_product(
    State(state): State<AppState>,
    RequireSeller(current): RequireSeller,
    page: Page,
    Path(id): Path<String>,
) -> Result<ProductFormTemplate> {
    let id = ProductId::new(id);
    let product = owned_product(&state, &current, &id).await?;
    let editor = ProductEditorState::from_product(&product);

    Ok(edit_product_form(page.nav, &id, &editor, variant_views(&product), None))
}

/// Save product details. Variants are not part of the update.
#[instrument(skip(state, current, page, pairs))]
pub async fn update_product(
    State(state): State<AppState>,
    RequireSeller(current): RequireSeller,
    page: Page,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let id = ProductId::new(id);
    let product = owned_product(&state, &current, &id).await?;
    let editor = ProductEditorState::from_form(&pairs);

    let payload = build_product_update(&editor);
    match api::products::update(state.api(), &id, &payload, &current.token).await {
        Ok(_) => {
            tracing::info!(product_id = %id, "Product updated");
            Ok(Redirect::to("/dashboard/products").into_response())
        }
        Err(e) => {
            let message = form_error(e)?;
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                edit_product_form(page.nav, &id, &editor, variant_views(&product), Some(message)),
            )
                .into_response())
        }
    }
}

// =============================================================================
// Store settings
// =============================================================================

/// Store profile and payout account.
#[instrument(skip_all)]
pub async fn store_settings(
    State(state): State<AppState>,
    RequireSeller(current): RequireSeller,
    page: Page,
) -> Result<StoreSettingsTemplate> {
    let store = api::stores::secure_detail(state.api(), &current.token).await?;
    let form = StoreProfileForm::from_store(&store);
    Ok(StoreSettingsTemplate::new(page.nav, &store, form))
}

/// Save the store profile.
#[instrument(skip_all)]
pub async fn update_store(
    State(state): State<AppState>,
    RequireSeller(current): RequireSeller,
    page: Page,
    Form(form): Form<StoreProfileForm>,
) -> Result<Response> {
    let payload = build_store_profile(&form);

    match api::stores::update_own(state.api(), &payload, &current.token).await {
        Ok(store) => {
            tracing::info!(store_id = %store.id, banking = payload.banking.is_some(), "Store updated");
            let mut page = StoreSettingsTemplate::new(page.nav, &store, StoreProfileForm::from_store(&store));
            page.saved = true;
            Ok(page.into_response())
        }
        Err(e) => {
            let message = form_error(e)?;
            let store = api::stores::secure_detail(state.api(), &current.token).await?;
            let mut view = StoreSettingsTemplate::new(
                page.nav,
                &store,
                StoreProfileForm {
                    account_number: String::new(),
                    ..form
                },
            );
            view.error = Some(message);
            Ok((StatusCode::UNPROCESSABLE_ENTITY, view).into_response())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::Price;
    use bazaar_core::payload::AttributeRow;

    use super::*;

    #[test]
    fn test_editor_view_adds_spare_rows_and_selects_status() {
        let state = ProductEditorState {
            status: ProductStatus::Draft,
            default_price: Price::from(90),
            variants: vec![VariantRow {
                attributes: vec![AttributeRow {
                    key: "size".to_string(),
                    value: "M".to_string(),
                }],
                price: Some(Price::from(95)),
                stock: 2,
                ..VariantRow::default()
            }],
            ..ProductEditorState::default()
        };

        let view = ProductEditorView::new(&state, NEW_VARIANT_ROWS);
        assert_eq!(view.variant_rows.len(), 1 + NEW_VARIANT_ROWS);
        assert_eq!(view.variant_rows[0].attributes, "size=M");
        assert_eq!(view.variant_rows[0].price, "95.00");
        assert_eq!(view.default_price, "90.00");
        let selected: Vec<_> = view.statuses.iter().filter(|s| s.selected).map(|s| s.value).collect();
        assert_eq!(selected, vec!["draft"]);
    }

    #[test]
    fn test_store_settings_mask_account() {
        let store: Store = serde_json::from_value(serde_json::json!({
            "_id": "st1",
            "slug": "craft-co",
            "status": "approved",
            "banking": {"bankName": "KBank", "accountName": "Craft", "accountNumber": "1234567890"}
        }))
        .unwrap();
        let view = StoreSettingsTemplate::new(Nav::default(), &store, StoreProfileForm::from_store(&store));
        assert_eq!(view.masked_account.as_deref(), Some("••••••7890"));
        assert!(view.form.account_number.is_empty());
        assert_eq!(view.status, "approved");
    }

    #[test]
    fn test_form_error_keeps_auth_failures_as_errors() {
        let err = ApiError::Status {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "Price must be positive".to_string(),
        };
        assert_eq!(form_error(err).unwrap(), "Price must be positive");

        let err = ApiError::Status {
            status: StatusCode::UNAUTHORIZED,
            message: "expired".to_string(),
        };
        assert!(form_error(err).is_err());
    }

    #[test]
    fn test_ownership_requires_matching_store() {
        let product: bazaar_core::Product =
            serde_json::from_str(r#"{"id": "p1", "store": "st1"}"#).unwrap();
        let mine = StoreId::new("st1");
        let theirs = StoreId::new("st2");

        assert!(check_ownership(&product, Some(&mine)).is_ok());
        assert!(matches!(
            check_ownership(&product, Some(&theirs)),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(check_ownership(&product, None), Err(AppError::Forbidden(_))));

        let orphan: bazaar_core::Product = serde_json::from_str(r#"{"id": "p2"}"#).unwrap();
        assert!(matches!(
            check_ownership(&orphan, Some(&mine)),
            Err(AppError::Forbidden(_))
        ));
    }
}
