//! Product endpoints.

use bazaar_core::payload::{ProductCreatePayload, ProductUpdatePayload};
use bazaar_core::{Product, ProductId, StoreId};
use secrecy::SecretString;
use serde_json::Value;
use tracing::instrument;

use super::{ApiClient, ApiError, decode, decode_list, segment, with_query};

/// Filters for the product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub page: Option<u32>,
}

/// `GET /products`
///
/// # Errors
///
/// Returns `ApiError` if the backend call fails or the body is not a list.
#[instrument(skip(client))]
pub async fn list(client: &ApiClient, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
    let page = query.page.map(|p| p.to_string());
    let path = with_query(
        "products",
        &[
            ("category", query.category.as_deref()),
            ("page", page.as_deref()),
        ],
    );
    decode_list(client.get::<Value>(&path, None).await?)
}

/// `GET /products/{id}`
///
/// # Errors
///
/// Returns `ApiError` if the backend call fails; a missing product is
/// `ApiError::Status` with 404.
#[instrument(skip(client), fields(product_id = %id))]
pub async fn get(client: &ApiClient, id: &ProductId) -> Result<Product, ApiError> {
    let path = format!("products/{}", segment(id.as_str()));
    decode(client.get::<Value>(&path, None).await?)
}

/// `GET /products?store={id}`
///
/// # Errors
///
/// Returns `ApiError` if the backend call fails.
#[instrument(skip(client), fields(store_id = %store_id))]
pub async fn by_store(client: &ApiClient, store_id: &StoreId) -> Result<Vec<Product>, ApiError> {
    let path = with_query("products", &[("store", Some(store_id.as_str()))]);
    decode_list(client.get::<Value>(&path, None).await?)
}

/// `POST /products` as the signed-in seller.
///
/// # Errors
///
/// Returns `ApiError` if the backend rejects the payload.
#[instrument(skip(client, payload, token), fields(name = %payload.name))]
pub async fn create(
    client: &ApiClient,
    payload: &ProductCreatePayload,
    token: &SecretString,
) -> Result<Product, ApiError> {
    decode(client.post::<Value, _>("products", payload, Some(token)).await?)
}

/// `PUT /products/{id}` as the signed-in seller.
///
/// # Errors
///
/// Returns `ApiError` if the backend rejects the payload.
#[instrument(skip(client, payload, token), fields(product_id = %id))]
pub async fn update(
    client: &ApiClient,
    id: &ProductId,
    payload: &ProductUpdatePayload,
    token: &SecretString,
) -> Result<Product, ApiError> {
    let path = format!("products/{}", segment(id.as_str()));
    decode(client.put::<Value, _>(&path, payload, Some(token)).await?)
}
