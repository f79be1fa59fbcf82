//! Store endpoints.
//!
//! Public lookups decode into [`PublicStore`], which has no banking field,
//! so banking details can only come from [`secure_detail`].

use bazaar_core::payload::StoreProfilePayload;
use bazaar_core::{PublicStore, Store};
use secrecy::SecretString;
use serde_json::Value;
use tracing::instrument;

use super::{ApiClient, ApiError, decode, decode_list, segment};

/// `GET /stores/slug/{slug}`
///
/// # Errors
///
/// Returns `ApiError` if the backend call fails; an unknown slug is
/// `ApiError::Status` with 404.
#[instrument(skip(client))]
pub async fn get_by_slug(client: &ApiClient, slug: &str) -> Result<PublicStore, ApiError> {
    let path = format!("stores/slug/{}", segment(slug));
    decode(client.get::<Value>(&path, None).await?)
}

/// `GET /stores`
///
/// # Errors
///
/// Returns `ApiError` if the backend call fails.
#[instrument(skip(client))]
pub async fn list(client: &ApiClient) -> Result<Vec<PublicStore>, ApiError> {
    decode_list(client.get::<Value>("stores", None).await?)
}

/// `GET /stores/me`: the seller's own store including banking details.
///
/// # Errors
///
/// Returns `ApiError` if the token is rejected or the seller has no store.
#[instrument(skip(client, token))]
pub async fn secure_detail(client: &ApiClient, token: &SecretString) -> Result<Store, ApiError> {
    decode(client.get::<Value>("stores/me", Some(token)).await?)
}

/// `PUT /stores/me`
///
/// # Errors
///
/// Returns `ApiError` if the backend rejects the update.
#[instrument(skip(client, payload, token))]
pub async fn update_own(
    client: &ApiClient,
    payload: &StoreProfilePayload,
    token: &SecretString,
) -> Result<Store, ApiError> {
    decode(client.put::<Value, _>("stores/me", payload, Some(token)).await?)
}
