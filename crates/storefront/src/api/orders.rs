//! Order endpoints.

use bazaar_core::payload::PlaceOrderPayload;
use bazaar_core::{Order, OrderId, StoreOrder};
use secrecy::SecretString;
use serde_json::Value;
use tracing::instrument;

use super::{ApiClient, ApiError, decode, decode_list, segment};

/// `POST /orders`
///
/// # Errors
///
/// Returns `ApiError` if the backend rejects the order (out of stock,
/// invalid address, and so on); the message is the backend's.
#[instrument(skip(client, payload, token), fields(items = payload.items.len(), method = %payload.payment_method))]
pub async fn place(
    client: &ApiClient,
    payload: &PlaceOrderPayload,
    token: &SecretString,
) -> Result<Order, ApiError> {
    decode(client.post::<Value, _>("orders", payload, Some(token)).await?)
}

/// `GET /orders/me`
///
/// # Errors
///
/// Returns `ApiError` if the token is rejected.
#[instrument(skip(client, token))]
pub async fn list_mine(client: &ApiClient, token: &SecretString) -> Result<Vec<Order>, ApiError> {
    decode_list(client.get::<Value>("orders/me", Some(token)).await?)
}

/// `GET /orders/{id}`
///
/// # Errors
///
/// Returns `ApiError` if the order does not exist or belongs to someone else.
#[instrument(skip(client, token), fields(order_id = %id))]
pub async fn get(client: &ApiClient, id: &OrderId, token: &SecretString) -> Result<Order, ApiError> {
    let path = format!("orders/{}", segment(id.as_str()));
    decode(client.get::<Value>(&path, Some(token)).await?)
}

/// `GET /stores/me/orders`: suborders addressed to the seller's store.
///
/// # Errors
///
/// Returns `ApiError` if the token is rejected.
#[instrument(skip(client, token))]
pub async fn store_orders(
    client: &ApiClient,
    token: &SecretString,
) -> Result<Vec<StoreOrder>, ApiError> {
    decode_list(client.get::<Value>("stores/me/orders", Some(token)).await?)
}
