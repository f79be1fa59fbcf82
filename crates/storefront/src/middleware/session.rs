//! Session middleware configuration.
//!
//! Sessions live in process memory: the storefront owns no database and
//! nothing about a browser session survives a restart. The session id
//! cookie is signed with a key derived from the session secret.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use secrecy::{ExposeSecret, SecretString};
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::config::StorefrontConfig;
use crate::models::{Cart, session_keys};
use crate::state::AppState;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "bazaar_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Cookie signing keys are 64 bytes.
const KEY_LENGTH: usize = 64;

/// Derive the cookie signing key from the session secret.
///
/// The secret's bytes are repeated to the key length. An empty secret
/// (only possible when config validation was bypassed) gets a random key.
fn signing_key(secret: &SecretString) -> Key {
    let bytes: Vec<u8> = secret
        .expose_secret()
        .bytes()
        .cycle()
        .take(KEY_LENGTH)
        .collect();
    Key::try_from(bytes.as_slice()).unwrap_or_else(|_| {
        tracing::warn!("Session secret unusable as a signing key, generating one");
        Key::generate()
    })
}

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(
    config: &StorefrontConfig,
) -> SessionManagerLayer<MemoryStore, SignedCookie> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_https())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(signing_key(&config.session_secret))
}

/// Response marker: the backend rejected this session's token.
///
/// Set by `AppError` when a backend call answers 401/403, and acted on by
/// [`session_rejection_middleware`], which has access to the session.
#[derive(Debug, Clone, Copy)]
pub struct SessionRejected;

/// Sign the browser out when a handler reports a rejected token.
///
/// Must be layered inside the session layer.
pub async fn session_rejection_middleware(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if response.extensions().get::<SessionRejected>().is_some() {
        if let Some(token) = super::auth::session_token(&session).await {
            state.forget_profile(&token).await;
        }
        if let Err(e) = super::auth::sign_out(&session).await {
            tracing::warn!(error = %e, "Failed to clear rejected session");
        }
    }

    response
}

/// The session's cart, empty when none has been stored yet.
pub async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Save the cart, dropping the key entirely once it is empty.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn store_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    if cart.is_empty() {
        session.remove::<Cart>(session_keys::CART).await?;
        return Ok(());
    }
    session.insert(session_keys::CART, cart).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use bazaar_core::{Price, ProductId, SkuId};

    use super::*;
    use crate::models::CartItem;

    #[tokio::test]
    async fn test_cart_round_trips_through_session() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        assert!(load_cart(&session).await.is_empty());

        let mut cart = Cart::default();
        let line = CartItem {
            sku_id: SkuId::new("s1"),
            product_id: ProductId::new("p1"),
            name: "Mug".to_string(),
            variant_label: String::new(),
            unit_price: Price::from(120),
            image: None,
            quantity: 2,
        };
        cart.add(line, 5);
        store_cart(&session, &cart).await.unwrap();
        assert_eq!(load_cart(&session).await.count(), 2);

        store_cart(&session, &Cart::default()).await.unwrap();
        assert!(session.get::<Cart>(session_keys::CART).await.unwrap().is_none());
    }

    #[test]
    fn test_signing_key_repeats_secret() {
        let key = signing_key(&SecretString::from("ab"));
        assert_eq!(key.signing(), "ab".repeat(16).as_bytes());

        let other = signing_key(&SecretString::from("cd"));
        assert_ne!(key.signing(), other.signing());
    }
}
