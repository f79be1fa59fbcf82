//! Authentication extractors.
//!
//! The backend issues an opaque session token at login. It is kept in the
//! server-side session and turned into a [`CurrentSession`] per request: the
//! profile stored next to it in the session is reused, and when it is
//! missing the backend profile endpoint is asked (through the state's short
//! lived profile cache).

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use bazaar_core::User;
use secrecy::{ExposeSecret, SecretString};
use tower_sessions::Session;

use super::session::load_cart;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::{Cart, CurrentSession, Nav, session_keys};
use crate::state::AppState;

/// Extractor that requires a signed-in account.
///
/// HTML requests without a session are redirected to the login page; API
/// requests get a bare 401.
///
/// # Example
///
/// ```rust,ignore
/// async fn orders(RequireUser(current): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", current.user.display_name())
/// }
/// ```
pub struct RequireUser(pub CurrentSession);

/// Extractor that requires a seller (or admin) account.
pub struct RequireSeller(pub CurrentSession);

/// Everything a page handler needs about the visitor.
///
/// Never rejects: anonymous visitors get `current: None` and whatever cart
/// the session holds.
pub struct Page {
    pub current: Option<CurrentSession>,
    pub cart: Cart,
    pub nav: Nav,
}

/// Error returned when authentication is required but missing.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// Signed in, but the account cannot use this page.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => {
                (StatusCode::FORBIDDEN, "Seller account required").into_response()
            }
        }
    }
}

/// Nested routers see a stripped URI, so the original one is preferred.
fn missing_session(parts: &Parts) -> AuthRejection {
    let path = parts
        .extensions
        .get::<OriginalUri>()
        .map_or_else(|| parts.uri.path(), |original| original.0.path());
    if path.starts_with("/api/") {
        AuthRejection::Unauthorized
    } else {
        AuthRejection::RedirectToLogin
    }
}

/// Resolve the signed-in account from the session.
///
/// A token the backend rejects is removed from the session so the next
/// request starts signed out.
async fn load_current(session: &Session, state: &AppState) -> Option<CurrentSession> {
    let token: String = session
        .get(session_keys::SESSION_TOKEN)
        .await
        .ok()
        .flatten()?;
    let token = SecretString::from(token);

    if let Some(user) = session
        .get::<User>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
    {
        return Some(CurrentSession { user, token });
    }

    match state.profile(&token).await {
        Ok(user) => {
            if let Err(e) = session.insert(session_keys::CURRENT_USER, &user).await {
                tracing::warn!(error = %e, "Failed to store profile in session");
            }
            Some(CurrentSession { user, token })
        }
        Err(e) if e.is_auth_rejection() => {
            tracing::info!("Backend rejected session token, signing out");
            if let Err(e) = sign_out(session).await {
                tracing::warn!(error = %e, "Failed to clear rejected session");
            }
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "Profile lookup failed");
            None
        }
    }
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection::Unauthorized)?;

        let current = load_current(&session, state)
            .await
            .ok_or_else(|| missing_session(parts))?;

        Ok(Self(current))
    }
}

impl FromRequestParts<AppState> for RequireSeller {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireUser(current) = RequireUser::from_request_parts(parts, state).await?;
        if !current.is_seller() {
            return Err(AuthRejection::Forbidden);
        }
        Ok(Self(current))
    }
}

impl FromRequestParts<AppState> for Page {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>().cloned() else {
            return Ok(Self {
                current: None,
                cart: Cart::default(),
                nav: Nav::default(),
            });
        };

        let current = load_current(&session, state).await;
        let cart = load_cart(&session).await;
        let nav = Nav::new(current.as_ref(), &cart);

        Ok(Self { current, cart, nav })
    }
}

/// Store a freshly issued token and profile in the session (login).
///
/// The session id is rotated so a pre-login cookie cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_in(
    session: &Session,
    token: &SecretString,
    user: &User,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session
        .insert(session_keys::SESSION_TOKEN, token.expose_secret())
        .await?;
    session.insert(session_keys::CURRENT_USER, user).await?;
    set_sentry_user(&user.id, Some(&user.email));
    Ok(())
}

/// Remove the account from the session (logout).
///
/// The cart survives logout.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<String>(session_keys::SESSION_TOKEN).await?;
    session.remove::<User>(session_keys::CURRENT_USER).await?;
    clear_sentry_user();
    Ok(())
}

/// The raw session token, if any.
pub async fn session_token(session: &Session) -> Option<SecretString> {
    session
        .get::<String>(session_keys::SESSION_TOKEN)
        .await
        .ok()
        .flatten()
        .map(SecretString::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_responses() {
        let response = AuthRejection::RedirectToLogin.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/auth/login");

        assert_eq!(
            AuthRejection::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthRejection::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_api_paths_get_unauthorized() {
        let (api, ()) = axum::http::Request::builder()
            .uri("/api/notifications/stream")
            .body(())
            .unwrap()
            .into_parts();
        assert!(matches!(missing_session(&api), AuthRejection::Unauthorized));

        let (page, ()) = axum::http::Request::builder()
            .uri("/orders")
            .body(())
            .unwrap()
            .into_parts();
        assert!(matches!(missing_session(&page), AuthRejection::RedirectToLogin));

        let (mut nested, ()) = axum::http::Request::builder()
            .uri("/notifications/stream")
            .body(())
            .unwrap()
            .into_parts();
        nested.extensions.insert(OriginalUri(
            "/api/notifications/stream".parse().unwrap(),
        ));
        assert!(matches!(missing_session(&nested), AuthRejection::Unauthorized));
    }
}
