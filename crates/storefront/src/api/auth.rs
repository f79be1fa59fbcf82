//! Authentication endpoints.
//!
//! The backend issues an opaque session token on login or registration.
//! The storefront keeps it in the server-side session and forwards it as a
//! bearer credential; it is never rendered into a page.

use bazaar_core::User;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use super::{ApiClient, ApiError, decode};

/// A freshly issued session.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: SecretString,
    /// Present when the backend returns the profile alongside the token.
    pub user: Option<User>,
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(alias = "accessToken", alias = "access_token")]
    token: String,
    #[serde(default)]
    user: Option<User>,
}

/// New account details.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: SecretString,
}

fn session_from(value: Value) -> Result<AuthSession, ApiError> {
    let response: TokenResponse = decode(value)?;
    Ok(AuthSession {
        token: SecretString::from(response.token),
        user: response.user,
    })
}

/// `POST /auth/login`
///
/// # Errors
///
/// Returns `ApiError::Status` with the backend's message for bad
/// credentials.
#[instrument(skip(client, password))]
pub async fn login(
    client: &ApiClient,
    email: &str,
    password: &SecretString,
) -> Result<AuthSession, ApiError> {
    let body = json!({
        "email": email.trim(),
        "password": password.expose_secret(),
    });
    session_from(client.post::<Value, _>("auth/login", &body, None).await?)
}

/// `POST /auth/register`
///
/// # Errors
///
/// Returns `ApiError::Status` with the backend's message when the email is
/// taken or the password is rejected.
#[instrument(skip(client, registration), fields(email = %registration.email))]
pub async fn register(client: &ApiClient, registration: &Registration) -> Result<AuthSession, ApiError> {
    let body = json!({
        "name": registration.name.trim(),
        "email": registration.email.trim(),
        "password": registration.password.expose_secret(),
    });
    session_from(client.post::<Value, _>("auth/register", &body, None).await?)
}

/// `GET /auth/profile`
///
/// # Errors
///
/// Returns `ApiError::Status` with 401 when the token has expired.
#[instrument(skip(client, token))]
pub async fn profile(client: &ApiClient, token: &SecretString) -> Result<User, ApiError> {
    let value = client.get::<Value>("auth/profile", Some(token)).await?;
    // Some deployments wrap the profile as {"user": {...}}.
    let value = match value {
        Value::Object(mut map) if map.contains_key("user") => map.remove("user").unwrap_or_default(),
        other => other,
    };
    decode(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_accepts_token_aliases() {
        let session = session_from(json!({"accessToken": "t1"})).unwrap();
        assert_eq!(session.token.expose_secret(), "t1");
        assert!(session.user.is_none());

        let session =
            session_from(json!({"token": "t2", "user": {"_id": "u1", "role": "seller"}})).unwrap();
        let user = session.user.unwrap();
        assert_eq!(user.id.as_str(), "u1");
        assert!(user.role.can_sell());
    }

    #[test]
    fn test_session_without_token_is_decode_error() {
        assert!(matches!(
            session_from(json!({"user": {}})),
            Err(ApiError::Decode(_))
        ));
    }
}
