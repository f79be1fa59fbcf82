//! Authentication route handlers.
//!
//! Login and registration are delegated to the backend, which issues the
//! session token. The token and the profile are then kept in the server
//! session; the browser only ever holds the session cookie.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use bazaar_core::Email;
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::{self, ApiError, auth::AuthSession, auth::Registration};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{Page, session_token, sign_in, sign_out};
use crate::models::Nav;
use crate::state::AppState;

/// Minimum password length accepted at registration.
const MIN_PASSWORD_LENGTH: usize = 8;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub nav: Nav,
    pub email: String,
    pub error: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub nav: Nav,
    pub name: String,
    pub email: String,
    pub error: Option<String>,
}

/// Backend answers that should be shown on the form rather than as an
/// error page: bad credentials, email taken, weak password.
fn form_error(err: ApiError) -> std::result::Result<String, AppError> {
    match err {
        ApiError::Status { status, message } if status.is_client_error() => Ok(message),
        other => Err(AppError::Api(other)),
    }
}

/// Keep the token and profile in the session.
async fn establish(state: &AppState, session: &Session, issued: AuthSession) -> Result<()> {
    let user = match issued.user {
        Some(user) => user,
        None => state.profile(&issued.token).await?,
    };
    sign_in(session, &issued.token, &user).await?;
    tracing::info!(user_id = %user.id, role = %user.role, "Signed in");
    Ok(())
}

fn validate_registration(form: &RegisterForm) -> Option<String> {
    if form.name.trim().is_empty() {
        return Some("Please enter your name".to_string());
    }
    if let Err(e) = Email::parse(form.email.trim()) {
        return Some(format!("Invalid email address: {e}"));
    }
    if form.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Some(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        ));
    }
    if form.password != form.password_confirm {
        return Some("Passwords do not match".to_string());
    }
    None
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(page: Page) -> Response {
    if page.nav.signed_in() {
        return Redirect::to("/").into_response();
    }
    LoginTemplate {
        nav: page.nav,
        email: String::new(),
        error: None,
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    page: Page,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let password = SecretString::from(form.password);
    match api::auth::login(state.api(), &form.email, &password).await {
        Ok(issued) => {
            establish(&state, &session, issued).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            let message = form_error(e)?;
            tracing::info!("Login rejected");
            Ok((
                StatusCode::UNAUTHORIZED,
                LoginTemplate {
                    nav: page.nav,
                    email: form.email,
                    error: Some(message),
                },
            )
                .into_response())
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(page: Page) -> Response {
    if page.nav.signed_in() {
        return Redirect::to("/").into_response();
    }
    RegisterTemplate {
        nav: page.nav,
        name: String::new(),
        email: String::new(),
        error: None,
    }
    .into_response()
}

/// Handle registration form submission.
///
/// A successful registration signs the new account in straight away.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    page: Page,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let rerender = |nav: Nav, form: RegisterForm, error: String| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            RegisterTemplate {
                nav,
                name: form.name,
                email: form.email,
                error: Some(error),
            },
        )
            .into_response()
    };

    if let Some(error) = validate_registration(&form) {
        return Ok(rerender(page.nav, form, error));
    }

    let registration = Registration {
        name: form.name.clone(),
        email: form.email.clone(),
        password: SecretString::from(form.password.clone()),
    };

    match api::auth::register(state.api(), &registration).await {
        Ok(issued) => {
            establish(&state, &session, issued).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            let message = form_error(e)?;
            tracing::info!("Registration rejected");
            Ok(rerender(page.nav, form, message))
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Sign out and return home. The cart is kept.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    if let Some(token) = session_token(&session).await {
        state.forget_profile(&token).await;
    }
    sign_out(&session).await?;
    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            password_confirm: confirm.to_string(),
        }
    }

    #[test]
    fn test_registration_validation() {
        assert!(validate_registration(&form("Mali", "mali@example.com", "longenough", "longenough")).is_none());
        assert_eq!(
            validate_registration(&form("Mali", "mali@example.com", "short", "short")).as_deref(),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(
            validate_registration(&form("Mali", "mali@example.com", "longenough", "different")).as_deref(),
            Some("Passwords do not match")
        );
        assert!(validate_registration(&form("Mali", "not-an-email", "longenough", "longenough")).is_some());
        assert!(validate_registration(&form(" ", "mali@example.com", "longenough", "longenough")).is_some());
    }

    #[test]
    fn test_client_errors_stay_on_the_form() {
        let err = ApiError::Status {
            status: StatusCode::UNAUTHORIZED,
            message: "Invalid email or password".to_string(),
        };
        assert_eq!(form_error(err).unwrap_or_default(), "Invalid email or password");

        let err = ApiError::Status {
            status: StatusCode::BAD_GATEWAY,
            message: "upstream".to_string(),
        };
        assert!(form_error(err).is_err());
    }
}
