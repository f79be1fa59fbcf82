//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side failures to
//! Sentry before responding. Route handlers return `Result<T, AppError>`.
//!
//! Backend failures map as follows:
//! - 401/403: the session token is no longer valid; the browser is signed
//!   out (see [`SessionRejected`]) and sent to the login page
//! - 404: the not-found page
//! - other 4xx: the backend's message, with the backend's status
//! - 5xx and transport failures: 502

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::api::ApiError;
use crate::filters;
use crate::middleware::SessionRejected;
use crate::models::Nav;

/// Shown instead of transport details when the backend is unreachable.
const UNAVAILABLE_MESSAGE: &str = "The marketplace is unavailable right now. Please try again.";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend call failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Session store failure.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error page template.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub nav: Nav,
    pub status: u16,
    pub title: String,
    pub message: String,
}

impl AppError {
    /// Status code sent to the browser.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Api(err) => match err.status() {
                Some(status) if status == StatusCode::NOT_FOUND => StatusCode::NOT_FOUND,
                Some(status) if status.is_client_error() => status,
                Some(_) | None => StatusCode::BAD_GATEWAY,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the failure is ours (or the backend's) rather than the visitor's.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Whether the backend rejected the session token.
    #[must_use]
    pub fn is_session_rejection(&self) -> bool {
        matches!(self, Self::Api(err) if err.is_auth_rejection() || matches!(err, ApiError::InvalidCredential))
    }

    /// Message that is safe to show the visitor.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Api(ApiError::Status { status, .. }) if *status == StatusCode::NOT_FOUND => {
                "We couldn't find what you were looking for.".to_string()
            }
            Self::Api(ApiError::Status { message, .. }) => message.clone(),
            Self::Api(_) => UNAVAILABLE_MESSAGE.to_string(),
            Self::NotFound(_) => "We couldn't find what you were looking for.".to_string(),
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Unauthorized(msg) | Self::Forbidden(msg) | Self::BadRequest(msg) => msg.clone(),
        }
    }
}

fn title_for(status: StatusCode) -> String {
    match status {
        StatusCode::NOT_FOUND => "Page not found".to_string(),
        StatusCode::BAD_GATEWAY => "Service unavailable".to_string(),
        other => other
            .canonical_reason()
            .unwrap_or("Something went wrong")
            .to_string(),
    }
}

/// Render the error page, falling back to plain text.
#[must_use]
pub fn error_page(status: StatusCode, message: String) -> Response {
    let page = ErrorTemplate {
        nav: Nav::default(),
        status: status.as_u16(),
        title: title_for(status),
        message,
    };

    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render error page");
            (status, page.message).into_response()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_session_rejection() {
            tracing::info!(error = %self, "Backend rejected session, signing out");
            let mut response = Redirect::to("/auth/login").into_response();
            response.extensions_mut().insert(SessionRejected);
            return response;
        }

        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        error_page(self.status_code(), self.public_message())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("sku_id", "s1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(status: StatusCode, message: &str) -> AppError {
        AppError::Api(ApiError::Status {
            status,
            message: message.to_string(),
        })
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(backend(StatusCode::NOT_FOUND, "Product not found")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(backend(StatusCode::UNPROCESSABLE_ENTITY, "Out of stock")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(backend(StatusCode::INTERNAL_SERVER_ERROR, "boom")),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_backend_message_shown_verbatim() {
        let err = backend(StatusCode::CONFLICT, "Store slug already taken");
        assert_eq!(err.public_message(), "Store slug already taken");

        let err = AppError::Internal("db password leaked".to_string());
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_rejected_session_redirects_and_marks_response() {
        let response = backend(StatusCode::UNAUTHORIZED, "jwt expired").into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/auth/login");
        assert!(response.extensions().get::<SessionRejected>().is_some());

        let response = backend(StatusCode::FORBIDDEN, "not yours").into_response();
        assert!(response.extensions().get::<SessionRejected>().is_some());
    }
}
