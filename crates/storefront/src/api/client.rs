//! JSON-over-HTTP wrapper for the marketplace backend.
//!
//! Every backend call goes through [`ApiClient::request`]: one request, no
//! retries, no timeout. Non-success responses become [`ApiError::Status`]
//! carrying the backend's own message so handlers can show it verbatim.

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;
use url::Url;

/// Message used when an error response carries no readable message.
pub const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong";

/// Errors from backend calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    ///
    /// Displays as the message alone.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// The request never produced a response.
    #[error("Backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the expected JSON shape.
    #[error("Unexpected backend response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The endpoint path could not be joined onto the base URL.
    #[error("Invalid backend URL: {0}")]
    Url(#[from] url::ParseError),

    /// The credential cannot be sent as a header.
    #[error("Invalid credential header")]
    InvalidCredential,
}

impl ApiError {
    /// HTTP status, when the backend answered.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend rejected the session credential.
    #[must_use]
    pub fn is_auth_rejection(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        )
    }

    /// Whether the backend reported a missing resource.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

/// Per-request options.
///
/// The default is a GET with no body and no extra headers.
#[derive(Debug)]
pub struct RequestOptions<'a, B: ?Sized = ()> {
    pub method: Method,
    pub body: Option<&'a B>,
    pub headers: HeaderMap,
}

impl<B: ?Sized> Default for RequestOptions<'_, B> {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: HeaderMap::new(),
        }
    }
}

impl<'a, B: ?Sized> RequestOptions<'a, B> {
    /// Options for the given method.
    #[must_use]
    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn body(mut self, body: &'a B) -> Self {
        self.body = Some(body);
        self
    }

    /// Send the session token as a bearer credential.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidCredential` if the token contains bytes
    /// that are not allowed in a header value.
    pub fn bearer(mut self, token: Option<&SecretString>) -> Result<Self, ApiError> {
        if let Some(token) = token {
            self.headers.insert(AUTHORIZATION, bearer_header(token)?);
        }
        Ok(self)
    }
}

/// Whether a body may be sent with this method.
fn is_write(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Build an `Authorization: Bearer` header value.
pub(crate) fn bearer_header(token: &SecretString) -> Result<HeaderValue, ApiError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
        .map_err(|_| ApiError::InvalidCredential)?;
    value.set_sensitive(true);
    Ok(value)
}

/// Pull a human-readable message out of an error body.
///
/// Reads `message` first (a string, or a list of strings joined with
/// `", "`), then `error`. Anything else yields the fallback.
#[must_use]
pub fn error_message(body: &[u8]) -> String {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return FALLBACK_ERROR_MESSAGE.to_string();
    };

    let from_field = |field: &str| -> Option<String> {
        match value.get(field)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Array(items) => {
                let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
                (!parts.is_empty()).then(|| parts.join(", "))
            }
            _ => None,
        }
    };

    from_field("message")
        .or_else(|| from_field("error"))
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string())
}

/// Marketplace backend client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// `base_url` should end with `/` so relative paths join beneath it.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_default();

        Self {
            inner: Arc::new(ApiClientInner { http, base_url }),
        }
    }

    /// The configured backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve an endpoint path against the base URL.
    ///
    /// Leading slashes are ignored so `"/products"` and `"products"` both
    /// land under the base path. Absolute URLs are used as-is.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Url` if the path cannot be joined.
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Perform one request and decode the JSON response.
    ///
    /// The body is serialized only for POST, PUT, PATCH and DELETE. An empty
    /// success body decodes as JSON `null`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the backend's message for non-success
    /// responses, `ApiError::Transport` when no response arrives, and
    /// `ApiError::Decode` when the body does not match `T`.
    #[instrument(skip(self, options), fields(method = %options.method))]
    pub async fn request<T, B>(&self, path: &str, options: RequestOptions<'_, B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let mut builder = self
            .inner
            .http
            .request(options.method.clone(), url)
            .headers(options.headers);

        if let Some(body) = options.body.filter(|_| is_write(&options.method)) {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = error_message(&bytes);
            tracing::debug!(%status, %message, "Backend returned an error");
            return Err(ApiError::Status { status, message });
        }

        let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        Ok(serde_json::from_slice(body)?)
    }

    /// Open a long-lived streaming response.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::request`], minus decoding.
    #[instrument(skip(self, token))]
    pub async fn open_stream(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut builder = self
            .inner
            .http
            .get(self.url(path)?)
            .header(ACCEPT, "text/event-stream");
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, bearer_header(token)?);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let bytes = response.bytes().await?;
            return Err(ApiError::Status {
                status,
                message: error_message(&bytes),
            });
        }
        Ok(response)
    }

    /// GET `path`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        let options = RequestOptions::<()>::default().bearer(token)?;
        self.request(path, options).await
    }

    /// POST `body` to `path`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post<T, B>(&self, path: &str, body: &B, token: Option<&SecretString>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let options = RequestOptions::method(Method::POST).body(body).bearer(token)?;
        self.request(path, options).await
    }

    /// PUT `body` to `path`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn put<T, B>(&self, path: &str, body: &B, token: Option<&SecretString>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let options = RequestOptions::method(Method::PUT).body(body).bearer(token)?;
        self.request(path, options).await
    }

    /// DELETE `path`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        let options = RequestOptions::<()>::method(Method::DELETE).bearer(token)?;
        self.request(path, options).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_message_field() {
        assert_eq!(error_message(br#"{"message": "Not found"}"#), "Not found");
        assert_eq!(
            error_message(br#"{"message": "Stock too low", "error": "Bad Request"}"#),
            "Stock too low"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_error_field() {
        assert_eq!(error_message(br#"{"error": "Forbidden"}"#), "Forbidden");
        assert_eq!(error_message(br#"{"message": "", "error": "Forbidden"}"#), "Forbidden");
    }

    #[test]
    fn test_error_message_joins_message_lists() {
        assert_eq!(
            error_message(br#"{"message": ["name is required", "price must be positive"]}"#),
            "name is required, price must be positive"
        );
    }

    #[test]
    fn test_error_message_unparsable_body() {
        assert_eq!(error_message(b"<html>502</html>"), FALLBACK_ERROR_MESSAGE);
        assert_eq!(error_message(b""), FALLBACK_ERROR_MESSAGE);
        assert_eq!(error_message(br#"{"detail": "x"}"#), FALLBACK_ERROR_MESSAGE);
    }

    #[test]
    fn test_status_error_displays_message_only() {
        let err = ApiError::Status {
            status: StatusCode::NOT_FOUND,
            message: "Not found".to_string(),
        };
        assert_eq!(err.to_string(), "Not found");
        assert!(err.is_not_found());
        assert!(!err.is_auth_rejection());
    }

    #[test]
    fn test_only_writes_carry_bodies() {
        assert!(!is_write(&Method::GET));
        assert!(!is_write(&Method::HEAD));
        assert!(is_write(&Method::POST));
        assert!(is_write(&Method::DELETE));
    }

    #[test]
    fn test_url_joins_under_base_path() {
        let client = ApiClient::new(Url::parse("http://localhost:4000/api/").unwrap());
        assert_eq!(
            client.url("/products/p1").unwrap().as_str(),
            "http://localhost:4000/api/products/p1"
        );
        assert_eq!(
            client.url("search?q=teak%20bowl").unwrap().as_str(),
            "http://localhost:4000/api/search?q=teak%20bowl"
        );
    }

    #[test]
    fn test_bearer_header_is_sensitive() {
        let header = bearer_header(&SecretString::from("tok_123")).unwrap();
        assert!(header.is_sensitive());
        assert_eq!(header.to_str().unwrap(), "Bearer tok_123");
        assert!(matches!(
            bearer_header(&SecretString::from("bad\ntoken")),
            Err(ApiError::InvalidCredential)
        ));
    }

    #[test]
    fn test_default_options_are_get() {
        let options = RequestOptions::<()>::default();
        assert_eq!(options.method, Method::GET);
        assert!(options.body.is_none());
        assert!(options.headers.is_empty());
    }

    #[test]
    fn test_api_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<ApiClient>();
    }
}
