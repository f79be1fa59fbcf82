//! Integration test harness for the Bazaar storefront.
//!
//! Tests run the real storefront router against an in-process mock of the
//! marketplace backend. Both listen on `127.0.0.1:0`, so nothing outside
//! the test process is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let backend = MockBackend::start(
//!     Router::new().route("/products", get(|| async { Json(json!([])) })),
//! )
//! .await;
//! let storefront = TestStorefront::start(&backend).await;
//! let resp = storefront.client.get(storefront.url("/")).send().await?;
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use axum::Router;
use bazaar_storefront::api::ApiClient;
use bazaar_storefront::config::{BackendConfig, PublicKeys, StorefrontConfig};
use bazaar_storefront::state::AppState;
use secrecy::SecretString;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Image CDN cloud used by test configs.
pub const TEST_CDN_CLOUD: &str = "bazaar-test";

/// Serve `router` on an ephemeral local port.
async fn serve(router: Router) -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no local address");
    let task = tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });
    (addr, task)
}

/// In-process stand-in for the marketplace backend.
///
/// Routes are mounted under `/api`, matching the base URL the storefront is
/// configured with.
pub struct MockBackend {
    pub base_url: Url,
    task: JoinHandle<()>,
}

impl MockBackend {
    /// Start the mock with the given backend routes.
    pub async fn start(routes: Router) -> Self {
        let (addr, task) = serve(Router::new().nest("/api", routes)).await;
        let base_url = Url::parse(&format!("http://{addr}/api/")).expect("Invalid mock URL");
        Self { base_url, task }
    }

    /// An API client pointed at this mock.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.base_url.clone())
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Storefront config for a backend at `backend_url`.
#[must_use]
pub fn test_config(backend_url: Url) -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        session_secret: SecretString::from("integration-session-secret-0123456789abcdef"),
        backend: BackendConfig {
            base_url: backend_url,
            notification_retry: Duration::from_millis(50),
        },
        public_keys: PublicKeys {
            image_cdn_cloud: TEST_CDN_CLOUD.to_string(),
            payment_public_key: "pk_test_bazaar".to_string(),
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// A running storefront plus a cookie-keeping client that does not follow
/// redirects.
pub struct TestStorefront {
    pub client: reqwest::Client,
    addr: SocketAddr,
    task: JoinHandle<()>,
}

impl TestStorefront {
    /// Start the storefront against `backend`.
    pub async fn start(backend: &MockBackend) -> Self {
        let state = AppState::new(test_config(backend.base_url.clone()));
        let (addr, task) = serve(bazaar_storefront::app(state)).await;
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");
        Self { client, addr, task }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Sign in through the login form.
    pub async fn sign_in(&self, email: &str) -> reqwest::Response {
        self.client
            .post(self.url("/auth/login"))
            .form(&[("email", email), ("password", "correct horse battery")])
            .send()
            .await
            .expect("Login request failed")
    }
}

impl Drop for TestStorefront {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(response: &reqwest::Response) -> Option<&str> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
}
