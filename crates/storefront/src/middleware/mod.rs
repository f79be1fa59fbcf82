//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (record on the span, echo in the response)
//! 4. Security headers (CSP, frame and referrer policy)
//! 5. Session layer (tower-sessions with an in-memory store)
//! 6. Session rejection (sign out when the backend refused the token)

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    AuthRejection, Page, RequireSeller, RequireUser, session_token, sign_in, sign_out,
};
pub use request_id::{RequestId, make_request_span, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{
    SessionRejected, create_session_layer, load_cart, session_rejection_middleware, store_cart,
};
