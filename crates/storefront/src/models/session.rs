//! Session-related types.
//!
//! Types stored in the session for authentication state.

use bazaar_core::User;
use secrecy::SecretString;

/// The signed-in account for one request.
///
/// Built by the auth extractors from the session token and the cached
/// profile. The token is forwarded to the backend as a bearer credential.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub user: User,
    pub token: SecretString,
}

impl CurrentSession {
    /// Whether this account may use the seller dashboard.
    #[must_use]
    pub const fn is_seller(&self) -> bool {
        self.user.role.can_sell()
    }
}

/// Session keys for storefront state.
pub mod session_keys {
    /// Key for the backend-issued session token (stored as a plain string).
    pub const SESSION_TOKEN: &str = "session_token";

    /// Key for the profile fetched after login.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the shopping cart.
    pub const CART: &str = "cart";
}
