//! Session-held models for the storefront.
//!
//! The backend owns every entity. What lives here is per-browser state kept
//! in the session: the signed-in account and the cart.

pub mod cart;
pub mod nav;
pub mod session;

pub use cart::{Cart, CartItem, MAX_LINE_QUANTITY};
pub use nav::{Breadcrumb, Nav, Tab, dashboard_tabs};
pub use session::{CurrentSession, session_keys};
