//! Read-only mirrors of backend documents.
//!
//! The backend owns every entity; the storefront only ever holds these
//! projections. Field names follow the backend's camelCase JSON and every
//! optional field has a serde default, so a partial document still decodes.
//! An explicit `null` is treated the same as a missing key.
//! Identifiers are accepted as `id` or as the database-native `_id`.

mod attributes;
pub mod order;
pub mod product;
pub mod search;
pub mod store;
pub mod user;

use serde::{Deserialize, Deserializer};

pub use order::{FulfillmentQuantities, Order, OrderItem, ShippingAddress, StoreOrder};
pub use product::{Product, SkuVariant, StoreRef};
pub use search::SearchResults;
pub use store::{BankingDetails, PublicStore, Store};
pub use user::{Notification, User};

/// Deserialize a field, mapping an explicit `null` to the type's default.
///
/// `#[serde(default)]` only covers missing keys; pair it with this so
/// `"description": null` decodes like an absent description.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
