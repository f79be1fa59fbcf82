//! Account identity and notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{NotificationId, Role, StoreId, UserId};

/// Authenticated account profile.
///
/// Fetched once per browser session from the profile endpoint and kept in
/// the session; nothing about it is persisted by the storefront.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, alias = "_id", deserialize_with = "super::null_default")]
    pub id: UserId,
    #[serde(default, deserialize_with = "super::null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub email: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub role: Role,
    #[serde(default)]
    pub avatar: Option<String>,
    /// Store owned by a seller account.
    #[serde(default, alias = "store")]
    pub store_id: Option<StoreId>,
}

impl User {
    /// Name to greet the user with, falling back to the email's local part.
    #[must_use]
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if !name.is_empty() {
            return name;
        }
        self.email.split('@').next().unwrap_or("")
    }
}

/// A server-pushed notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default, alias = "_id", deserialize_with = "super::null_default")]
    pub id: NotificationId,
    /// Event kind, e.g. `order.created` or `store.approved`.
    #[serde(default, rename = "type", deserialize_with = "super::null_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub message: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "super::null_default")]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
