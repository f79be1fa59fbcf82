//! Store documents.
//!
//! [`Store`] is the seller-only shape returned by the session-gated store
//! endpoint and includes banking details. [`PublicStore`] is what buyers
//! see; it has no banking field at all, so it cannot leak one.

use serde::{Deserialize, Serialize};

use crate::types::{StoreId, StoreStatus, UserId};

/// Public projection of a seller store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicStore {
    #[serde(default, alias = "_id", deserialize_with = "super::null_default")]
    pub id: StoreId,
    #[serde(default, deserialize_with = "super::null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub status: StoreStatus,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub banner: Option<String>,
}

/// Full store document, visible only to its owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    #[serde(default, alias = "_id", deserialize_with = "super::null_default")]
    pub id: StoreId,
    #[serde(default, deserialize_with = "super::null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub status: StoreStatus,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default, alias = "owner", deserialize_with = "super::null_default")]
    pub owner_id: UserId,
    #[serde(default, alias = "bankAccount")]
    pub banking: Option<BankingDetails>,
}

impl Store {
    /// Project to the buyer-facing shape, dropping banking details.
    #[must_use]
    pub fn to_public(&self) -> PublicStore {
        PublicStore {
            id: self.id.clone(),
            name: self.name.clone(),
            slug: self.slug.clone(),
            description: self.description.clone(),
            status: self.status,
            logo: self.logo.clone(),
            banner: self.banner.clone(),
        }
    }
}

impl From<Store> for PublicStore {
    fn from(store: Store) -> Self {
        Self {
            id: store.id,
            name: store.name,
            slug: store.slug,
            description: store.description,
            status: store.status,
            logo: store.logo,
            banner: store.banner,
        }
    }
}

/// Payout bank account for a store.
///
/// Implements `Debug` manually to redact the account number.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankingDetails {
    #[serde(default, deserialize_with = "super::null_default")]
    pub bank_name: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub account_name: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub account_number: String,
}

impl BankingDetails {
    /// Account number with all but the last four digits masked.
    #[must_use]
    pub fn masked_account_number(&self) -> String {
        let digits: Vec<char> = self
            .account_number
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();
        let visible = digits.len().saturating_sub(4);
        digits
            .iter()
            .enumerate()
            .map(|(i, c)| if i < visible { '•' } else { *c })
            .collect()
    }
}

impl std::fmt::Debug for BankingDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BankingDetails")
            .field("bank_name", &self.bank_name)
            .field("account_name", &self.account_name)
            .field("account_number", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn seller_store() -> Store {
        serde_json::from_str(
            r#"{
                "_id": "st1",
                "name": "Chiang Mai Ceramics",
                "slug": "cm-ceramics",
                "status": "approved",
                "owner": "u9",
                "bankAccount": {"bankName": "KBank", "accountName": "CM Ceramics", "accountNumber": "123-4-56789-0"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_public_projection_has_no_banking() {
        let store = seller_store();
        assert!(store.banking.is_some());

        let public = serde_json::to_value(store.to_public()).unwrap();
        let text = public.to_string();
        assert!(!text.contains("123-4-56789-0"));
        assert!(public.get("banking").is_none());
        assert_eq!(public["slug"], "cm-ceramics");
    }

    #[test]
    fn test_masked_account_number() {
        let banking = seller_store().banking.unwrap();
        assert_eq!(banking.masked_account_number(), "••••••7890");
    }

    #[test]
    fn test_banking_debug_redacts_number() {
        let banking = seller_store().banking.unwrap();
        let debug = format!("{banking:?}");
        assert!(debug.contains("KBank"));
        assert!(!debug.contains("56789"));
    }
}
