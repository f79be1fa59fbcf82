//! Seller store profile payload.

use serde::{Deserialize, Serialize};

use crate::documents::{BankingDetails, Store};

/// Store settings form.
///
/// The account number field is rendered empty (the current number is only
/// shown masked), so an empty submission means "keep the current account".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreProfileForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub banner: String,
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub account_number: String,
}

impl StoreProfileForm {
    /// Prefill from the seller's store. The account number is left blank.
    #[must_use]
    pub fn from_store(store: &Store) -> Self {
        let banking = store.banking.clone().unwrap_or_default();
        Self {
            name: store.name.clone(),
            description: store.description.clone(),
            logo: store.logo.clone().unwrap_or_default(),
            banner: store.banner.clone().unwrap_or_default(),
            bank_name: banking.bank_name,
            account_name: banking.account_name,
            account_number: String::new(),
        }
    }
}

/// Body of `PUT /stores/me`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreProfilePayload {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banking: Option<BankingDetails>,
}

/// Build the profile update body.
///
/// Banking details are sent only when a new account number was entered;
/// spaces and dashes in the number are removed.
#[must_use]
pub fn build_store_profile(form: &StoreProfileForm) -> StoreProfilePayload {
    let account_number: String = form
        .account_number
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    let banking = (!account_number.is_empty()).then(|| BankingDetails {
        bank_name: form.bank_name.trim().to_string(),
        account_name: form.account_name.trim().to_string(),
        account_number,
    });

    StoreProfilePayload {
        name: form.name.trim().to_string(),
        description: form.description.trim().to_string(),
        logo: Some(form.logo.trim().to_string()).filter(|s| !s.is_empty()),
        banner: Some(form.banner.trim().to_string()).filter(|s| !s.is_empty()),
        banking,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_account_number_keeps_banking_out() {
        let form = StoreProfileForm {
            name: " Craft Co ".to_string(),
            bank_name: "KBank".to_string(),
            ..StoreProfileForm::default()
        };
        let payload = serde_json::to_value(build_store_profile(&form)).unwrap();
        assert_eq!(payload["name"], "Craft Co");
        assert!(payload.get("banking").is_none());
        assert!(payload.get("logo").is_none());
    }

    #[test]
    fn test_new_account_number_is_normalized() {
        let form = StoreProfileForm {
            bank_name: "KBank".to_string(),
            account_name: "Craft Co".to_string(),
            account_number: "123-4 56789-0".to_string(),
            ..StoreProfileForm::default()
        };
        let payload = build_store_profile(&form);
        assert_eq!(payload.banking.unwrap().account_number, "1234567890");
    }

    #[test]
    fn test_prefill_never_exposes_account_number() {
        let store = Store {
            name: "Craft Co".to_string(),
            banking: Some(BankingDetails {
                bank_name: "KBank".to_string(),
                account_name: "Craft Co".to_string(),
                account_number: "1234567890".to_string(),
            }),
            ..Store::default()
        };
        let form = StoreProfileForm::from_store(&store);
        assert_eq!(form.bank_name, "KBank");
        assert!(form.account_number.is_empty());
    }
}
