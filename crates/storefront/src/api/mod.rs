//! Marketplace backend API.
//!
//! # Architecture
//!
//! - The backend owns all persistent state; the storefront keeps nothing
//! - [`ApiClient`] is a thin JSON wrapper with no retries or timeouts
//! - Endpoint modules normalize `_id` keys before decoding into core
//!   document types, so templates only ever see `id`
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_storefront::api::{ApiClient, products};
//!
//! let client = ApiClient::new(config.backend.base_url.clone());
//! let product = products::get(&client, &ProductId::new("665f1c2a")).await?;
//! ```

mod client;

pub mod auth;
pub mod orders;
pub mod products;
pub mod search;
pub mod stores;

pub use client::{ApiClient, ApiError, FALLBACK_ERROR_MESSAGE, RequestOptions, error_message};

use bazaar_core::view::normalize_ids;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Keys a backend may wrap list responses in.
const LIST_ENVELOPES: &[&str] = &["items", "data", "results"];

/// Normalize identifiers and decode a backend document.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    Ok(serde_json::from_value(normalize_ids(value))?)
}

/// Decode a list that may arrive bare or wrapped in an envelope object.
pub(crate) fn decode_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, ApiError> {
    let list = match value {
        Value::Object(mut map) => LIST_ENVELOPES
            .iter()
            .find_map(|key| map.remove(*key).filter(Value::is_array))
            .unwrap_or_else(|| Value::Array(Vec::new())),
        Value::Null => Value::Array(Vec::new()),
        other => other,
    };
    decode(list)
}

/// Build `path?k=v&...`, skipping empty values.
pub(crate) fn with_query(path: &str, params: &[(&str, Option<&str>)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in params {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            serializer.append_pair(key, value);
            any = true;
        }
    }
    if any {
        format!("{path}?{}", serializer.finish())
    } else {
        path.to_string()
    }
}

/// Percent-encode a single path segment.
pub(crate) fn segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::Product;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_normalizes_ids() {
        let product: Product =
            decode(json!({"_id": {"$oid": "p1"}, "variants": [{"_id": "s1"}]})).unwrap();
        assert_eq!(product.id.as_str(), "p1");
        assert_eq!(product.skus[0].id.as_str(), "s1");
    }

    #[test]
    fn test_decode_list_accepts_envelopes() {
        let bare: Vec<Product> = decode_list(json!([{"_id": "a"}])).unwrap();
        let wrapped: Vec<Product> = decode_list(json!({"items": [{"_id": "a"}], "total": 1})).unwrap();
        let data: Vec<Product> = decode_list(json!({"data": [{"_id": "a"}]})).unwrap();
        assert_eq!(bare.len(), 1);
        assert_eq!(wrapped[0].id.as_str(), "a");
        assert_eq!(data.len(), 1);
        assert!(decode_list::<Product>(json!({"total": 0})).unwrap().is_empty());
        assert!(decode_list::<Product>(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_with_query_skips_blanks() {
        assert_eq!(with_query("products", &[("category", None)]), "products");
        assert_eq!(
            with_query("search", &[("q", Some("teak bowl")), ("page", Some(" "))]),
            "search?q=teak+bowl"
        );
    }

    #[test]
    fn test_segment_escapes_reserved() {
        assert_eq!(segment("craft co/1"), "craft%20co%2F1");
        assert_eq!(segment("665f1c2a"), "665f1c2a");
    }
}
