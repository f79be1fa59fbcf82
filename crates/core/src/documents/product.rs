//! Product and SKU variant documents.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::store::PublicStore;
use crate::types::price::{self, Price};
use crate::types::{ProductId, ProductStatus, SkuId, StoreId};

/// A product listed by a store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, alias = "_id", deserialize_with = "super::null_default")]
    pub id: ProductId,
    #[serde(default, deserialize_with = "super::null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub category: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub status: ProductStatus,
    /// Image CDN public id, or an absolute URL for legacy uploads.
    #[serde(default)]
    pub image: Option<String>,
    /// Price used when no variant carries its own price.
    #[serde(default, deserialize_with = "price::lenient")]
    pub default_price: Price,
    /// Owning store, either as a bare id or populated by the backend.
    #[serde(default)]
    pub store: Option<StoreRef>,
    #[serde(default, alias = "variants", deserialize_with = "super::null_default")]
    pub skus: Vec<SkuVariant>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Find a variant by id.
    #[must_use]
    pub fn sku(&self, id: &SkuId) -> Option<&SkuVariant> {
        self.skus.iter().find(|s| &s.id == id)
    }

    /// Total stock across all variants.
    #[must_use]
    pub fn total_stock(&self) -> u32 {
        self.skus
            .iter()
            .fold(0, |total, s| total.saturating_add(s.stock))
    }

    /// The owning store's id, whichever shape the backend sent.
    #[must_use]
    pub fn store_id(&self) -> Option<&StoreId> {
        self.store.as_ref().map(StoreRef::id)
    }
}

/// A specific purchasable configuration of a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuVariant {
    #[serde(default, alias = "_id", deserialize_with = "super::null_default")]
    pub id: SkuId,
    /// Attribute combination, e.g. `{"color": "red", "size": "M"}`.
    #[serde(default, deserialize_with = "super::attributes::deserialize")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "price::lenient_option")]
    pub price: Option<Price>,
    #[serde(default, deserialize_with = "super::null_default")]
    pub stock: u32,
    #[serde(default)]
    pub sku_code: Option<String>,
}

impl SkuVariant {
    /// The price a buyer pays for this variant.
    #[must_use]
    pub fn effective_price(&self, default_price: Price) -> Price {
        self.price.unwrap_or(default_price)
    }

    /// Whether at least one unit can be ordered.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Reference from a product to its store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreRef {
    /// Bare identifier.
    Id(StoreId),
    /// Store document populated inline.
    Store(Box<PublicStore>),
}

impl StoreRef {
    /// The referenced store's id.
    #[must_use]
    pub fn id(&self) -> &StoreId {
        match self {
            Self::Id(id) => id,
            Self::Store(store) => &store.id,
        }
    }

    /// The populated store, if the backend sent one.
    #[must_use]
    pub fn store(&self) -> Option<&PublicStore> {
        match self {
            Self::Id(_) => None,
            Self::Store(store) => Some(store),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_partial_product() {
        let product: Product = serde_json::from_str(
            r#"{
                "_id": "p1",
                "name": "Teak bowl",
                "defaultPrice": "350",
                "variants": [
                    {"_id": "s1", "attributes": {"size": 20, "finish": "oiled"}, "price": 390},
                    {"_id": "s2", "price": "oops", "stock": 4}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(product.id.as_str(), "p1");
        assert_eq!(product.default_price, Price::from(350));
        assert_eq!(product.skus.len(), 2);
        assert_eq!(product.skus[0].attributes["size"], "20");
        assert_eq!(product.skus[0].price, Some(Price::from(390)));
        assert!(product.skus[1].price.is_none());
        assert_eq!(product.total_stock(), 4);
        assert_eq!(product.status, ProductStatus::Active);
    }

    #[test]
    fn test_store_ref_accepts_id_or_document() {
        let product: Product = serde_json::from_str(r#"{"store": "st1"}"#).unwrap();
        assert_eq!(product.store_id().unwrap().as_str(), "st1");
        assert!(product.store.as_ref().unwrap().store().is_none());

        let product: Product =
            serde_json::from_str(r#"{"store": {"id": "st2", "name": "Craft Co", "slug": "craft-co"}}"#)
                .unwrap();
        assert_eq!(product.store_id().unwrap().as_str(), "st2");
        assert_eq!(product.store.unwrap().store().unwrap().name, "Craft Co");
    }

    #[test]
    fn test_effective_price_falls_back_to_default() {
        let sku = SkuVariant::default();
        assert_eq!(sku.effective_price(Price::from(99)), Price::from(99));
        assert!(!sku.in_stock());
    }
}
