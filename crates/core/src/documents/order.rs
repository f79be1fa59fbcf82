//! Buyer orders and their per-store suborders.
//!
//! A buyer places one [`Order`]; the backend splits it into one
//! [`StoreOrder`] per seller. Each [`OrderItem`] tracks how many units have
//! been packed, shipped, delivered and canceled independently of the item's
//! overall [`FulfillmentStatus`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::price::{self, Price};
use crate::types::{FulfillmentStatus, OrderId, ProductId, SkuId, StoreId, StoreOrderId, UserId};

/// Buyer-facing aggregate order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, alias = "_id", deserialize_with = "super::null_default")]
    pub id: OrderId,
    #[serde(default, alias = "buyer", deserialize_with = "super::null_default")]
    pub buyer_id: UserId,
    #[serde(default, deserialize_with = "super::null_default")]
    pub status: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub payment_method: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub payment_status: String,
    #[serde(default, alias = "subOrders", deserialize_with = "super::null_default")]
    pub store_orders: Vec<StoreOrder>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default, deserialize_with = "price::lenient")]
    pub total: Price,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// All line items across every suborder.
    pub fn items(&self) -> impl Iterator<Item = &OrderItem> {
        self.store_orders.iter().flat_map(|so| so.items.iter())
    }

    /// Total computed from the suborders, used when the backend omits `total`.
    #[must_use]
    pub fn computed_total(&self) -> Price {
        self.store_orders.iter().map(StoreOrder::total).sum()
    }
}

/// The portion of an order fulfilled by a single store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreOrder {
    #[serde(default, alias = "_id", deserialize_with = "super::null_default")]
    pub id: StoreOrderId,
    #[serde(default, deserialize_with = "super::null_default")]
    pub order_id: OrderId,
    #[serde(default, alias = "store", deserialize_with = "super::null_default")]
    pub store_id: StoreId,
    #[serde(default, deserialize_with = "super::null_default")]
    pub store_name: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub status: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub items: Vec<OrderItem>,
    #[serde(default, deserialize_with = "price::lenient")]
    pub shipping_fee: Price,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl StoreOrder {
    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Subtotal plus shipping.
    #[must_use]
    pub fn total(&self) -> Price {
        self.subtotal() + self.shipping_fee
    }
}

/// One ordered SKU within a suborder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default, alias = "product", deserialize_with = "super::null_default")]
    pub product_id: ProductId,
    #[serde(default, alias = "sku", deserialize_with = "super::null_default")]
    pub sku_id: SkuId,
    #[serde(default, deserialize_with = "super::null_default")]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "super::attributes::deserialize")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "price::lenient")]
    pub unit_price: Price,
    #[serde(default, deserialize_with = "super::null_default")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "super::null_default")]
    pub status: FulfillmentStatus,
    #[serde(flatten)]
    quantities: FulfillmentQuantities,
}

impl OrderItem {
    /// Create an item with explicit fulfillment counters (clamped on read).
    #[must_use]
    pub fn new(
        sku_id: SkuId,
        quantity: u32,
        status: FulfillmentStatus,
        quantities: FulfillmentQuantities,
    ) -> Self {
        Self {
            sku_id,
            quantity,
            status,
            quantities,
            ..Self::default()
        }
    }

    /// Fulfillment counters, clamped so none exceeds the ordered quantity.
    #[must_use]
    pub fn fulfillment(&self) -> FulfillmentQuantities {
        self.quantities.clamped(self.quantity)
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Per-item fulfillment counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentQuantities {
    #[serde(default, rename = "packedQty", deserialize_with = "super::null_default")]
    pub packed: u32,
    #[serde(default, rename = "shippedQty", deserialize_with = "super::null_default")]
    pub shipped: u32,
    #[serde(default, rename = "deliveredQty", deserialize_with = "super::null_default")]
    pub delivered: u32,
    #[serde(default, rename = "canceledQty", alias = "cancelledQty", deserialize_with = "super::null_default")]
    pub canceled: u32,
}

impl FulfillmentQuantities {
    /// Clamp every counter to the ordered quantity.
    #[must_use]
    pub fn clamped(self, ordered: u32) -> Self {
        Self {
            packed: self.packed.min(ordered),
            shipped: self.shipped.min(ordered),
            delivered: self.delivered.min(ordered),
            canceled: self.canceled.min(ordered),
        }
    }

    /// Units neither delivered nor canceled.
    #[must_use]
    pub fn outstanding(self, ordered: u32) -> u32 {
        let q = self.clamped(ordered);
        ordered.saturating_sub(q.delivered.saturating_add(q.canceled))
    }
}

/// Delivery address as the order endpoints read and write it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default, deserialize_with = "super::null_default")]
    pub recipient_name: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(default, deserialize_with = "super::null_default")]
    pub subdistrict: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub district: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub province: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub postal_code: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub country: String,
}

impl ShippingAddress {
    /// Single-line rendering for order summaries.
    #[must_use]
    pub fn one_line(&self) -> String {
        [
            Some(self.line1.as_str()),
            self.line2.as_deref(),
            Some(self.subdistrict.as_str()),
            Some(self.district.as_str()),
            Some(self.province.as_str()),
            Some(self.postal_code.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_order_with_quantities() {
        let order: Order = serde_json::from_str(
            r#"{
                "_id": "o1",
                "storeOrders": [{
                    "_id": "so1",
                    "storeName": "Craft Co",
                    "shippingFee": 40,
                    "items": [{
                        "sku": "s1",
                        "name": "Mug",
                        "unitPrice": "120.00",
                        "quantity": 2,
                        "status": "SHIPPED",
                        "packedQty": 2,
                        "shippedQty": 5
                    }]
                }]
            }"#,
        )
        .unwrap();

        let item = order.items().next().unwrap();
        assert_eq!(item.status, FulfillmentStatus::Shipped);
        assert_eq!(item.fulfillment().packed, 2);
        assert_eq!(item.fulfillment().shipped, 2);
        assert_eq!(order.store_orders[0].subtotal(), Price::from(240));
        assert_eq!(order.computed_total(), Price::from(280));
    }

    #[test]
    fn test_quantities_never_exceed_ordered() {
        let q = FulfillmentQuantities {
            packed: 9,
            shipped: 3,
            delivered: 1,
            canceled: 7,
        };
        let clamped = q.clamped(3);
        assert_eq!(clamped.packed, 3);
        assert_eq!(clamped.shipped, 3);
        assert_eq!(clamped.delivered, 1);
        assert_eq!(clamped.canceled, 3);
        assert_eq!(q.outstanding(3), 0);
        assert_eq!(FulfillmentQuantities::default().outstanding(3), 3);
    }

    #[test]
    fn test_address_one_line_skips_blanks() {
        let address = ShippingAddress {
            recipient_name: "Ploy".to_string(),
            line1: "12 Nimman Rd".to_string(),
            line2: Some(String::new()),
            district: "Mueang".to_string(),
            province: "Chiang Mai".to_string(),
            postal_code: "50200".to_string(),
            ..ShippingAddress::default()
        };
        assert_eq!(address.one_line(), "12 Nimman Rd, Mueang, Chiang Mai, 50200");
    }
}
