//! Display-ready view models built from documents.
//!
//! Every field is already formatted, so templates only interpolate.

use super::attributes::format_attributes;
use super::badge::classify_status;
use super::fulfillment::{FulfillmentSummary, summarize_fulfillment};
use super::image::{ImageCdn, ImageTransform};
use super::price_range::summarize_price_range;
use crate::documents::{Order, OrderItem, Product, PublicStore, StoreOrder};
use crate::types::Price;

const DATE_FORMAT: &str = "%d %b %Y";

// =============================================================================
// Products
// =============================================================================

/// Product tile for listings, search results and store pages.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub category: String,
    /// `"120.00"` or `"120.00–180.00"`.
    pub price: String,
    pub variant_count: usize,
    pub image_url: Option<String>,
    pub status: String,
    pub status_class: &'static str,
    pub in_stock: bool,
}

impl ProductCard {
    /// Build a card from a product document.
    #[must_use]
    pub fn from_product(product: &Product, cdn: &ImageCdn) -> Self {
        let summary = summarize_price_range(&product.skus, product.default_price);
        let status = product.status.as_str();
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category.clone(),
            price: summary.display,
            variant_count: summary.variant_count,
            image_url: cdn.url(product.image.as_deref(), ImageTransform::Thumbnail),
            status: status.to_string(),
            status_class: classify_status(status).badge_class(),
            in_stock: product.skus.is_empty() || product.total_stock() > 0,
        }
    }
}

/// One selectable variant on the product page.
#[derive(Debug, Clone)]
pub struct VariantView {
    pub id: String,
    /// `"color: red · size: M"` or `"—"`.
    pub label: String,
    pub price: String,
    pub stock: u32,
    pub in_stock: bool,
}

/// Product detail page model.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub card: ProductCard,
    pub description: String,
    pub image_url: Option<String>,
    pub variants: Vec<VariantView>,
    pub store: Option<StoreHeaderView>,
}

impl ProductDetail {
    /// Build the detail model; `store` is used when the product does not
    /// carry a populated store.
    #[must_use]
    pub fn from_product(product: &Product, store: Option<&PublicStore>, cdn: &ImageCdn) -> Self {
        let variants = product
            .skus
            .iter()
            .map(|sku| VariantView {
                id: sku.id.to_string(),
                label: format_attributes(&sku.attributes),
                price: sku.effective_price(product.default_price).to_string(),
                stock: sku.stock,
                in_stock: sku.in_stock(),
            })
            .collect();

        let store = product
            .store
            .as_ref()
            .and_then(|r| r.store())
            .or(store)
            .map(|s| StoreHeaderView::from_store(s, cdn));

        Self {
            card: ProductCard::from_product(product, cdn),
            description: product.description.clone(),
            image_url: cdn.url(product.image.as_deref(), ImageTransform::Detail),
            variants,
            store,
        }
    }
}

// =============================================================================
// Stores
// =============================================================================

/// Store header shown on store pages and product pages.
#[derive(Debug, Clone)]
pub struct StoreHeaderView {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub status: String,
    pub status_class: &'static str,
}

impl StoreHeaderView {
    /// Build a header from the public store shape.
    #[must_use]
    pub fn from_store(store: &PublicStore, cdn: &ImageCdn) -> Self {
        let status = store.status.as_str();
        Self {
            id: store.id.to_string(),
            name: store.name.clone(),
            slug: store.slug.clone(),
            description: store.description.clone(),
            logo_url: cdn.url(store.logo.as_deref(), ImageTransform::Avatar),
            banner_url: cdn.url(store.banner.as_deref(), ImageTransform::Banner),
            status: status.to_string(),
            status_class: classify_status(status).badge_class(),
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// One order line with its fulfillment counters.
#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub sku_id: String,
    pub name: String,
    pub attributes: String,
    pub image_url: Option<String>,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
    pub packed: u32,
    pub shipped: u32,
    pub delivered: u32,
    pub canceled: u32,
    pub status: &'static str,
    pub status_class: &'static str,
}

impl OrderItemView {
    fn from_item(item: &OrderItem, cdn: &ImageCdn) -> Self {
        let q = item.fulfillment();
        let status = item.status.as_str();
        Self {
            sku_id: item.sku_id.to_string(),
            name: item.name.clone(),
            attributes: format_attributes(&item.attributes),
            image_url: cdn.url(item.image.as_deref(), ImageTransform::Avatar),
            quantity: item.quantity,
            unit_price: item.unit_price.to_string(),
            line_total: item.line_total().to_string(),
            packed: q.packed,
            shipped: q.shipped,
            delivered: q.delivered,
            canceled: q.canceled,
            status,
            status_class: classify_status(status).badge_class(),
        }
    }
}

/// A store's share of an order, as the buyer or seller sees it.
#[derive(Debug, Clone)]
pub struct StoreOrderView {
    pub id: String,
    pub order_id: String,
    pub store_name: String,
    pub status: String,
    pub status_class: &'static str,
    pub items: Vec<OrderItemView>,
    pub subtotal: String,
    pub shipping_fee: String,
    pub total: String,
    pub tracking_number: Option<String>,
    pub created_at: String,
    pub summary: FulfillmentSummary,
}

impl StoreOrderView {
    /// Build a suborder view.
    #[must_use]
    pub fn from_store_order(store_order: &StoreOrder, cdn: &ImageCdn) -> Self {
        Self {
            id: store_order.id.to_string(),
            order_id: store_order.order_id.to_string(),
            store_name: store_order.store_name.clone(),
            status: store_order.status.clone(),
            status_class: classify_status(&store_order.status).badge_class(),
            items: store_order
                .items
                .iter()
                .map(|item| OrderItemView::from_item(item, cdn))
                .collect(),
            subtotal: store_order.subtotal().to_string(),
            shipping_fee: store_order.shipping_fee.to_string(),
            total: store_order.total().to_string(),
            tracking_number: store_order.tracking_number.clone(),
            created_at: store_order
                .created_at
                .map(|t| t.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            summary: summarize_fulfillment(std::slice::from_ref(store_order)),
        }
    }
}

/// Buyer order summary and detail model.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: String,
    pub created_at: String,
    pub total: String,
    pub payment_method: String,
    pub payment_status: String,
    pub payment_status_class: &'static str,
    pub item_count: u32,
    pub fulfillment: FulfillmentSummary,
    pub fulfillment_label: &'static str,
    pub shipping_address: Option<String>,
    pub store_orders: Vec<StoreOrderView>,
}

impl OrderView {
    /// Build an order view.
    #[must_use]
    pub fn from_order(order: &Order, cdn: &ImageCdn) -> Self {
        let fulfillment = summarize_fulfillment(&order.store_orders);
        let total = if order.total.is_negative() || order.total == Price::ZERO {
            order.computed_total()
        } else {
            order.total
        };

        Self {
            id: order.id.to_string(),
            created_at: order
                .created_at
                .map(|t| t.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            total: total.to_string(),
            payment_method: order.payment_method.clone(),
            payment_status: order.payment_status.clone(),
            payment_status_class: classify_status(&order.payment_status).badge_class(),
            item_count: order
                .items()
                .fold(0, |count: u32, i| count.saturating_add(i.quantity)),
            fulfillment,
            fulfillment_label: fulfillment.label(),
            shipping_address: order.shipping_address.as_ref().map(|a| a.one_line()),
            store_orders: order
                .store_orders
                .iter()
                .map(|so| StoreOrderView::from_store_order(so, cdn))
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cdn() -> ImageCdn {
        ImageCdn::new("demo")
    }

    #[test]
    fn test_product_card_price_and_badge() {
        let product: Product = serde_json::from_str(
            r#"{"id": "p1", "name": "Scarf", "status": "draft", "image": "p/scarf",
                "skus": [{"id": "a", "price": 300, "stock": 0}, {"id": "b", "price": 450, "stock": 0}]}"#,
        )
        .unwrap();
        let card = ProductCard::from_product(&product, &cdn());
        assert_eq!(card.price, "300.00–450.00");
        assert_eq!(card.variant_count, 2);
        assert_eq!(card.status_class, "badge badge-warning");
        assert!(!card.in_stock);
        assert!(card.image_url.unwrap().ends_with("/p/scarf"));
    }

    #[test]
    fn test_product_detail_variant_labels() {
        let product: Product = serde_json::from_str(
            r#"{"id": "p1", "defaultPrice": 90,
                "skus": [{"id": "a", "attributes": {"size": "L", "color": "red"}, "stock": 3},
                         {"id": "b"}]}"#,
        )
        .unwrap();
        let detail = ProductDetail::from_product(&product, None, &cdn());
        assert_eq!(detail.variants[0].label, "color: red · size: L");
        assert_eq!(detail.variants[0].price, "90.00");
        assert_eq!(detail.variants[1].label, "—");
        assert!(!detail.variants[1].in_stock);
        assert!(detail.store.is_none());
    }

    #[test]
    fn test_order_view_totals_and_summary() {
        let order: Order = serde_json::from_str(
            r#"{"id": "o1", "paymentStatus": "paid",
                "storeOrders": [{"id": "so1", "shippingFee": 50, "status": "shipped",
                    "items": [{"name": "Mug", "unitPrice": 100, "quantity": 3, "status": "SHIPPED", "shippedQty": 3}]}]}"#,
        )
        .unwrap();
        let view = OrderView::from_order(&order, &cdn());
        assert_eq!(view.total, "350.00");
        assert_eq!(view.item_count, 3);
        assert!(view.fulfillment.has_shipped);
        assert_eq!(view.payment_status_class, "badge badge-success");

        let so = &view.store_orders[0];
        assert_eq!(so.status_class, "badge badge-info");
        assert_eq!(so.items[0].line_total, "300.00");
        assert_eq!(so.items[0].shipped, 3);
        assert_eq!(so.items[0].status, "SHIPPED");
    }

    #[test]
    fn test_order_view_survives_overflowing_prices() {
        let order: Order = serde_json::from_str(
            r#"{"id": "o2", "storeOrders": [{"id": "so1", "shippingFee": 1,
                "items": [{"name": "Vase", "unitPrice": "79228162514264337593543950335", "quantity": 2},
                          {"name": "Cup", "unitPrice": 5, "quantity": 4294967295}]}]}"#,
        )
        .unwrap();
        let view = OrderView::from_order(&order, &cdn());
        assert_eq!(view.item_count, u32::MAX);
        assert!(view.total.starts_with("79228162514264337593543950335"));
    }
}
