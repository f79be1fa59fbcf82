//! View-model mappers.
//!
//! Pure, synchronous, total functions that turn backend documents into
//! display-ready values. None of them can fail: missing or malformed input
//! degrades to an empty string, zero, or a neutral category.

mod attributes;
mod badge;
mod cards;
mod fulfillment;
mod ids;
mod image;
mod price_range;

pub use attributes::{ATTRIBUTE_SEPARATOR, EMPTY_ATTRIBUTES, format_attributes};
pub use badge::{BadgeTone, classify_status};
pub use cards::{
    OrderItemView, OrderView, ProductCard, ProductDetail, StoreHeaderView, StoreOrderView,
    VariantView,
};
pub use fulfillment::{FulfillmentSummary, summarize_fulfillment};
pub use ids::normalize_ids;
pub use image::{ImageCdn, ImageTransform};
pub use price_range::{PRICE_RANGE_SEPARATOR, PriceRangeSummary, summarize_price_range};
