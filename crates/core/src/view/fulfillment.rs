//! Order-level fulfillment summary.

use crate::documents::StoreOrder;
use crate::types::FulfillmentStatus;

/// Whether an order has started shipping and whether it is complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FulfillmentSummary {
    /// At least one item is currently SHIPPED.
    pub has_shipped: bool,
    /// Every item across every suborder is DELIVERED.
    pub all_delivered: bool,
}

impl FulfillmentSummary {
    /// Short label for order lists.
    #[must_use]
    pub const fn label(self) -> &'static str {
        if self.all_delivered {
            "Delivered"
        } else if self.has_shipped {
            "On the way"
        } else {
            "Processing"
        }
    }
}

/// Summarize fulfillment across all suborders of an order.
///
/// An order with no items is never reported as delivered.
#[must_use]
pub fn summarize_fulfillment(store_orders: &[StoreOrder]) -> FulfillmentSummary {
    let mut items = store_orders.iter().flat_map(|so| so.items.iter()).peekable();
    if items.peek().is_none() {
        return FulfillmentSummary::default();
    }

    let mut has_shipped = false;
    let mut all_delivered = true;
    for item in items {
        has_shipped |= item.status == FulfillmentStatus::Shipped;
        all_delivered &= item.status == FulfillmentStatus::Delivered;
    }

    FulfillmentSummary {
        has_shipped,
        all_delivered,
    }
}
