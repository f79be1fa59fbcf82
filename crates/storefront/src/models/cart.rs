//! Session cart.
//!
//! The cart never touches the backend until checkout. Each line keeps the
//! name, variant label, price and image it was added with, so the cart page
//! renders without a round trip; the backend reprices at order placement.

use bazaar_core::payload::CartLine;
use bazaar_core::{Price, ProductId, SkuId};
use serde::{Deserialize, Serialize};

/// Upper bound on one line's quantity.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// One SKU in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub sku_id: SkuId,
    pub product_id: ProductId,
    pub name: String,
    /// Formatted variant attributes, empty for single-variant products.
    pub variant_label: String,
    pub unit_price: Price,
    pub image: Option<String>,
    pub quantity: u32,
}

impl CartItem {
    /// Price of the whole line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// The shopping cart, stored in the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Lines in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |count: u32, item| count.saturating_add(item.quantity))
    }

    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Add an item, merging with an existing line for the same SKU.
    ///
    /// The resulting line is capped at `stock` and at [`MAX_LINE_QUANTITY`],
    /// whichever is lower. A zero quantity or zero stock is a no-op.
    pub fn add(&mut self, item: CartItem, stock: u32) {
        let limit = stock.min(MAX_LINE_QUANTITY);
        if item.quantity == 0 || limit == 0 {
            return;
        }
        if let Some(existing) = self.items.iter_mut().find(|line| line.sku_id == item.sku_id) {
            existing.quantity = existing.quantity.saturating_add(item.quantity).min(limit);
            existing.unit_price = item.unit_price;
            return;
        }
        self.items.push(CartItem {
            quantity: item.quantity.min(limit),
            ..item
        });
    }

    /// Set a line's quantity. Zero removes the line.
    pub fn update(&mut self, sku_id: &SkuId, quantity: u32) {
        if quantity == 0 {
            self.remove(sku_id);
            return;
        }
        if let Some(line) = self.items.iter_mut().find(|line| &line.sku_id == sku_id) {
            line.quantity = quantity.min(MAX_LINE_QUANTITY);
        }
    }

    pub fn remove(&mut self, sku_id: &SkuId) {
        self.items.retain(|line| &line.sku_id != sku_id);
    }

    /// Lines as the order-placement builder takes them.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.items
            .iter()
            .map(|item| CartLine {
                sku_id: item.sku_id.clone(),
                quantity: item.quantity,
            })
            .collect()
    }
}
