//! Write payloads for the backend.
//!
//! Builders take UI form or editor state and produce the exact DTO shape
//! the write endpoints accept. Like the view mappers, they never fail:
//! blank input is trimmed away or replaced with a default.

mod order;
mod product;
mod store;

pub use order::{
    CartLine, CheckoutForm, OrderLinePayload, PlaceOrderPayload, build_place_order,
    payment_method_for,
};
pub use product::{
    AttributeRow, ProductCreatePayload, ProductEditorState, ProductUpdatePayload, SkuPayload,
    VariantRow, attribute_text, build_product_create, build_product_update,
};
pub use store::{StoreProfileForm, StoreProfilePayload, build_store_profile};
