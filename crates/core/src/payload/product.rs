//! Product editor state and the create/update payloads built from it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::documents::Product;
use crate::types::{Price, ProductStatus, SkuId};

/// One `key = value` row in a variant's attribute editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeRow {
    pub key: String,
    pub value: String,
}

/// One variant row in the product editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantRow {
    /// Set when editing a variant the backend already knows.
    pub id: Option<SkuId>,
    pub attributes: Vec<AttributeRow>,
    pub price: Option<Price>,
    pub stock: u32,
    pub sku_code: String,
}

impl VariantRow {
    /// Whether the row was left entirely empty (the editor's spare row).
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.id.is_none()
            && self.attributes.is_empty()
            && self.price.is_none()
            && self.stock == 0
            && self.sku_code.trim().is_empty()
    }
}

/// Everything the seller has typed into the product editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductEditorState {
    pub name: String,
    pub description: String,
    pub category: String,
    pub status: ProductStatus,
    pub image: String,
    pub default_price: Price,
    pub variants: Vec<VariantRow>,
}

impl ProductEditorState {
    /// Prefill the editor from an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            status: product.status,
            image: product.image.clone().unwrap_or_default(),
            default_price: product.default_price,
            variants: product
                .skus
                .iter()
                .map(|sku| VariantRow {
                    id: Some(sku.id.clone()).filter(|id| !id.is_empty()),
                    attributes: sku
                        .attributes
                        .iter()
                        .map(|(key, value)| AttributeRow {
                            key: key.clone(),
                            value: value.clone(),
                        })
                        .collect(),
                    price: sku.price,
                    stock: sku.stock,
                    sku_code: sku.sku_code.clone().unwrap_or_default(),
                })
                .collect(),
        }
    }

    /// Read the editor from url-encoded form pairs.
    ///
    /// Scalar fields are `name`, `description`, `category`, `status`,
    /// `image` and `default_price`. Each variant row submits `variant_id`,
    /// `variant_attributes`, `variant_price`, `variant_stock` and
    /// `variant_sku_code` once, in row order; the n-th occurrence of each
    /// field belongs to row n. Attributes are written as
    /// `color=red; size=M`. Rows left entirely blank are dropped.
    #[must_use]
    pub fn from_form(pairs: &[(String, String)]) -> Self {
        let mut state = Self::default();
        let mut rows: Vec<VariantRow> = Vec::new();
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();

        for (key, value) in pairs {
            let value = value.trim();
            match key.as_str() {
                "name" => state.name = value.to_string(),
                "description" => state.description = value.to_string(),
                "category" => state.category = value.to_string(),
                "status" => state.status = value.parse().unwrap_or_default(),
                "image" => state.image = value.to_string(),
                "default_price" => state.default_price = Price::parse(value).unwrap_or_default(),
                field @ ("variant_id"
                | "variant_attributes"
                | "variant_price"
                | "variant_stock"
                | "variant_sku_code") => {
                    let next = seen.entry(field).or_default();
                    let index = *next;
                    *next += 1;
                    if rows.len() <= index {
                        rows.resize_with(index + 1, VariantRow::default);
                    }
                    let Some(row) = rows.get_mut(index) else {
                        continue;
                    };

                    match field {
                        "variant_id" => row.id = Some(SkuId::new(value)).filter(|id| !id.is_empty()),
                        "variant_attributes" => row.attributes = parse_attribute_text(value),
                        "variant_price" => row.price = Price::parse(value),
                        "variant_stock" => row.stock = value.parse().unwrap_or(0),
                        _ => row.sku_code = value.to_string(),
                    }
                }
                _ => {}
            }
        }

        rows.retain(|row| !row.is_blank());
        state.variants = rows;
        state
    }
}

fn parse_attribute_text(text: &str) -> Vec<AttributeRow> {
    text.split(';')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            Some(AttributeRow {
                key: key.trim().to_string(),
                value: value.trim().to_string(),
            })
        })
        .collect()
}

/// Attribute rows rendered back into the editor's text form.
#[must_use]
pub fn attribute_text(rows: &[AttributeRow]) -> String {
    rows.iter()
        .map(|row| format!("{}={}", row.key, row.value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A SKU as the product write endpoints accept it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<SkuId>,
    pub attributes: BTreeMap<String, String>,
    pub price: Price,
    pub stock: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku_code: Option<String>,
}

/// Body of `POST /products`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreatePayload {
    pub name: String,
    pub description: String,
    pub category: String,
    pub status: ProductStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub default_price: Price,
    pub skus: Vec<SkuPayload>,
}

/// Body of `PUT /products/{id}`.
///
/// Variants are managed separately once a product exists, so the update
/// body has no `skus` field at all.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdatePayload {
    pub name: String,
    pub description: String,
    pub category: String,
    pub status: ProductStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub default_price: Price,
}

fn sku_payload(row: &VariantRow, default_price: Price) -> SkuPayload {
    let attributes = row
        .attributes
        .iter()
        .filter(|attr| !attr.key.trim().is_empty())
        .map(|attr| (attr.key.trim().to_string(), attr.value.trim().to_string()))
        .collect();
    let sku_code = row.sku_code.trim();

    SkuPayload {
        id: row.id.clone(),
        attributes,
        price: row.price.unwrap_or(default_price),
        stock: row.stock,
        sku_code: (!sku_code.is_empty()).then(|| sku_code.to_string()),
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Build the create body.
///
/// A product always needs at least one SKU. When the editor has no variant
/// rows, a single default SKU is synthesized with no attributes, the
/// default price and zero stock.
#[must_use]
pub fn build_product_create(state: &ProductEditorState) -> ProductCreatePayload {
    let mut skus: Vec<SkuPayload> = state
        .variants
        .iter()
        .map(|row| sku_payload(row, state.default_price))
        .collect();

    if skus.is_empty() {
        skus.push(SkuPayload {
            id: None,
            attributes: BTreeMap::new(),
            price: state.default_price,
            stock: 0,
            sku_code: None,
        });
    }

    ProductCreatePayload {
        name: state.name.trim().to_string(),
        description: state.description.trim().to_string(),
        category: state.category.trim().to_string(),
        status: state.status,
        image: non_blank(&state.image),
        default_price: state.default_price,
        skus,
    }
}

/// Build the update body.
#[must_use]
pub fn build_product_update(state: &ProductEditorState) -> ProductUpdatePayload {
    ProductUpdatePayload {
        name: state.name.trim().to_string(),
        description: state.description.trim().to_string(),
        category: state.category.trim().to_string(),
        status: state.status,
        image: non_blank(&state.image),
        default_price: state.default_price,
    }
}
