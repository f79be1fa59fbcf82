//! Order placement payload.

use serde::{Deserialize, Serialize};

use crate::documents::ShippingAddress;
use crate::types::{PaymentMethod, SkuId};

/// Checkout form as submitted by the browser.
///
/// `fe_method` is the checkout page's own payment option value, which does
/// not match the backend vocabulary one-to-one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub fe_method: String,
    #[serde(default)]
    pub recipient_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub line2: String,
    #[serde(default)]
    pub subdistrict: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub note: String,
}

/// One cart line: a SKU and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub sku_id: SkuId,
    pub quantity: u32,
}

/// Line item as the order endpoint expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLinePayload {
    pub sku_id: SkuId,
    pub quantity: u32,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderPayload {
    pub payment_method: PaymentMethod,
    pub shipping_address: ShippingAddress,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub items: Vec<OrderLinePayload>,
}

/// Map the checkout page's payment option to the backend method.
///
/// `"cod"` is cash on delivery, `"promptpay-only"` is a `PromptPay`
/// transfer, and every other option goes through the card processor.
#[must_use]
pub fn payment_method_for(fe_method: &str) -> PaymentMethod {
    match fe_method.trim() {
        "cod" => PaymentMethod::Cod,
        "promptpay-only" => PaymentMethod::Promptpay,
        _ => PaymentMethod::Card,
    }
}

/// Build the order placement body from the checkout form and cart lines.
///
/// Zero-quantity lines are dropped.
#[must_use]
pub fn build_place_order(form: &CheckoutForm, lines: &[CartLine]) -> PlaceOrderPayload {
    let line2 = form.line2.trim();
    let note = form.note.trim();

    PlaceOrderPayload {
        payment_method: payment_method_for(&form.fe_method),
        shipping_address: ShippingAddress {
            recipient_name: form.recipient_name.trim().to_string(),
            phone: form.phone.trim().to_string(),
            line1: form.line1.trim().to_string(),
            line2: (!line2.is_empty()).then(|| line2.to_string()),
            subdistrict: form.subdistrict.trim().to_string(),
            district: form.district.trim().to_string(),
            province: form.province.trim().to_string(),
            postal_code: form.postal_code.trim().to_string(),
            country: form.country.trim().to_string(),
        },
        email: form.email.trim().to_string(),
        note: (!note.is_empty()).then(|| note.to_string()),
        items: lines
            .iter()
            .filter(|line| line.quantity > 0)
            .map(|line| OrderLinePayload {
                sku_id: line.sku_id.clone(),
                quantity: line.quantity,
            })
            .collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn form(fe_method: &str) -> CheckoutForm {
        CheckoutForm {
            fe_method: fe_method.to_string(),
            recipient_name: " Ploy S. ".to_string(),
            phone: "0812345678".to_string(),
            line1: "12 Nimman Rd".to_string(),
            district: "Mueang".to_string(),
            province: "Chiang Mai".to_string(),
            postal_code: "50200".to_string(),
            country: "TH".to_string(),
            email: "ploy@example.com ".to_string(),
            ..CheckoutForm::default()
        }
    }

    #[test]
    fn test_payment_method_mapping() {
        assert_eq!(payment_method_for("cod"), PaymentMethod::Cod);
        assert_eq!(payment_method_for("promptpay-only"), PaymentMethod::Promptpay);
        assert_eq!(payment_method_for("card"), PaymentMethod::Card);
        assert_eq!(payment_method_for("promptpay"), PaymentMethod::Card);
        assert_eq!(payment_method_for(""), PaymentMethod::Card);
    }

    #[test]
    fn test_payload_shape() {
        let lines = [
            CartLine {
                sku_id: SkuId::new("s1"),
                quantity: 2,
            },
            CartLine {
                sku_id: SkuId::new("s2"),
                quantity: 0,
            },
        ];
        let payload = serde_json::to_value(build_place_order(&form("promptpay-only"), &lines)).unwrap();

        assert_eq!(payload["paymentMethod"], "promptpay");
        assert_eq!(payload["email"], "ploy@example.com");
        assert_eq!(payload["shippingAddress"]["recipientName"], "Ploy S.");
        assert_eq!(payload["shippingAddress"]["postalCode"], "50200");
        assert!(payload["shippingAddress"].get("line2").is_none());
        assert!(payload.get("note").is_none());
        assert_eq!(payload["items"], json!([{"skuId": "s1", "quantity": 2}]));
    }

    #[test]
    fn test_cod_serializes_as_cod() {
        let payload = serde_json::to_value(build_place_order(&form("cod"), &[])).unwrap();
        assert_eq!(payload["paymentMethod"], "cod");
        assert_eq!(payload["items"], json!([]));
    }
}
