//! Backend client behavior against a mock marketplace backend.

#![allow(clippy::unwrap_used)]

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
};
use bazaar_core::payload::{CartLine, CheckoutForm, build_place_order};
use bazaar_core::{ProductId, Role, SkuId};
use bazaar_integration_tests::MockBackend;
use bazaar_storefront::api::{self, ApiClient, ApiError, FALLBACK_ERROR_MESSAGE, RequestOptions};
use reqwest::Method;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;

#[tokio::test]
async fn test_error_status_carries_backend_message() {
    let backend = MockBackend::start(Router::new().route(
        "/products/{id}",
        get(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({"statusCode": 404, "message": "Product not found"})),
            )
        }),
    ))
    .await;

    let err = api::products::get(&backend.client(), &ProductId::new("nope"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Product not found");
}

#[tokio::test]
async fn test_unreadable_error_body_uses_fallback_message() {
    let backend = MockBackend::start(Router::new().route(
        "/stores",
        get(|| async { (StatusCode::BAD_GATEWAY, "<html>upstream down</html>") }),
    ))
    .await;

    let err = api::stores::list(&backend.client()).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
    assert_eq!(err.to_string(), FALLBACK_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(Url::parse(&format!("http://{addr}/api/")).unwrap());
    let err = api::stores::list(&client).await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert!(err.status().is_none());
}

#[tokio::test]
async fn test_list_envelope_and_mongo_ids_are_normalized() {
    let backend = MockBackend::start(Router::new().route(
        "/products",
        get(|| async {
            Json(json!({
                "items": [{
                    "_id": {"$oid": "p1"},
                    "name": "Teak bowl",
                    "defaultPrice": 350,
                    "variants": [
                        {"_id": "s1", "attributes": {"size": "S"}, "stock": 2},
                        {"_id": "s2", "attributes": {"size": "L"}, "price": 420, "stock": 0}
                    ]
                }],
                "total": 1
            }))
        }),
    ))
    .await;

    let products = api::products::list(&backend.client(), &api::products::ProductQuery::default())
        .await
        .unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id.as_str(), "p1");
    assert_eq!(products[0].skus.len(), 2);
    assert_eq!(products[0].total_stock(), 2);
    assert!(products[0].sku(&SkuId::new("s2")).is_some());
}

#[tokio::test]
async fn test_profile_sends_bearer_token_and_unwraps_user() {
    let backend = MockBackend::start(Router::new().route(
        "/auth/profile",
        get(|headers: HeaderMap| async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            if auth != "Bearer tok-seller" {
                return (StatusCode::UNAUTHORIZED, Json(json!({"message": "jwt malformed"})));
            }
            (
                StatusCode::OK,
                Json(json!({"user": {
                    "_id": "u1",
                    "name": "Somchai",
                    "email": "somchai@example.com",
                    "role": "seller",
                    "store": "st1"
                }})),
            )
        }),
    ))
    .await;
    let client = backend.client();

    let user = api::auth::profile(&client, &SecretString::from("tok-seller"))
        .await
        .unwrap();
    assert_eq!(user.id.as_str(), "u1");
    assert_eq!(user.role, Role::Seller);
    assert_eq!(user.store_id.unwrap().as_str(), "st1");

    let err = api::auth::profile(&client, &SecretString::from("tok-stale"))
        .await
        .unwrap_err();
    assert!(err.is_auth_rejection());
    assert_eq!(err.to_string(), "jwt malformed");
}

#[tokio::test]
async fn test_place_order_posts_camel_case_body() {
    let backend = MockBackend::start(Router::new().route(
        "/orders",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["paymentMethod"], "cod");
            assert_eq!(body["shippingAddress"]["postalCode"], "10110");
            assert_eq!(body["items"][0]["skuId"], "s1");
            assert_eq!(body["items"][0]["quantity"], 2);
            (StatusCode::CREATED, Json(json!({"_id": "o42", "total": 700})))
        }),
    ))
    .await;

    let form = CheckoutForm {
        fe_method: "cod".to_string(),
        recipient_name: "Mali".to_string(),
        phone: "0812345678".to_string(),
        line1: "1 Sukhumvit Rd".to_string(),
        province: "Bangkok".to_string(),
        postal_code: "10110".to_string(),
        ..CheckoutForm::default()
    };
    let lines = vec![CartLine {
        sku_id: SkuId::new("s1"),
        quantity: 2,
    }];

    let order = api::orders::place(
        &backend.client(),
        &build_place_order(&form, &lines),
        &SecretString::from("tok-buyer"),
    )
    .await
    .unwrap();

    assert_eq!(order.id.as_str(), "o42");
}

#[tokio::test]
async fn test_empty_success_body_decodes_as_null() {
    let backend = MockBackend::start(
        Router::new().route("/notifications/{id}", delete(|| async { StatusCode::NO_CONTENT })),
    )
    .await;

    let value: Value = backend
        .client()
        .delete("notifications/n1", Some(&SecretString::from("tok")))
        .await
        .unwrap();
    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn test_body_is_only_sent_for_writes() {
    let backend = MockBackend::start(Router::new().route(
        "/echo",
        get(|body: String| async move { Json(json!({"method": "GET", "body": body})) })
            .patch(|body: String| async move { Json(json!({"method": "PATCH", "body": body})) }),
    ))
    .await;
    let client = backend.client();
    let payload = json!({"read": true});

    let read: Value = client
        .request("/echo", RequestOptions::method(Method::GET).body(&payload))
        .await
        .unwrap();
    assert_eq!(read["body"], "");

    let write: Value = client
        .request("echo", RequestOptions::method(Method::PATCH).body(&payload))
        .await
        .unwrap();
    assert_eq!(write["method"], "PATCH");
    assert_eq!(write["body"], r#"{"read":true}"#);
}
