//! Integration tests for storefront writes.
//!
//! Payloads are opaque bytes and must reach the storefront unchanged.

use httpmock::prelude::*;
use kivio_ecommerce_client::EcommerceError;
use kivio_ecommerce_core::{CustomerId, OrderId, OrderItemId};
use kivio_ecommerce_integration_tests::{TOKEN, TestContext};
use serde_json::json;

const ORDER: &str = r#"{"order":{"customer_id":5,"order_items":[{"product_id":42,"quantity":1}]}}"#;

#[tokio::test]
async fn test_create_order_returns_body() {
    let ctx = TestContext::new();
    let mock = ctx.server.mock(|when, then| {
        when.method(POST)
            .path("/api/orders")
            .header("authorization", format!("Bearer {TOKEN}"))
            .header("content-type", "application/json")
            .body(ORDER);
        then.status(201).body(r#"{"orders":[{"id":900}]}"#);
    });

    let body = ctx
        .service
        .create_order(&ctx.base_url(), &TestContext::token(), ORDER.as_bytes())
        .await
        .unwrap();

    assert_eq!(body, br#"{"orders":[{"id":900}]}"#);
    mock.assert_calls(1);
}

#[tokio::test]
async fn test_create_order_server_error_is_not_retried() {
    let ctx = TestContext::new();
    let mock = ctx.server.mock(|when, then| {
        when.method(POST).path("/api/orders");
        then.status(500).body("internal error");
    });

    let err = ctx
        .service
        .create_order(&ctx.base_url(), &TestContext::token(), ORDER.as_bytes())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EcommerceError::UnexpectedStatus {
            operation: "create order",
            status: 500,
            ..
        }
    ));
    mock.assert_calls(1);
}

#[tokio::test]
async fn test_create_customer_accepts_ok() {
    let ctx = TestContext::new();
    let payload = br#"{"customer":{"email":"ada@example.com"}}"#;
    let mock = ctx.server.mock(|when, then| {
        when.method(POST)
            .path("/api/customers")
            .body(r#"{"customer":{"email":"ada@example.com"}}"#);
        then.status(200).json_body(json!({"customers": [{"id": 31}]}));
    });

    let body = ctx
        .service
        .create_customer(&ctx.base_url(), &TestContext::token(), payload)
        .await
        .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["customers"][0]["id"], 31);
    mock.assert_calls(1);
}

#[tokio::test]
async fn test_addresses_target_customer() {
    let ctx = TestContext::new();
    let billing = ctx.server.mock(|when, then| {
        when.method(POST).path("/api/customers/31/billingaddress");
        then.status(201).body("{}");
    });
    let shipping = ctx.server.mock(|when, then| {
        when.method(POST).path("/api/customers/31/shippingaddress");
        then.status(200).body("{}");
    });

    let address = br#"{"address1":"1 Main St","city":"Springfield"}"#;
    ctx.service
        .create_billing_address(&ctx.base_url(), &TestContext::token(), CustomerId::new(31), address)
        .await
        .unwrap();
    ctx.service
        .create_shipping_address(&ctx.base_url(), &TestContext::token(), CustomerId::new(31), address)
        .await
        .unwrap();

    billing.assert_calls(1);
    shipping.assert_calls(1);
}

#[tokio::test]
async fn test_cart_item_and_clear() {
    let ctx = TestContext::new();
    let add = ctx.server.mock(|when, then| {
        when.method(POST).path("/api/shopping_cart_items");
        then.status(201).body(r#"{"shopping_carts":[]}"#);
    });
    let clear = ctx.server.mock(|when, then| {
        when.method(DELETE).path("/api/customers/31/cart");
        then.status(200);
    });

    ctx.service
        .create_shopping_cart_item(
            &ctx.base_url(),
            &TestContext::token(),
            br#"{"shopping_cart_item":{"product_id":42}}"#,
        )
        .await
        .unwrap();
    ctx.service
        .delete_customer_cart(&ctx.base_url(), &TestContext::token(), CustomerId::new(31))
        .await
        .unwrap();

    add.assert_calls(1);
    clear.assert_calls(1);
}

#[tokio::test]
async fn test_update_stock() {
    let ctx = TestContext::new();
    let mock = ctx.server.mock(|when, then| {
        when.method(PUT)
            .path("/api/products/42")
            .json_body(json!({"product": {"stock_quantity": 17}}));
        then.status(200);
    });

    ctx.service
        .update_item_stock(&ctx.base_url(), &TestContext::token(), "kivio-ecommerce∼42", 17)
        .await
        .unwrap();

    mock.assert_calls(1);
}

#[tokio::test]
async fn test_update_stock_rejects_created() {
    let ctx = TestContext::new();
    ctx.server.mock(|when, then| {
        when.method(PUT).path("/api/products/42");
        then.status(201);
    });

    let err = ctx
        .service
        .update_item_stock(&ctx.base_url(), &TestContext::token(), "42", 1)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(201));
}

#[tokio::test]
async fn test_order_updates_use_json_patch() {
    let ctx = TestContext::new();
    let order = ctx.server.mock(|when, then| {
        when.method(PUT)
            .path("/api/orders/900")
            .header("content-type", "application/json-patch+json")
            .header("accept", "text/plain")
            .body(r#"[{"op":"replace","path":"/order_status","value":"Complete"}]"#);
        then.status(204);
    });
    let line = ctx.server.mock(|when, then| {
        when.method(PUT)
            .path("/api/orders/900/items/3")
            .header("content-type", "application/json-patch+json");
        then.status(200);
    });

    ctx.service
        .update_order(
            &ctx.base_url(),
            &TestContext::token(),
            OrderId::new(900),
            br#"[{"op":"replace","path":"/order_status","value":"Complete"}]"#,
        )
        .await
        .unwrap();
    ctx.service
        .update_order_item_price(
            &ctx.base_url(),
            &TestContext::token(),
            OrderId::new(900),
            OrderItemId::new(3),
            br#"{"unit_price_incl_tax":9.5}"#,
        )
        .await
        .unwrap();

    order.assert_calls(1);
    line.assert_calls(1);
}

#[tokio::test]
async fn test_reads_pass_bodies_through() {
    let ctx = TestContext::new();
    ctx.server.mock(|when, then| {
        when.method(GET).path("/api/orders");
        then.status(200).body(r#"{"orders":[{"id":1}]}"#);
    });
    ctx.server.mock(|when, then| {
        when.method(GET).path("/api/stores");
        then.status(200).body(r#"{"stores":[{"id":1,"name":"Main"}]}"#);
    });

    let orders = ctx
        .service
        .get_orders_raw(&ctx.base_url(), &TestContext::token())
        .await
        .unwrap();
    let stores = ctx
        .service
        .get_stores_raw(&ctx.base_url(), &TestContext::token())
        .await
        .unwrap();

    assert_eq!(orders, br#"{"orders":[{"id":1}]}"#);
    assert_eq!(stores, br#"{"stores":[{"id":1,"name":"Main"}]}"#);
}
