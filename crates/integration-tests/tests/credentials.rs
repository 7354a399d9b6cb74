//! Integration tests for credential resolution.
//!
//! The registry is in memory; the token endpoint is a mocked storefront.

use httpmock::prelude::*;
use kivio_ecommerce_client::EcommerceError;
use kivio_ecommerce_integration_tests::{
    POS_ID, TOKEN, TestContext, active_storefront, integration, resolver,
};
use secrecy::ExposeSecret;
use serde_json::json;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_first_active_storefront_integration_wins() {
    let first = MockServer::start();
    let second = MockServer::start();

    let first_token = first.mock(|when, then| {
        when.method(POST)
            .path("/token")
            .header("content-type", "application/json-patch+json")
            .header("accept", "text/plain")
            .json_body(json!({
                "guest": true,
                "username": "shop-a",
                "password": "secret",
                "remember_me": true
            }));
        then.status(200).json_body(json!({"access_token": TOKEN}));
    });
    let second_token = second.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(200).json_body(json!({"access_token": "other"}));
    });

    let integrations = vec![
        integration("pos-sync", "kivio_pos", "Active", &[("apiUrl", "http://unused")]),
        active_storefront("a", &first.base_url(), "shop-a"),
        active_storefront("b", &second.base_url(), "shop-b"),
    ];

    let credentials = resolver(integrations)
        .resolve(POS_ID, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(credentials.api_url(), first.base_url());
    assert_eq!(credentials.api_key().expose_secret(), TOKEN);
    first_token.assert_calls(1);
    second_token.assert_calls(0);
}

#[tokio::test]
async fn test_inactive_integrations_are_skipped() {
    let ctx = TestContext::new();
    let token = ctx.server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(200).json_body(json!({"access_token": TOKEN}));
    });

    let mut paused = active_storefront("paused", "http://paused.invalid", "old");
    paused.status = "Inactive".to_string();

    let credentials = resolver(vec![paused, active_storefront("live", &ctx.base_url(), "shop")])
        .resolve(POS_ID, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(credentials.api_url(), ctx.base_url());
    token.assert_calls(1);
}

#[tokio::test]
async fn test_no_active_integration() {
    let integrations = vec![
        integration("other", "kivio_pos", "Active", &[]),
        integration("paused", "kivio_ecommerce", "Inactive", &[]),
    ];

    let err = resolver(integrations)
        .resolve(POS_ID, CancellationToken::new())
        .await
        .unwrap_err();

    assert!(
        matches!(&err, EcommerceError::NoActiveIntegration { pos_id } if pos_id == POS_ID),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_unknown_pos_has_no_active_integration() {
    let err = resolver(vec![active_storefront("a", "http://shop.invalid", "shop")])
        .resolve("pos-unknown", CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, EcommerceError::NoActiveIntegration { .. }));
}

#[tokio::test]
async fn test_missing_password() {
    let integrations = vec![integration(
        "a",
        "kivio_ecommerce",
        "Active",
        &[("apiUrl", "http://shop.invalid"), ("username", "shop")],
    )];

    let err = resolver(integrations)
        .resolve(POS_ID, CancellationToken::new())
        .await
        .unwrap_err();

    assert!(
        matches!(&err, EcommerceError::MissingCredentials { pos_id } if pos_id == POS_ID),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_token_rejected() {
    let ctx = TestContext::new();
    let token = ctx.server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(401).body("invalid credentials");
    });

    let err = resolver(vec![active_storefront("a", &ctx.base_url(), "shop")])
        .resolve(POS_ID, CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, EcommerceError::TokenExchangeFailed(_)));
    token.assert_calls(1);
}

#[tokio::test]
async fn test_token_created_status_is_rejected() {
    let ctx = TestContext::new();
    ctx.server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(201).json_body(json!({"access_token": TOKEN}));
    });

    let err = resolver(vec![active_storefront("a", &ctx.base_url(), "shop")])
        .resolve(POS_ID, CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, EcommerceError::TokenExchangeFailed(_)));
}

#[tokio::test]
async fn test_token_without_access_token() {
    let ctx = TestContext::new();
    ctx.server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(200).json_body(json!({"access_token": 12}));
    });

    let err = resolver(vec![active_storefront("a", &ctx.base_url(), "shop")])
        .resolve(POS_ID, CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, EcommerceError::TokenExchangeFailed(_)));
}

#[tokio::test]
async fn test_cancelled_token_skips_exchange() {
    let ctx = TestContext::new();
    let token = ctx.server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(200).json_body(json!({"access_token": TOKEN}));
    });

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = resolver(vec![active_storefront("a", &ctx.base_url(), "shop")])
        .resolve(POS_ID, cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, EcommerceError::Cancelled));
    token.assert_calls(0);
}

#[tokio::test]
async fn test_cancellation_during_exchange() {
    let ctx = TestContext::new();
    ctx.server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(200)
            .delay(std::time::Duration::from_secs(5))
            .json_body(json!({"access_token": TOKEN}));
    });

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let err = resolver(vec![active_storefront("a", &ctx.base_url(), "shop")])
        .resolve(POS_ID, cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, EcommerceError::Cancelled));
}

#[tokio::test]
async fn test_resolution_is_not_cached() {
    let ctx = TestContext::new();
    let token = ctx.server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(200).json_body(json!({"access_token": TOKEN}));
    });

    let resolver = resolver(vec![active_storefront("a", &ctx.base_url(), "shop")]);
    resolver
        .resolve(POS_ID, CancellationToken::new())
        .await
        .unwrap();
    resolver
        .resolve(POS_ID, CancellationToken::new())
        .await
        .unwrap();

    token.assert_calls(2);
}
