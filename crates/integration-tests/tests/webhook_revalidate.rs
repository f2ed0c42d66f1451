//! Integration tests for the Saleor webhook endpoint.
//!
//! Every request, accepted or not, must be answered with `{"status": 204}`.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use saleor_storefront::saleor::InvalidationTag;
use saleor_storefront_integration_tests::{
    TestApp, collection_json, graphql_data, sign_detached, sign_detached_with_key_id,
};
use serde_json::{Value, json};

fn acknowledged() -> Value {
    json!({ "status": 204 })
}

fn collection_updated() -> Value {
    json!({
        "__typename": "CollectionUpdated",
        "collection": { "id": "Q29sbGVjdGlvbjox", "slug": "summer" }
    })
}

fn variant_deleted() -> Value {
    json!({
        "__typename": "ProductVariantDeleted",
        "productVariant": {
            "product": { "id": "UHJvZHVjdDox", "slug": "juice" }
        }
    })
}

async fn seed(app: &TestApp) {
    let cache = app.state.cache();
    cache
        .insert("collections-entry".into(), &[InvalidationTag::Collections], json!(1))
        .await;
    cache
        .insert("products-entry".into(), &[InvalidationTag::Products], json!(2))
        .await;
}

async fn cached(app: &TestApp, key: &str) -> bool {
    app.state.cache().get(key).await.is_some()
}

// ============================================================================
// Rejected requests
// ============================================================================

#[tokio::test]
async fn test_missing_signature_is_acknowledged_without_key_fetch() {
    let app = TestApp::spawn().await;
    app.mount_jwks(0).await;
    seed(&app).await;

    let (status, body) = app
        .post_webhook(&collection_updated(), None, Some(&app.api_url()))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, acknowledged());
    assert!(cached(&app, "collections-entry").await);
}

#[tokio::test]
async fn test_malformed_signature_is_acknowledged() {
    let app = TestApp::spawn().await;
    app.mount_jwks(0).await;
    seed(&app).await;

    let (status, body) = app
        .post_webhook(
            &collection_updated(),
            Some("header.payload.signature"),
            Some(&app.api_url()),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, acknowledged());
    assert!(cached(&app, "collections-entry").await);
}

#[tokio::test]
async fn test_foreign_origin_is_acknowledged_without_key_fetch() {
    let app = TestApp::spawn().await;
    app.mount_jwks(0).await;
    seed(&app).await;

    let payload = collection_updated();
    let signature = sign_detached(&serde_json::to_vec(&payload).unwrap());
    let (status, body) = app
        .post_webhook(
            &payload,
            Some(&signature),
            Some("https://attacker.example.com/graphql/"),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, acknowledged());
    assert!(cached(&app, "collections-entry").await);
}

#[tokio::test]
async fn test_missing_api_url_is_acknowledged() {
    let app = TestApp::spawn().await;
    app.mount_jwks(0).await;
    seed(&app).await;

    let payload = collection_updated();
    let signature = sign_detached(&serde_json::to_vec(&payload).unwrap());
    let (status, body) = app.post_webhook(&payload, Some(&signature), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, acknowledged());
    assert!(cached(&app, "collections-entry").await);
}

#[tokio::test]
async fn test_tampered_body_is_acknowledged_without_purge() {
    let app = TestApp::spawn().await;
    app.mount_jwks(1).await;
    seed(&app).await;

    let signature = sign_detached(&serde_json::to_vec(&variant_deleted()).unwrap());
    let (status, body) = app
        .post_webhook(&collection_updated(), Some(&signature), Some(&app.api_url()))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, acknowledged());
    assert!(cached(&app, "collections-entry").await);
    assert!(cached(&app, "products-entry").await);
}

// ============================================================================
// Verified events
// ============================================================================

#[tokio::test]
async fn test_collection_event_purges_collections_tag() {
    let app = TestApp::spawn().await;
    app.mount_jwks(1).await;
    seed(&app).await;

    let (status, body) = app.post_signed_webhook(&collection_updated()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, acknowledged());
    assert!(!cached(&app, "collections-entry").await);
    assert!(cached(&app, "products-entry").await);
}

#[tokio::test]
async fn test_variant_event_purges_products_tag() {
    let app = TestApp::spawn().await;
    app.mount_jwks(1).await;
    seed(&app).await;

    let (status, body) = app.post_signed_webhook(&variant_deleted()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, acknowledged());
    assert!(!cached(&app, "products-entry").await);
    assert!(cached(&app, "collections-entry").await);
}

#[tokio::test]
async fn test_event_wrapped_in_subscription_payload() {
    let app = TestApp::spawn().await;
    app.mount_jwks(1).await;
    seed(&app).await;

    let (_, body) = app
        .post_signed_webhook(&json!({ "event": variant_deleted() }))
        .await;

    assert_eq!(body, acknowledged());
    assert!(!cached(&app, "products-entry").await);
}

#[tokio::test]
async fn test_unknown_event_purges_nothing() {
    let app = TestApp::spawn().await;
    app.mount_jwks(1).await;
    seed(&app).await;

    let order_created = json!({
        "__typename": "OrderCreated",
        "order": { "id": "T3JkZXI6MQ==" }
    });
    let (status, body) = app.post_signed_webhook(&order_created).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, acknowledged());
    assert!(cached(&app, "collections-entry").await);
    assert!(cached(&app, "products-entry").await);
}

#[tokio::test]
async fn test_key_set_is_fetched_once_for_several_webhooks() {
    let app = TestApp::spawn().await;
    app.mount_jwks(1).await;

    for _ in 0..3 {
        let (_, body) = app.post_signed_webhook(&collection_updated()).await;
        assert_eq!(body, acknowledged());
    }
}

#[tokio::test]
async fn test_unknown_key_ids_refetch_key_set_once_per_cooldown() {
    let app = TestApp::spawn().await;
    // Initial fetch plus a single forced refetch.
    app.mount_jwks(2).await;
    seed(&app).await;

    let payload = collection_updated();
    let body = serde_json::to_vec(&payload).unwrap();
    for i in 0..10 {
        let signature = sign_detached_with_key_id(&body, &format!("rotated-{i}"));
        let (status, response) = app
            .post_webhook(&payload, Some(&signature), Some(&app.api_url()))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(response, acknowledged());
    }

    assert!(cached(&app, "collections-entry").await);

    // The known key still verifies from the cached set.
    let (_, response) = app.post_signed_webhook(&payload).await;
    assert_eq!(response, acknowledged());
    assert!(!cached(&app, "collections-entry").await);
}

#[tokio::test]
async fn test_purge_forces_refetch_of_cached_listing() {
    let app = TestApp::spawn().await;
    app.mount_jwks(1).await;
    app.mount_operation(
        "GetCollections",
        graphql_data(json!({
            "collections": { "edges": [{ "node": collection_json("summer") }] }
        })),
        2,
    )
    .await;

    let (status, first) = app.get("/api/collections").await;
    assert_eq!(status, StatusCode::OK);

    // Served from cache.
    let (_, second) = app.get("/api/collections").await;
    assert_eq!(first, second);

    app.post_signed_webhook(&collection_updated()).await;

    let (status, third) = app.get("/api/collections").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(third[0]["handle"], "summer");
}

#[tokio::test]
async fn test_product_event_leaves_collection_listing_cached() {
    let app = TestApp::spawn().await;
    app.mount_jwks(1).await;
    app.mount_operation(
        "GetCollections",
        graphql_data(json!({
            "collections": { "edges": [{ "node": collection_json("summer") }] }
        })),
        1,
    )
    .await;

    app.get("/api/collections").await;
    app.post_signed_webhook(&variant_deleted()).await;
    let (status, body) = app.get("/api/collections").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["path"], "/search/summer");
}
