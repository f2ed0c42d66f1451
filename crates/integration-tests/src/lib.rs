//! Integration tests for the Saleor storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p saleor-storefront-integration-tests
//! ```
//!
//! Every test drives the real router in-process with `tower::ServiceExt::oneshot`.
//! Saleor (GraphQL endpoint and JWKS) is played by a `wiremock` server, so no
//! network access or running instance is needed.
//!
//! # Test Categories
//!
//! - `webhook_revalidate` - signed webhooks and cache purges
//! - `saleor_fetch` - GraphQL fetch facade, caching, and error mapping

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{Algorithm, EncodingKey};
use saleor_storefront::{
    build_router,
    config::{SaleorConfig, StorefrontConfig},
    state::AppState,
    webhooks::{API_URL_HEADER, SIGNATURE_HEADER},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Private half of the key published in `fixtures/jwks.json`.
pub const SIGNING_KEY_PEM: &str = include_str!("../tests/fixtures/webhook_signing_key.pem");
/// Key set served at `/.well-known/jwks.json`.
pub const JWKS: &str = include_str!("../tests/fixtures/jwks.json");
/// `kid` of the fixture key.
pub const KEY_ID: &str = "webhook-key-1";

/// Sign `body` the way Saleor does: RS256 detached JWS over the raw payload.
#[must_use]
pub fn sign_detached(body: &[u8]) -> String {
    sign_detached_with_key_id(body, KEY_ID)
}

/// Sign `body` with the fixture key, announcing `kid` in the protected header.
#[must_use]
pub fn sign_detached_with_key_id(body: &[u8], kid: &str) -> String {
    let header = json!({
        "alg": "RS256",
        "kid": kid,
        "b64": false,
        "crit": ["b64"],
    });
    let protected = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header).unwrap());

    let mut message = protected.clone().into_bytes();
    message.push(b'.');
    message.extend_from_slice(body);

    let key = EncodingKey::from_rsa_pem(SIGNING_KEY_PEM.as_bytes()).unwrap();
    let signature = jsonwebtoken::crypto::sign(&message, &key, Algorithm::RS256).unwrap();

    format!("{protected}..{signature}")
}

/// A storefront wired to a mock Saleor instance.
pub struct TestApp {
    pub saleor: MockServer,
    pub state: AppState,
    router: Router,
}

impl TestApp {
    /// Start a mock Saleor and build a storefront pointing at it.
    pub async fn spawn() -> Self {
        let saleor = MockServer::start().await;
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            saleor: SaleorConfig::for_endpoint(&format!("{}/graphql/", saleor.uri())).unwrap(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let state = AppState::new(config);
        let router = build_router(state.clone());

        Self {
            saleor,
            state,
            router,
        }
    }

    /// API URL Saleor puts in webhook headers.
    #[must_use]
    pub fn api_url(&self) -> String {
        format!("{}/graphql/", self.saleor.uri())
    }

    /// Serve the fixture key set, expecting `times` fetches.
    pub async fn mount_jwks(&self, times: u64) {
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(JWKS, "application/json"))
            .expect(times)
            .named("jwks")
            .mount(&self.saleor)
            .await;
    }

    /// Answer the GraphQL operation `operation` with `response`, expecting
    /// `times` requests.
    pub async fn mount_operation(&self, operation: &str, response: Value, times: u64) {
        Mock::given(method("POST"))
            .and(path("/graphql/"))
            .and(body_partial_json(json!({ "operationName": operation })))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .expect(times)
            .named(operation)
            .mount(&self.saleor)
            .await;
    }

    /// Send a request through the router and decode the JSON response.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    /// GET `uri`.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    /// POST a webhook with optional signature and API URL headers.
    pub async fn post_webhook(
        &self,
        body: &Value,
        signature: Option<&str>,
        api_url: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut request =
            Request::post("/api/revalidate").header("content-type", "application/json");
        if let Some(signature) = signature {
            request = request.header(SIGNATURE_HEADER, signature);
        }
        if let Some(api_url) = api_url {
            request = request.header(API_URL_HEADER, api_url);
        }
        let request = request
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap();

        self.send(request).await
    }

    /// POST a webhook signed with the fixture key from the mock instance.
    pub async fn post_signed_webhook(&self, body: &Value) -> (StatusCode, Value) {
        let signature = sign_detached(&serde_json::to_vec(body).unwrap());
        self.post_webhook(body, Some(&signature), Some(&self.api_url()))
            .await
    }
}

/// A `GraphQL` response envelope around `data`.
#[must_use]
pub fn graphql_data(data: Value) -> Value {
    json!({ "data": data })
}

/// A collection summary node as Saleor returns it.
#[must_use]
pub fn collection_json(slug: &str) -> Value {
    json!({
        "id": format!("Q29sbGVjdGlvbjo{slug}"),
        "name": format!("Collection {slug}"),
        "slug": slug,
        "description": null,
        "seoTitle": null,
        "seoDescription": null,
        "products": { "edges": [
            { "node": { "updatedAt": "2024-03-01T10:00:00+00:00" } }
        ] }
    })
}

/// A product node with one variant as Saleor returns it.
#[must_use]
pub fn product_json(slug: &str) -> Value {
    json!({
        "id": format!("UHJvZHVjdDo{slug}"),
        "slug": slug,
        "name": format!("Product {slug}"),
        "isAvailableForPurchase": true,
        "description": null,
        "seoTitle": null,
        "seoDescription": null,
        "pricing": {
            "priceRange": {
                "start": { "gross": { "currency": "USD", "amount": 5.0 } },
                "stop": { "gross": { "currency": "USD", "amount": 5.0 } }
            }
        },
        "media": [],
        "collections": [],
        "updatedAt": "2024-03-01T10:00:00+00:00",
        "variants": [{
            "id": format!("{slug}-default"),
            "name": "Default",
            "attributes": [],
            "pricing": { "price": { "gross": { "currency": "USD", "amount": 5.0 } } }
        }]
    })
}

/// A menu item linking to `url`.
#[must_use]
pub fn menu_item_json(name: &str, url: &str) -> Value {
    json!({
        "id": format!("TWVudUl0ZW06{name}"),
        "name": name,
        "url": url,
        "collection": null,
        "category": null,
        "page": null,
        "children": []
    })
}
