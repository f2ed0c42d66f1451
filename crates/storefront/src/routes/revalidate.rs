//! Saleor webhook endpoint.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
};
use serde_json::{Value, json};
use tracing::{instrument, warn};

use crate::state::AppState;
use crate::webhooks::{WebhookEvent, invalidate_for_event};

/// Verify a webhook and purge the cache tag its event stales.
///
/// The response is always `{"status": 204}` with HTTP 200, whatever the
/// outcome. Saleor retries webhooks that fail, so rejections are only logged.
#[instrument(skip_all)]
pub async fn revalidate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    let event = match state.verifier().verify(&headers, &body).await {
        Ok(payload) => WebhookEvent::from_payload(payload),
        Err(e) => {
            warn!(reason = e.reason(), error = %e, "Webhook rejected");
            None
        }
    };

    invalidate_for_event(state.cache(), event.as_ref()).await;

    Json(json!({ "status": 204 }))
}
