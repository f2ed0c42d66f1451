//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::saleor::{ResponseCache, SaleorClient};
use crate::webhooks::WebhookVerifier;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The Saleor client and the
/// webhook relay share one [`ResponseCache`], so a verified webhook expires
/// the responses the client serves.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    saleor: SaleorClient,
    verifier: WebhookVerifier,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let cache = ResponseCache::new(config.saleor.revalidate_after);
        let saleor = SaleorClient::new(&config.saleor, cache);
        let verifier = WebhookVerifier::new(&config.saleor.instance_url);

        Self {
            inner: Arc::new(AppStateInner {
                saleor,
                verifier,
            }),
        }
    }

    /// Get a reference to the Saleor API client.
    #[must_use]
    pub fn saleor(&self) -> &SaleorClient {
        &self.inner.saleor
    }

    /// Get a reference to the webhook signature verifier.
    #[must_use]
    pub fn verifier(&self) -> &WebhookVerifier {
        &self.inner.verifier
    }

    /// Get a reference to the shared response cache.
    #[must_use]
    pub fn cache(&self) -> &ResponseCache {
        self.inner.saleor.cache()
    }
}
