//! Cache tag invalidation for verified webhook events.

use tracing::info;

use super::WebhookEvent;
use crate::saleor::{InvalidationTag, ResponseCache};

/// Purge the cache tag `event` stales.
///
/// Returns the purged tag, or `None` when there is no event or it does not
/// affect cached data.
pub async fn invalidate_for_event(
    cache: &ResponseCache,
    event: Option<&WebhookEvent>,
) -> Option<InvalidationTag> {
    let Some(tag) = event.and_then(WebhookEvent::invalidation_tag) else {
        info!(event = ?event, "Webhook requires no invalidation");
        return None;
    };

    info!(%tag, "Revalidating cache tag");
    cache.invalidate_tag(tag).await;
    Some(tag)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;

    const COLLECTIONS: &[InvalidationTag] = &[InvalidationTag::Collections];
    const PRODUCTS: &[InvalidationTag] = &[InvalidationTag::Products];

    async fn seeded_cache() -> ResponseCache {
        let cache = ResponseCache::new(Duration::from_secs(900));
        cache.insert("collections".into(), COLLECTIONS, json!(1)).await;
        cache.insert("products".into(), PRODUCTS, json!(2)).await;
        cache
    }

    #[tokio::test]
    async fn test_collection_event_purges_collections_only() {
        let cache = seeded_cache().await;
        let event = WebhookEvent::CollectionUpdated { collection: None };

        let tag = invalidate_for_event(&cache, Some(&event)).await;

        assert_eq!(tag, Some(InvalidationTag::Collections));
        assert!(cache.get("collections").await.is_none());
        assert!(cache.get("products").await.is_some());
    }

    #[tokio::test]
    async fn test_product_event_purges_products_only() {
        let cache = seeded_cache().await;
        let event = WebhookEvent::ProductVariantDeleted {
            product_variant: None,
        };

        let tag = invalidate_for_event(&cache, Some(&event)).await;

        assert_eq!(tag, Some(InvalidationTag::Products));
        assert!(cache.get("products").await.is_none());
        assert!(cache.get("collections").await.is_some());
    }

    #[tokio::test]
    async fn test_unknown_or_missing_event_purges_nothing() {
        let cache = seeded_cache().await;

        assert_eq!(
            invalidate_for_event(&cache, Some(&WebhookEvent::Unknown)).await,
            None
        );
        assert_eq!(invalidate_for_event(&cache, None).await, None);

        assert!(cache.get("collections").await.is_some());
        assert!(cache.get("products").await.is_some());
    }
}
