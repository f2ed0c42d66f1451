//! Tag-addressed cache for Saleor API responses.
//!
//! Catalog reads are stored together with the invalidation tags their caller
//! supplied. A webhook purge for a tag expires every entry carrying it, so
//! the next read goes back to Saleor.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Unit of cache purge granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidationTag {
    /// Collections and categories.
    Collections,
    /// Products and product variants.
    Products,
}

impl InvalidationTag {
    /// The wire identifier of the tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collections => "collections",
            Self::Products => "products",
        }
    }
}

impl fmt::Display for InvalidationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request caching policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDirective {
    /// Serve from cache until the revalidation window passes or one of the
    /// tags is purged.
    Revalidate { tags: &'static [InvalidationTag] },
    /// Always fetch fresh and never store the response.
    NoStore,
}

impl FetchDirective {
    /// Revalidating directive carrying `tags`.
    #[must_use]
    pub const fn tagged(tags: &'static [InvalidationTag]) -> Self {
        Self::Revalidate { tags }
    }
}

impl Default for FetchDirective {
    fn default() -> Self {
        Self::Revalidate { tags: &[] }
    }
}

#[derive(Clone)]
struct CachedResponse {
    tags: &'static [InvalidationTag],
    data: Arc<Value>,
}

/// In-process response cache shared by the fetch facade and the webhook relay.
///
/// Cheap to clone; clones share the same entries.
#[derive(Clone)]
pub struct ResponseCache {
    entries: Cache<String, CachedResponse>,
}

impl ResponseCache {
    /// Create a cache whose entries expire `revalidate_after` they were stored.
    #[must_use]
    pub fn new(revalidate_after: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(1000)
            .time_to_live(revalidate_after)
            .support_invalidation_closures()
            .build();

        Self { entries }
    }

    /// Look up the `data` of a previously stored response.
    pub async fn get(&self, key: &str) -> Option<Arc<Value>> {
        self.entries.get(key).await.map(|entry| entry.data)
    }

    /// Store the `data` of a response under `key`.
    pub async fn insert(&self, key: String, tags: &'static [InvalidationTag], data: Value) {
        self.entries
            .insert(
                key,
                CachedResponse {
                    tags,
                    data: Arc::new(data),
                },
            )
            .await;
    }

    /// Expire every entry carrying `tag`.
    ///
    /// Entries stored after the call are unaffected. Purging a tag with no
    /// matching entries is a no-op.
    pub async fn invalidate_tag(&self, tag: InvalidationTag) {
        match self
            .entries
            .invalidate_entries_if(move |_, entry| entry.tags.contains(&tag))
        {
            Ok(_) => debug!(%tag, "Cache tag purged"),
            Err(e) => warn!(%tag, error = %e, "Failed to register cache purge"),
        }
        self.entries.run_pending_tasks().await;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const PRODUCTS: &[InvalidationTag] = &[InvalidationTag::Products];
    const COLLECTIONS: &[InvalidationTag] = &[InvalidationTag::Collections];
    const BOTH: &[InvalidationTag] = &[InvalidationTag::Collections, InvalidationTag::Products];

    fn cache() -> ResponseCache {
        ResponseCache::new(Duration::from_secs(900))
    }

    #[test]
    fn test_tag_wire_names() {
        assert_eq!(InvalidationTag::Collections.as_str(), "collections");
        assert_eq!(InvalidationTag::Products.to_string(), "products");
    }

    #[test]
    fn test_default_directive_revalidates_untagged() {
        assert_eq!(
            FetchDirective::default(),
            FetchDirective::Revalidate { tags: &[] }
        );
    }

    #[tokio::test]
    async fn test_invalidate_tag_expires_only_matching_entries() {
        let cache = cache();
        cache.insert("product".into(), PRODUCTS, json!({"p": 1})).await;
        cache.insert("collection".into(), COLLECTIONS, json!({"c": 1})).await;
        cache.insert("listing".into(), BOTH, json!({"l": 1})).await;

        cache.invalidate_tag(InvalidationTag::Products).await;

        assert!(cache.get("product").await.is_none());
        assert!(cache.get("listing").await.is_none());
        assert_eq!(
            cache.get("collection").await.as_deref(),
            Some(&json!({"c": 1}))
        );
    }

    #[tokio::test]
    async fn test_invalidate_tag_is_idempotent() {
        let cache = cache();
        cache.insert("collection".into(), COLLECTIONS, json!(1)).await;

        cache.invalidate_tag(InvalidationTag::Collections).await;
        cache.invalidate_tag(InvalidationTag::Collections).await;

        assert!(cache.get("collection").await.is_none());
    }

    #[tokio::test]
    async fn test_entries_stored_after_purge_survive() {
        let cache = cache();
        cache.invalidate_tag(InvalidationTag::Products).await;
        cache.insert("product".into(), PRODUCTS, json!(2)).await;

        assert_eq!(cache.get("product").await.as_deref(), Some(&json!(2)));
    }
}
