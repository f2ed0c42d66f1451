//! Saleor webhook handling.
//!
//! Saleor signs every webhook payload with a detached JWS whose keys are
//! published at the instance's `/.well-known/jwks.json`. A verified event is
//! mapped to the cache tag it stales and that tag is purged.

pub mod invalidator;
mod jwks;

pub use invalidator::invalidate_for_event;
pub use jwks::{API_URL_HEADER, SIGNATURE_HEADER, VerificationError, WebhookVerifier};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::saleor::InvalidationTag;

/// Identity of the entity an event refers to.
///
/// Subscriptions select different fields per event, so every field is
/// optional and only `__typename` decides the tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EntityRef {
    pub id: Option<String>,
    pub slug: Option<String>,
}

/// Identity of a product variant and its product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VariantRef {
    pub id: Option<String>,
    pub product: Option<EntityRef>,
}

/// A Saleor webhook event, discriminated by `__typename`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "__typename")]
pub enum WebhookEvent {
    CategoryCreated {
        category: Option<EntityRef>,
    },
    CategoryUpdated {
        category: Option<EntityRef>,
    },
    CategoryDeleted {
        category: Option<EntityRef>,
    },
    CollectionCreated {
        collection: Option<EntityRef>,
    },
    CollectionUpdated {
        collection: Option<EntityRef>,
    },
    CollectionDeleted {
        collection: Option<EntityRef>,
    },
    ProductCreated {
        product: Option<EntityRef>,
    },
    ProductUpdated {
        product: Option<EntityRef>,
    },
    ProductDeleted {
        product: Option<EntityRef>,
    },
    ProductVariantCreated {
        #[serde(rename = "productVariant")]
        product_variant: Option<VariantRef>,
    },
    ProductVariantUpdated {
        #[serde(rename = "productVariant")]
        product_variant: Option<VariantRef>,
    },
    ProductVariantDeleted {
        #[serde(rename = "productVariant")]
        product_variant: Option<VariantRef>,
    },
    /// Any event this storefront does not react to.
    #[serde(other)]
    Unknown,
}

impl WebhookEvent {
    /// Decode an event payload. `None` if it has no recognisable shape.
    #[must_use]
    pub fn from_payload(payload: Value) -> Option<Self> {
        match serde_json::from_value(payload) {
            Ok(event) => Some(event),
            Err(e) => {
                debug!(error = %e, "Webhook payload is not an event");
                None
            }
        }
    }

    /// The cache tag this event stales, if any.
    #[must_use]
    pub const fn invalidation_tag(&self) -> Option<InvalidationTag> {
        match self {
            Self::CategoryCreated { .. }
            | Self::CategoryUpdated { .. }
            | Self::CategoryDeleted { .. }
            | Self::CollectionCreated { .. }
            | Self::CollectionUpdated { .. }
            | Self::CollectionDeleted { .. } => Some(InvalidationTag::Collections),
            Self::ProductCreated { .. }
            | Self::ProductUpdated { .. }
            | Self::ProductDeleted { .. }
            | Self::ProductVariantCreated { .. }
            | Self::ProductVariantUpdated { .. }
            | Self::ProductVariantDeleted { .. } => Some(InvalidationTag::Products),
            Self::Unknown => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    const COLLECTION_EVENTS: [&str; 6] = [
        "CategoryCreated",
        "CategoryUpdated",
        "CategoryDeleted",
        "CollectionCreated",
        "CollectionUpdated",
        "CollectionDeleted",
    ];

    const PRODUCT_EVENTS: [&str; 6] = [
        "ProductCreated",
        "ProductUpdated",
        "ProductDeleted",
        "ProductVariantCreated",
        "ProductVariantUpdated",
        "ProductVariantDeleted",
    ];

    #[test]
    fn test_collection_events_map_to_collections_tag() {
        for typename in COLLECTION_EVENTS {
            let event = WebhookEvent::from_payload(json!({ "__typename": typename })).unwrap();
            assert_eq!(
                event.invalidation_tag(),
                Some(InvalidationTag::Collections),
                "{typename}"
            );
        }
    }

    #[test]
    fn test_product_events_map_to_products_tag() {
        for typename in PRODUCT_EVENTS {
            let event = WebhookEvent::from_payload(json!({ "__typename": typename })).unwrap();
            assert_eq!(
                event.invalidation_tag(),
                Some(InvalidationTag::Products),
                "{typename}"
            );
        }
    }

    #[test]
    fn test_unknown_event_has_no_tag() {
        let event = WebhookEvent::from_payload(json!({
            "__typename": "OrderCreated",
            "order": { "id": "T3JkZXI6MQ==" }
        }))
        .unwrap();

        assert_eq!(event, WebhookEvent::Unknown);
        assert_eq!(event.invalidation_tag(), None);
    }

    #[test]
    fn test_payload_without_typename_is_not_an_event() {
        assert!(WebhookEvent::from_payload(json!({ "product": { "id": "1" } })).is_none());
        assert!(WebhookEvent::from_payload(json!("ProductCreated")).is_none());
    }

    #[test]
    fn test_event_carries_entity_identity() {
        let event = WebhookEvent::from_payload(json!({
            "__typename": "ProductVariantUpdated",
            "productVariant": {
                "product": { "id": "UHJvZHVjdDox", "slug": "juice" }
            }
        }))
        .unwrap();

        assert_eq!(event.invalidation_tag(), Some(InvalidationTag::Products));
        let WebhookEvent::ProductVariantUpdated {
            product_variant: Some(variant),
        } = event
        else {
            panic!("expected ProductVariantUpdated with a variant");
        };
        assert_eq!(variant.id, None);
        assert_eq!(variant.product.unwrap().slug.as_deref(), Some("juice"));
    }

    #[test]
    fn test_entity_without_id_still_maps_to_tag() {
        let event = WebhookEvent::from_payload(json!({
            "__typename": "CategoryUpdated",
            "category": { "slug": "drinks" }
        }))
        .unwrap();

        assert_eq!(event.invalidation_tag(), Some(InvalidationTag::Collections));
    }

    #[test]
    fn test_variant_without_product_still_maps_to_tag() {
        for typename in ["ProductVariantCreated", "ProductVariantDeleted"] {
            let event = WebhookEvent::from_payload(json!({
                "__typename": typename,
                "productVariant": {}
            }))
            .unwrap();

            assert_eq!(
                event.invalidation_tag(),
                Some(InvalidationTag::Products),
                "{typename}"
            );
        }
    }
}
