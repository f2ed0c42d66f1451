//! Collection type conversion functions.

use saleor_storefront_core::{Collection, Seo};

use super::super::queries::CollectionSummary;
use super::rich_text;

/// Convert a collection or category summary.
///
/// `updated_at` is taken from the most recently modified product, or left
/// empty for a collection without products.
pub fn convert_collection(collection: CollectionSummary) -> Collection {
    let updated_at = collection
        .products
        .and_then(|products| products.edges.into_iter().next())
        .map(|edge| edge.node.updated_at)
        .unwrap_or_default();

    let seo = Seo {
        title: collection
            .seo_title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| collection.name.clone()),
        description: collection.seo_description.unwrap_or_default(),
    };

    Collection {
        path: format!("/search/{}", collection.slug),
        handle: collection.slug,
        title: collection.name,
        description: rich_text::render(collection.description.as_deref().unwrap_or_default())
            .text,
        seo,
        updated_at,
    }
}
