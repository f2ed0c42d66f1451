//! Catalog records: products and collections.

use serde::{Deserialize, Serialize};

use super::id::{ProductId, VariantId};
use super::money::Money;

/// SEO metadata with fallbacks already applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seo {
    /// Page title for search engines.
    pub title: String,
    /// Meta description (empty when the remote record has none).
    pub description: String,
}

/// Product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: String,
}

/// Cheapest and most expensive variant price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min_variant_price: Money,
    pub max_variant_price: Money,
}

/// Selected option on a product variant (e.g., Size = Large).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

/// Product option definition aggregated from variant attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    /// Attribute slug.
    pub id: String,
    /// Attribute display name (e.g., "Size").
    pub name: String,
    /// Available values in the order Saleor lists them.
    pub values: Vec<String>,
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: VariantId,
    pub title: String,
    pub available_for_sale: bool,
    pub selected_options: Vec<SelectedOption>,
    pub price: Money,
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// URL handle (the Saleor slug).
    pub handle: String,
    pub available_for_sale: bool,
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// HTML description.
    pub description_html: String,
    pub options: Vec<ProductOption>,
    pub price_range: PriceRange,
    pub variants: Vec<ProductVariant>,
    pub featured_image: Option<Image>,
    pub images: Vec<Image>,
    pub seo: Seo,
    /// Names of the collections the product belongs to.
    pub tags: Vec<String>,
    /// ISO 8601 timestamp of the last change.
    pub updated_at: String,
}

/// A collection (or category) of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub handle: String,
    pub title: String,
    pub description: String,
    pub seo: Seo,
    /// Timestamp of the most recently modified product, or empty.
    pub updated_at: String,
    /// Storefront path for the collection listing.
    pub path: String,
}
