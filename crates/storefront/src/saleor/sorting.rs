//! Product sort options exposed to storefront listings.

use serde::Serialize;

/// Saleor `ProductOrderField`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductOrderField {
    Name,
    Rank,
    Price,
    MinimalPrice,
    LastModified,
    Date,
    Type,
    Published,
    PublicationDate,
    PublishedAt,
    LastModifiedAt,
    Collection,
    Rating,
    CreatedAt,
}

/// Saleor `OrderDirection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    /// `Desc` when `reverse` is set, `Asc` otherwise.
    #[must_use]
    pub const fn from_reverse(reverse: bool) -> Self {
        if reverse { Self::Desc } else { Self::Asc }
    }
}

/// A named sort option selectable by URL slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortFilterItem {
    pub title: &'static str,
    /// `None` for the default option.
    pub slug: Option<&'static str>,
    pub sort_key: ProductOrderField,
    pub reverse: bool,
}

impl SortFilterItem {
    /// Option applied when no slug is selected.
    pub const DEFAULT: Self = Self {
        title: "Relevance",
        slug: None,
        sort_key: ProductOrderField::Rank,
        reverse: false,
    };

    /// Every option, default first.
    pub const ALL: [Self; 5] = [
        Self::DEFAULT,
        Self {
            title: "Trending",
            slug: Some("trending-desc"),
            sort_key: ProductOrderField::Rating,
            reverse: false,
        },
        Self {
            title: "Latest arrivals",
            slug: Some("latest-desc"),
            sort_key: ProductOrderField::PublishedAt,
            reverse: true,
        },
        Self {
            title: "Price: Low to high",
            slug: Some("price-asc"),
            sort_key: ProductOrderField::MinimalPrice,
            reverse: false,
        },
        Self {
            title: "Price: High to low",
            slug: Some("price-desc"),
            sort_key: ProductOrderField::MinimalPrice,
            reverse: true,
        },
    ];

    /// Look up an option by its slug.
    #[must_use]
    pub fn find(slug: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|item| item.slug.is_some_and(|s| s == slug))
    }

    /// Option for an optional slug; unknown or absent slugs fall back to the default.
    #[must_use]
    pub fn find_or_default(slug: Option<&str>) -> Self {
        slug.and_then(Self::find).unwrap_or(Self::DEFAULT)
    }
}

/// Sort key used for collection and category listings.
///
/// Listings have no relevance ranking, so `Rank` and an absent key both sort
/// by rating.
#[must_use]
pub fn listing_sort_key(sort_key: Option<ProductOrderField>) -> ProductOrderField {
    match sort_key {
        None | Some(ProductOrderField::Rank) => ProductOrderField::Rating,
        Some(key) => key,
    }
}

/// Sort key used for product search.
///
/// A non-empty query keeps relevance ranking; without one the listing rules apply.
#[must_use]
pub fn search_sort_key(query: &str, sort_key: Option<ProductOrderField>) -> ProductOrderField {
    if query.is_empty() {
        listing_sort_key(sort_key)
    } else {
        sort_key.unwrap_or(ProductOrderField::Rank)
    }
}

/// Sort key and direction for a collection's products.
///
/// With neither a key nor a direction the listing is ordered by name, descending.
#[must_use]
pub fn collection_sort(
    sort_key: Option<ProductOrderField>,
    reverse: Option<bool>,
) -> (ProductOrderField, OrderDirection) {
    match (sort_key, reverse) {
        (None, None) => (ProductOrderField::Name, OrderDirection::Desc),
        (key, reverse) => (
            listing_sort_key(key),
            OrderDirection::from_reverse(reverse.unwrap_or(false)),
        ),
    }
}
