//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use saleor_storefront_core::{Product, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::saleor::SortFilterItem;
use crate::state::AppState;

/// Featured products returned when `first` is not given.
const DEFAULT_FEATURED_COUNT: u32 = 12;
/// Saleor caps connection pages at 100 nodes.
const MAX_FEATURED_COUNT: u32 = 100;

/// Query parameters for product search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    /// Sort option slug.
    pub sort: Option<String>,
}

/// Query parameters for featured products.
#[derive(Debug, Deserialize)]
pub struct FeaturedQuery {
    pub first: Option<u32>,
}

/// Search products. Unknown sort slugs fall back to relevance.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>> {
    let sort = SortFilterItem::find_or_default(query.sort.as_deref());
    let products = state
        .saleor()
        .get_products(
            query.q.as_deref().unwrap_or_default(),
            Some(sort.sort_key),
            sort.reverse,
        )
        .await?;

    Ok(Json(products))
}

/// The first products of the channel.
#[instrument(skip(state))]
pub async fn featured(
    State(state): State<AppState>,
    Query(query): Query<FeaturedQuery>,
) -> Result<Json<Vec<Product>>> {
    let first = query.first.unwrap_or(DEFAULT_FEATURED_COUNT);
    if first == 0 || first > MAX_FEATURED_COUNT {
        return Err(AppError::BadRequest(format!(
            "first must be between 1 and {MAX_FEATURED_COUNT}"
        )));
    }

    Ok(Json(state.saleor().get_featured_products(first).await?))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Product>> {
    Ok(Json(state.saleor().get_product(&handle).await?))
}

/// Products related to a product, addressed by product ID.
#[instrument(skip(state))]
pub async fn recommendations(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let products = state
        .saleor()
        .get_product_recommendations(&ProductId::new(product_id))
        .await?;

    Ok(Json(products))
}
