//! Collection route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use saleor_storefront_core::{Collection, Product};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::saleor::SortFilterItem;
use crate::state::AppState;

/// Query parameters for collection products.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    /// Sort option slug. Without one, products are listed by name.
    pub sort: Option<String>,
}

/// Collection listing.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Collection>>> {
    Ok(Json(state.saleor().get_collections().await?))
}

/// Collection detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Collection>> {
    Ok(Json(state.saleor().get_collection(&handle).await?))
}

/// Products of a collection.
#[instrument(skip(state))]
pub async fn products(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Vec<Product>>> {
    let (sort_key, reverse) = match query.sort.as_deref() {
        Some(slug) => {
            let sort = SortFilterItem::find_or_default(Some(slug));
            (Some(sort.sort_key), Some(sort.reverse))
        }
        None => (None, None),
    };

    let products = state
        .saleor()
        .get_collection_products(&handle, sort_key, reverse)
        .await?;

    Ok(Json(products))
}
