//! CMS page route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use saleor_storefront_core::Page;
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Page>>> {
    Ok(Json(state.saleor().get_pages().await?))
}

#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(handle): Path<String>) -> Result<Json<Page>> {
    Ok(Json(state.saleor().get_page(&handle).await?))
}
