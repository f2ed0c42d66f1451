//! Navigation menu route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use saleor_storefront_core::Menu;
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// Flattened menu entries for a storefront menu handle.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Vec<Menu>>> {
    Ok(Json(state.saleor().get_menu(&handle).await?))
}
