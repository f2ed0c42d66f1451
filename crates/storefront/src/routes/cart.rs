//! Cart route handlers.
//!
//! Carts are Saleor checkouts. Cart state is never cached.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use saleor_storefront_core::{Cart, CartId, CartLineId};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::saleor::{CartLineInput, CartLineUpdateInput};
use crate::state::AppState;

/// Request to add lines to a cart.
#[derive(Debug, Deserialize)]
pub struct AddLinesRequest {
    pub lines: Vec<CartLineInput>,
}

/// Request to change line quantities.
#[derive(Debug, Deserialize)]
pub struct UpdateLinesRequest {
    pub lines: Vec<CartLineUpdateInput>,
}

/// Request to remove lines.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveLinesRequest {
    pub line_ids: Vec<CartLineId>,
}

fn require_lines<T>(lines: &[T]) -> Result<()> {
    if lines.is_empty() {
        return Err(AppError::BadRequest("No cart lines given".to_string()));
    }
    Ok(())
}

/// Create an empty cart.
#[instrument(skip(state))]
pub async fn create(State(state): State<AppState>) -> Result<(StatusCode, Json<Cart>)> {
    let cart = state.saleor().create_cart().await?;
    Ok((StatusCode::CREATED, Json(cart)))
}

/// Cart detail.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Cart>> {
    let cart_id = CartId::new(id);
    state
        .saleor()
        .get_cart(&cart_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Cart not found: {cart_id}")))
}

/// Add lines to a cart.
#[instrument(skip(state, request))]
pub async fn add_lines(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AddLinesRequest>,
) -> Result<Json<Cart>> {
    require_lines(&request.lines)?;
    let cart = state
        .saleor()
        .add_to_cart(&CartId::new(id), request.lines)
        .await?;
    Ok(Json(cart))
}

/// Change line quantities.
#[instrument(skip(state, request))]
pub async fn update_lines(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateLinesRequest>,
) -> Result<Json<Cart>> {
    require_lines(&request.lines)?;
    let cart = state
        .saleor()
        .update_cart(&CartId::new(id), request.lines)
        .await?;
    Ok(Json(cart))
}

/// Remove lines from a cart.
#[instrument(skip(state, request))]
pub async fn remove_lines(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RemoveLinesRequest>,
) -> Result<Json<Cart>> {
    require_lines(&request.line_ids)?;
    let cart = state
        .saleor()
        .remove_from_cart(&CartId::new(id), request.line_ids)
        .await?;
    Ok(Json(cart))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_request_uses_camel_case() {
        let request: RemoveLinesRequest =
            serde_json::from_str(r#"{"lineIds": ["Q2hlY2tvdXRMaW5lOjE="]}"#).unwrap();
        assert_eq!(request.line_ids[0].as_str(), "Q2hlY2tvdXRMaW5lOjE=");
    }

    #[test]
    fn test_require_lines_rejects_empty() {
        assert!(matches!(
            require_lines::<CartLineId>(&[]),
            Err(AppError::BadRequest(_))
        ));
        assert!(require_lines(&[1]).is_ok());
    }
}
