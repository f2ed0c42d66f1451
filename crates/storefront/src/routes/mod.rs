//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                  - Health check
//!
//! # Webhooks
//! POST   /api/revalidate                          - Saleor webhook, purges cache tags
//!
//! # Catalog
//! GET    /api/collections                         - Collection listing
//! GET    /api/collections/{handle}                - Collection detail
//! GET    /api/collections/{handle}/products?sort= - Collection products
//! GET    /api/products?q=&sort=                   - Product search
//! GET    /api/products/featured?first=            - First products of the channel
//! GET    /api/products/{handle}                   - Product detail
//! GET    /api/products/{handle}/recommendations   - Related products
//!
//! # Content
//! GET    /api/pages                               - Page listing
//! GET    /api/pages/{handle}                      - Page detail
//! GET    /api/menus/{handle}                      - Flattened navigation menu
//!
//! # Cart
//! POST   /api/cart                                - Create cart
//! GET    /api/cart/{id}                           - Cart detail
//! POST   /api/cart/{id}/lines                     - Add lines
//! PATCH  /api/cart/{id}/lines                     - Update line quantities
//! DELETE /api/cart/{id}/lines                     - Remove lines
//! ```

pub mod cart;
pub mod collections;
pub mod menus;
pub mod pages;
pub mod products;
pub mod revalidate;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/featured", get(products::featured))
        .route("/{handle}", get(products::show))
        .route("/{handle}/recommendations", get(products::recommendations))
}

/// Create the collection routes router.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(collections::index))
        .route("/{handle}", get(collections::show))
        .route("/{handle}/products", get(collections::products))
}

/// Create the content routes router.
pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/api/pages", get(pages::index))
        .route("/api/pages/{handle}", get(pages::show))
        .route("/api/menus/{handle}", get(menus::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(cart::create))
        .route("/{id}", get(cart::show))
        .route(
            "/{id}/lines",
            post(cart::add_lines)
                .patch(cart::update_lines)
                .delete(cart::remove_lines),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Saleor webhook
        .route("/api/revalidate", post(revalidate::revalidate))
        // Catalog
        .nest("/api/products", product_routes())
        .nest("/api/collections", collection_routes())
        // Content
        .merge(content_routes())
        // Cart
        .nest("/api/cart", cart_routes())
}
