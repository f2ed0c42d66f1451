//! Saleor GraphQL API client.
//!
//! # Architecture
//!
//! - Every operation is a typed `graphql_client::GraphQLQuery` implementation
//!   (see [`queries`]) carrying its own variables and response shapes
//! - Saleor is source of truth - NO local sync, direct API calls
//! - Catalog responses are cached in a tag-addressed [`ResponseCache`] and
//!   expired either by the revalidation window or by a webhook purge
//! - Cart state is never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use saleor_storefront::saleor::SaleorClient;
//!
//! let client = SaleorClient::new(&config.saleor, ResponseCache::new(window));
//!
//! let product = client.get_product("juice").await?;
//!
//! let cart = client.create_cart().await?;
//! let cart = client.add_to_cart(&cart.id, vec![CartLineInput {
//!     merchandise_id: product.variants[0].id.clone(),
//!     quantity: 1,
//! }]).await?;
//! ```

pub mod cache;
mod client;
pub mod conversions;
pub mod queries;
pub mod sorting;

pub use cache::{FetchDirective, InvalidationTag, ResponseCache};
pub use client::{CartLineInput, CartLineUpdateInput, MenuHandle, SaleorClient};
pub use sorting::{ProductOrderField, SortFilterItem};

use thiserror::Error;

/// Errors that can occur when talking to the Saleor API.
#[derive(Debug, Error)]
pub enum SaleorError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Non-success status with a body that is not a GraphQL response.
    #[error("Unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),

    /// The response carried an `errors` array. Holds the first message only.
    #[error("GraphQL error: {0}")]
    GraphQL(String),

    /// An expected entity was absent from an otherwise successful response.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A mutation returned no payload.
    #[error("Mutation failed: {0}")]
    Mutation(String),
}
