//! Saleor API client: the fetch facade and the catalog and cart operations
//! built on it.

use std::sync::Arc;

use graphql_client::{GraphQLQuery, QueryBody, Response};
use saleor_storefront_core::{
    Cart, CartId, CartLineId, Collection, Menu, Page, Product, ProductId, VariantId,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, instrument};

use super::SaleorError;
use super::cache::{FetchDirective, InvalidationTag, ResponseCache};
use super::conversions::{
    convert_checkout, convert_collection, convert_menu, convert_page, convert_product,
    convert_product_connection, into_nodes,
};
use super::queries::{
    ChannelVariables, CheckoutAddLine, CheckoutAddLineVariables, CheckoutCreateInput,
    CheckoutDeleteLine, CheckoutDeleteLineVariables, CheckoutIdVariables, CheckoutLineUpdateInput,
    CheckoutMutationPayload, CheckoutUpdateLine, CheckoutUpdateLineVariables, CreateCheckout,
    CreateCheckoutVariables, FeaturedProductsVariables, GetCategoryBySlug,
    GetCategoryProductsBySlug, GetCheckoutById, GetCollectionBySlug, GetCollectionProductsBySlug,
    GetCollections, GetFeaturedProducts, GetMenuBySlug, GetPageBySlug, GetPages, GetProductBySlug,
    NoVariables, SearchProducts, SearchProductsVariables, SlugChannelVariables, SlugVariables,
    SortedProductsVariables,
};
use super::sorting::{OrderDirection, ProductOrderField, collection_sort, search_sort_key};
use crate::config::SaleorConfig;

const COLLECTIONS: &[InvalidationTag] = &[InvalidationTag::Collections];
const PRODUCTS: &[InvalidationTag] = &[InvalidationTag::Products];
const COLLECTIONS_AND_PRODUCTS: &[InvalidationTag] =
    &[InvalidationTag::Collections, InvalidationTag::Products];

/// Collections whose handle starts with this prefix are not listed.
const HIDDEN_COLLECTION_PREFIX: &str = "hidden-";

// =============================================================================
// Inputs
// =============================================================================

/// A line to add to a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub merchandise_id: VariantId,
    pub quantity: u32,
}

/// A new quantity for an existing cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineUpdateInput {
    pub id: CartLineId,
    pub quantity: u32,
}

/// Storefront menu handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuHandle<'a> {
    /// `storefront-header-menu` (or `next-js-frontend-header-menu`), served
    /// from the `navbar` menu.
    Header,
    /// `storefront-footer-menu` (or `next-js-frontend-footer-menu`), served
    /// from the `footer` menu.
    Footer,
    /// Any other handle, used as the Saleor menu slug.
    Other(&'a str),
}

impl<'a> MenuHandle<'a> {
    pub const HEADER: &'static str = "storefront-header-menu";
    pub const FOOTER: &'static str = "storefront-footer-menu";
    /// Handles used by the Next.js commerce frontend.
    pub const LEGACY_HEADER: &'static str = "next-js-frontend-header-menu";
    pub const LEGACY_FOOTER: &'static str = "next-js-frontend-footer-menu";

    /// Number of entries shown in the header menu.
    pub const HEADER_LIMIT: usize = 3;

    #[must_use]
    pub fn parse(handle: &'a str) -> Self {
        match handle {
            Self::HEADER | Self::LEGACY_HEADER => Self::Header,
            Self::FOOTER | Self::LEGACY_FOOTER => Self::Footer,
            other => Self::Other(other),
        }
    }

    /// Slug of the Saleor menu backing this handle.
    #[must_use]
    pub const fn slug(self) -> &'a str {
        match self {
            Self::Header => "navbar",
            Self::Footer => "footer",
            Self::Other(slug) => slug,
        }
    }

    /// Maximum number of entries, if the menu is truncated.
    #[must_use]
    pub const fn limit(self) -> Option<usize> {
        match self {
            Self::Header => Some(Self::HEADER_LIMIT),
            Self::Footer | Self::Other(_) => None,
        }
    }
}

// =============================================================================
// SaleorClient
// =============================================================================

/// Client for the Saleor GraphQL API.
///
/// Catalog reads go through the shared [`ResponseCache`]; cart reads and
/// mutations always hit Saleor.
#[derive(Clone)]
pub struct SaleorClient {
    inner: Arc<SaleorClientInner>,
}

struct SaleorClientInner {
    client: reqwest::Client,
    config: SaleorConfig,
    /// Serialized origin of the instance, used to rewrite menu URLs.
    instance_origin: String,
    cache: ResponseCache,
}

impl SaleorClient {
    /// Create a client for the configured instance.
    #[must_use]
    pub fn new(config: &SaleorConfig, cache: ResponseCache) -> Self {
        Self {
            inner: Arc::new(SaleorClientInner {
                client: reqwest::Client::new(),
                instance_origin: config.instance_url.origin().ascii_serialization(),
                config: config.clone(),
                cache,
            }),
        }
    }

    /// The response cache shared with the webhook relay.
    #[must_use]
    pub fn cache(&self) -> &ResponseCache {
        &self.inner.cache
    }

    /// Execute a GraphQL operation under a caching directive.
    ///
    /// # Errors
    ///
    /// Returns the first GraphQL error message if the response carries any,
    /// or a transport/parse error.
    #[instrument(skip_all, fields(operation = std::any::type_name::<Q>()))]
    pub async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
        directive: FetchDirective,
    ) -> Result<Q::ResponseData, SaleorError> {
        let body = Q::build_query(variables);

        let cache_key = match directive {
            FetchDirective::Revalidate { .. } => Some(format!(
                "{}:{}",
                body.operation_name,
                serde_json::to_string(&body.variables)?
            )),
            FetchDirective::NoStore => None,
        };

        if let Some(key) = &cache_key
            && let Some(data) = self.inner.cache.get(key).await
        {
            debug!("Cache hit");
            return Ok(<Q::ResponseData as Deserialize>::deserialize(&*data)?);
        }

        let data = self.send(&body).await?;
        let response_data = <Q::ResponseData as Deserialize>::deserialize(&data)?;

        if let (Some(key), FetchDirective::Revalidate { tags }) = (cache_key, directive) {
            self.inner.cache.insert(key, tags, data).await;
        }

        Ok(response_data)
    }

    /// POST one operation and return its `data`.
    async fn send<V: Serialize>(&self, body: &QueryBody<V>) -> Result<Value, SaleorError> {
        let mut request = self
            .inner
            .client
            .post(self.inner.config.instance_url.clone())
            .json(body);

        if let Some(token) = &self.inner.config.auth_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        let response: Response<Value> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                error!(
                    status = %status,
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse Saleor GraphQL response"
                );
                return Err(if status.is_success() {
                    SaleorError::Parse(e)
                } else {
                    SaleorError::Status(status)
                });
            }
        };

        if let Some(errors) = response.errors {
            let mut errors = errors.into_iter();
            if let Some(first) = errors.next() {
                let rest: Vec<String> = errors.map(|e| e.message).collect();
                if !rest.is_empty() {
                    debug!(errors = ?rest, "Additional GraphQL errors in response");
                }
                return Err(SaleorError::GraphQL(first.message));
            }
        }

        response
            .data
            .ok_or_else(|| SaleorError::GraphQL("Response contained no data".to_string()))
    }

    fn channel(&self) -> String {
        self.inner.config.channel.clone()
    }

    // =========================================================================
    // Collections
    // =========================================================================

    /// List all visible collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_collections(&self) -> Result<Vec<Collection>, SaleorError> {
        let data = self
            .execute::<GetCollections>(
                ChannelVariables {
                    channel: self.channel(),
                },
                FetchDirective::tagged(COLLECTIONS),
            )
            .await?;

        Ok(data
            .collections
            .map(into_nodes)
            .unwrap_or_default()
            .into_iter()
            .map(convert_collection)
            .filter(|collection| !collection.handle.starts_with(HIDDEN_COLLECTION_PREFIX))
            .collect())
    }

    /// Get a collection by handle, falling back to a category with that slug.
    ///
    /// # Errors
    ///
    /// Returns an error if neither exists or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_collection(&self, handle: &str) -> Result<Collection, SaleorError> {
        let variables = SlugChannelVariables {
            slug: handle.to_string(),
            channel: self.channel(),
        };

        let data = self
            .execute::<GetCollectionBySlug>(variables.clone(), FetchDirective::tagged(COLLECTIONS))
            .await?;
        if let Some(collection) = data.collection {
            return Ok(convert_collection(collection));
        }

        let data = self
            .execute::<GetCategoryBySlug>(variables, FetchDirective::tagged(COLLECTIONS))
            .await?;
        data.category
            .map(convert_collection)
            .ok_or_else(|| SaleorError::NotFound(format!("Collection not found: {handle}")))
    }

    /// Products of a collection, or of a category with that slug.
    ///
    /// With neither `sort_key` nor `reverse` the products are ordered by name,
    /// descending.
    ///
    /// # Errors
    ///
    /// Returns an error if neither exists or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_collection_products(
        &self,
        handle: &str,
        sort_key: Option<ProductOrderField>,
        reverse: Option<bool>,
    ) -> Result<Vec<Product>, SaleorError> {
        let (sort_by, sort_direction) = collection_sort(sort_key, reverse);
        let variables = SortedProductsVariables {
            slug: handle.to_string(),
            channel: self.channel(),
            sort_by,
            sort_direction,
        };

        let data = self
            .execute::<GetCollectionProductsBySlug>(
                variables.clone(),
                FetchDirective::tagged(COLLECTIONS_AND_PRODUCTS),
            )
            .await?;
        if let Some(collection) = data.collection {
            return Ok(collection
                .products
                .map(convert_product_connection)
                .unwrap_or_default());
        }

        let data = self
            .execute::<GetCategoryProductsBySlug>(
                variables,
                FetchDirective::tagged(COLLECTIONS_AND_PRODUCTS),
            )
            .await?;
        data.category
            .map(|category| {
                category
                    .products
                    .map(convert_product_connection)
                    .unwrap_or_default()
            })
            .ok_or_else(|| SaleorError::NotFound(format!("Collection not found: {handle}")))
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Search products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(
        &self,
        query: &str,
        sort_key: Option<ProductOrderField>,
        reverse: bool,
    ) -> Result<Vec<Product>, SaleorError> {
        let variables = SearchProductsVariables {
            search: query.to_string(),
            channel: self.channel(),
            sort_by: search_sort_key(query, sort_key),
            sort_direction: OrderDirection::from_reverse(reverse),
        };

        let data = self
            .execute::<SearchProducts>(variables, FetchDirective::tagged(PRODUCTS))
            .await?;

        Ok(data
            .products
            .map(convert_product_connection)
            .unwrap_or_default())
    }

    /// The first `first` products of the channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_featured_products(&self, first: u32) -> Result<Vec<Product>, SaleorError> {
        let variables = FeaturedProductsVariables {
            first: i64::from(first),
            channel: self.channel(),
        };

        let data = self
            .execute::<GetFeaturedProducts>(variables, FetchDirective::tagged(PRODUCTS))
            .await?;

        Ok(data
            .products
            .map(convert_product_connection)
            .unwrap_or_default())
    }

    /// Get a product by handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product(&self, handle: &str) -> Result<Product, SaleorError> {
        let variables = SlugChannelVariables {
            slug: handle.to_string(),
            channel: self.channel(),
        };

        let data = self
            .execute::<GetProductBySlug>(variables, FetchDirective::tagged(PRODUCTS))
            .await?;

        data.product
            .map(convert_product)
            .ok_or_else(|| SaleorError::NotFound(format!("Product not found: {handle}")))
    }

    /// Related products. Saleor offers no recommendations query, so this is
    /// always empty.
    ///
    /// # Errors
    ///
    /// Never fails.
    #[allow(clippy::unused_async)]
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product_recommendations(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<Product>, SaleorError> {
        debug!("Product recommendations are not available");
        Ok(Vec::new())
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Get a page by handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the page is not found or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_page(&self, handle: &str) -> Result<Page, SaleorError> {
        let data = self
            .execute::<GetPageBySlug>(
                SlugVariables {
                    slug: handle.to_string(),
                },
                FetchDirective::default(),
            )
            .await?;

        data.page
            .map(convert_page)
            .ok_or_else(|| SaleorError::NotFound(format!("Page not found: {handle}")))
    }

    /// List the first pages.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_pages(&self) -> Result<Vec<Page>, SaleorError> {
        let data = self
            .execute::<GetPages>(NoVariables {}, FetchDirective::default())
            .await?;

        Ok(data
            .pages
            .map(into_nodes)
            .unwrap_or_default()
            .into_iter()
            .map(convert_page)
            .collect())
    }

    /// Get a flattened navigation menu.
    ///
    /// # Errors
    ///
    /// Returns an error if the menu is not found or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_menu(&self, handle: &str) -> Result<Vec<Menu>, SaleorError> {
        let menu_handle = MenuHandle::parse(handle);
        let variables = SlugChannelVariables {
            slug: menu_handle.slug().to_string(),
            channel: self.channel(),
        };

        let data = self
            .execute::<GetMenuBySlug>(variables, FetchDirective::default())
            .await?;

        let menu = data
            .menu
            .ok_or_else(|| SaleorError::NotFound(format!("Menu not found: {handle}")))?;

        Ok(convert_menu(
            menu,
            &self.inner.instance_origin,
            menu_handle.limit(),
        ))
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Get a cart by ID. `None` if Saleor does not know the checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &CartId) -> Result<Option<Cart>, SaleorError> {
        let data = self
            .execute::<GetCheckoutById>(
                CheckoutIdVariables {
                    id: cart_id.to_string(),
                },
                FetchDirective::NoStore,
            )
            .await?;

        Ok(data.checkout.map(convert_checkout))
    }

    /// Create an empty cart in the configured channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation yields no checkout or the API request fails.
    #[instrument(skip(self))]
    pub async fn create_cart(&self) -> Result<Cart, SaleorError> {
        let variables = CreateCheckoutVariables {
            input: CheckoutCreateInput {
                channel: self.channel(),
                lines: Vec::new(),
            },
        };

        let data = self
            .execute::<CreateCheckout>(variables, FetchDirective::NoStore)
            .await?;

        checkout_from_payload(data.checkout_create, "create checkout")
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation yields no checkout or the API request fails.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn add_to_cart(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, SaleorError> {
        let variables = CheckoutAddLineVariables {
            checkout_id: cart_id.to_string(),
            lines: lines
                .into_iter()
                .map(|line| super::queries::CheckoutLineInput {
                    variant_id: line.merchandise_id.into_inner(),
                    quantity: line.quantity,
                })
                .collect(),
        };

        let data = self
            .execute::<CheckoutAddLine>(variables, FetchDirective::NoStore)
            .await?;

        checkout_from_payload(data.checkout_lines_add, "add lines to checkout")
    }

    /// Change the quantity of cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation yields no checkout or the API request fails.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn update_cart(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, SaleorError> {
        let variables = CheckoutUpdateLineVariables {
            checkout_id: cart_id.to_string(),
            lines: lines
                .into_iter()
                .map(|line| CheckoutLineUpdateInput {
                    line_id: line.id.into_inner(),
                    quantity: line.quantity,
                })
                .collect(),
        };

        let data = self
            .execute::<CheckoutUpdateLine>(variables, FetchDirective::NoStore)
            .await?;

        checkout_from_payload(data.checkout_lines_update, "update lines in checkout")
    }

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation yields no checkout or the API request fails.
    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id))]
    pub async fn remove_from_cart(
        &self,
        cart_id: &CartId,
        line_ids: Vec<CartLineId>,
    ) -> Result<Cart, SaleorError> {
        let variables = CheckoutDeleteLineVariables {
            checkout_id: cart_id.to_string(),
            line_ids: line_ids.into_iter().map(CartLineId::into_inner).collect(),
        };

        let data = self
            .execute::<CheckoutDeleteLine>(variables, FetchDirective::NoStore)
            .await?;

        checkout_from_payload(data.checkout_lines_delete, "remove lines from checkout")
    }
}

/// Unwrap the checkout of a mutation payload, logging Saleor's error list
/// when there is none.
fn checkout_from_payload(
    payload: Option<CheckoutMutationPayload>,
    action: &str,
) -> Result<Cart, SaleorError> {
    match payload {
        Some(CheckoutMutationPayload {
            checkout: Some(checkout),
            ..
        }) => Ok(convert_checkout(checkout)),
        payload => {
            let errors = payload.map(|p| p.errors).unwrap_or_default();
            error!(errors = ?errors, "Couldn't {action}");
            Err(SaleorError::Mutation(format!("Couldn't {action}.")))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::queries::CheckoutErrorFields;
    use super::*;

    #[test]
    fn test_menu_handle_mapping() {
        let header = MenuHandle::parse("storefront-header-menu");
        assert_eq!(header, MenuHandle::Header);
        assert_eq!(header.slug(), "navbar");
        assert_eq!(header.limit(), Some(3));

        let footer = MenuHandle::parse("storefront-footer-menu");
        assert_eq!(footer.slug(), "footer");
        assert_eq!(footer.limit(), None);

        let other = MenuHandle::parse("sidebar");
        assert_eq!(other.slug(), "sidebar");
        assert_eq!(other.limit(), None);
    }

    #[test]
    fn test_next_js_menu_handles_are_accepted() {
        let header = MenuHandle::parse("next-js-frontend-header-menu");
        assert_eq!(header, MenuHandle::Header);
        assert_eq!(header.limit(), Some(3));

        assert_eq!(
            MenuHandle::parse("next-js-frontend-footer-menu"),
            MenuHandle::Footer
        );
    }

    #[test]
    fn test_checkout_from_payload_without_checkout() {
        let payload = CheckoutMutationPayload {
            errors: vec![CheckoutErrorFields {
                code: "INSUFFICIENT_STOCK".to_string(),
                message: Some("Not enough stock".to_string()),
                field: Some("quantity".to_string()),
            }],
            checkout: None,
        };

        let err = checkout_from_payload(Some(payload), "add lines to checkout").unwrap_err();
        assert!(matches!(err, SaleorError::Mutation(_)));
        assert_eq!(
            err.to_string(),
            "Mutation failed: Couldn't add lines to checkout."
        );
    }

    #[test]
    fn test_checkout_from_missing_payload() {
        let err = checkout_from_payload(None, "create checkout").unwrap_err();
        assert!(matches!(err, SaleorError::Mutation(_)));
    }

    #[test]
    fn test_cart_line_input_accepts_camel_case() {
        let input: CartLineInput =
            serde_json::from_str(r#"{"merchandiseId": "UHJvZHVjdFZhcmlhbnQ6MQ==", "quantity": 2}"#)
                .unwrap();
        assert_eq!(input.merchandise_id.as_str(), "UHJvZHVjdFZhcmlhbnQ6MQ==");
        assert_eq!(input.quantity, 2);
    }
}
