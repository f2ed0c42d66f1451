//! GraphQL operation definitions for the Saleor API.
//!
//! Each operation is a zero-sized type implementing [`GraphQLQuery`], so the
//! document, its variables and its response shape travel together and the
//! fetch facade is generic over the operation instead of dispatching on
//! document strings.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

use super::sorting::{OrderDirection, ProductOrderField};

// =============================================================================
// Fragments
// =============================================================================

macro_rules! variant_fragment {
    () => {
        r"
fragment Variant on ProductVariant {
  id
  name
  attributes {
    attribute {
      slug
      name
      choices(first: 100) {
        edges {
          node {
            name
          }
        }
      }
    }
    values {
      name
    }
  }
  pricing {
    price {
      gross {
        currency
        amount
      }
    }
  }
}
"
    };
}

macro_rules! product_details_fragment {
    () => {
        r"
fragment ProductDetails on Product {
  id
  slug
  name
  isAvailableForPurchase
  description
  seoTitle
  seoDescription
  pricing {
    priceRange {
      start {
        gross {
          currency
          amount
        }
      }
      stop {
        gross {
          currency
          amount
        }
      }
    }
  }
  media {
    url(size: 2160)
    type
    alt
  }
  collections {
    name
  }
  updatedAt
  variants {
    ...Variant
  }
}
"
    };
}

macro_rules! checkout_fragment {
    () => {
        r"
fragment Checkout on Checkout {
  id
  totalPrice {
    gross {
      currency
      amount
    }
    tax {
      currency
      amount
    }
  }
  subtotalPrice {
    gross {
      currency
      amount
    }
  }
  quantity
  lines {
    id
    quantity
    variant {
      ...Variant
      product {
        ...ProductDetails
      }
    }
  }
}
"
    };
}

macro_rules! collection_summary_fields {
    () => {
        r"
    id
    name
    slug
    description
    seoTitle
    seoDescription
"
    };
}

macro_rules! menu_item_fragment {
    () => {
        r"
fragment MenuItem on MenuItem {
  id
  name
  url
  collection {
    slug
    products(first: 0) {
      totalCount
    }
  }
  category {
    slug
    products(channel: $channel, first: 0) {
      totalCount
    }
  }
  page {
    slug
  }
}
"
    };
}

/// Declare an operation type bound to its document and shapes.
macro_rules! operation {
    ($(#[$meta:meta])* $name:ident, $variables:ty, $data:ty, $document:expr) => {
        $(#[$meta])*
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $variables;
            type ResponseData = $data;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $document,
                    operation_name: stringify!($name),
                }
            }
        }
    };
}

// =============================================================================
// Shared response shapes
// =============================================================================

/// Relay-style connection.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoneyFields {
    pub currency: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GrossFields {
    pub gross: MoneyFields,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaxedMoneyFields {
    pub gross: MoneyFields,
    pub tax: MoneyFields,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NameFields {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlugFields {
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedAtFields {
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeFields {
    pub start: Option<GrossFields>,
    pub stop: Option<GrossFields>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPricingFields {
    pub price_range: Option<PriceRangeFields>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaFields {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub alt: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttributeFields {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub choices: Option<Connection<NameFields>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectedAttributeFields {
    pub attribute: AttributeFields,
    #[serde(default)]
    pub values: Vec<NameFields>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariantPricingFields {
    pub price: Option<GrossFields>,
}

/// `fragment Variant on ProductVariant`
#[derive(Debug, Clone, Deserialize)]
pub struct VariantFields {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<SelectedAttributeFields>,
    pub pricing: Option<VariantPricingFields>,
}

/// `fragment ProductDetails on Product`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub is_available_for_purchase: Option<bool>,
    /// Editor.js JSON document.
    pub description: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub pricing: Option<ProductPricingFields>,
    pub media: Option<Vec<MediaFields>>,
    pub collections: Option<Vec<NameFields>>,
    pub updated_at: String,
    pub variants: Option<Vec<VariantFields>>,
}

/// Collection or category summary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub products: Option<Connection<UpdatedAtFields>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductListFields {
    pub products: Option<Connection<ProductDetails>>,
}

/// A CMS page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFields {
    pub id: String,
    pub title: String,
    pub slug: String,
    /// Editor.js JSON document.
    pub content: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub created: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountableFields {
    pub total_count: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MenuTargetFields {
    pub slug: String,
    pub products: Option<CountableFields>,
}

/// `fragment MenuItem on MenuItem`, nested through `children`.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuItemFields {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
    pub collection: Option<MenuTargetFields>,
    pub category: Option<MenuTargetFields>,
    pub page: Option<SlugFields>,
    pub children: Option<Vec<MenuItemFields>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MenuFields {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub items: Option<Vec<MenuItemFields>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutLineVariantFields {
    #[serde(flatten)]
    pub variant: VariantFields,
    pub product: ProductDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutLineFields {
    pub id: String,
    pub quantity: i64,
    pub variant: CheckoutLineVariantFields,
}

/// `fragment Checkout on Checkout`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutFields {
    pub id: String,
    pub total_price: TaxedMoneyFields,
    pub subtotal_price: GrossFields,
    pub quantity: i64,
    #[serde(default)]
    pub lines: Vec<CheckoutLineFields>,
}

/// Error reported inside a checkout mutation payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckoutErrorFields {
    pub code: String,
    pub message: Option<String>,
    pub field: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutMutationPayload {
    #[serde(default)]
    pub errors: Vec<CheckoutErrorFields>,
    pub checkout: Option<CheckoutFields>,
}

// =============================================================================
// Shared variables
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ChannelVariables {
    pub channel: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlugVariables {
    pub slug: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlugChannelVariables {
    pub slug: String,
    pub channel: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortedProductsVariables {
    pub slug: String,
    pub channel: String,
    pub sort_by: ProductOrderField,
    pub sort_direction: OrderDirection,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoVariables {}

// =============================================================================
// Collection and category queries
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct GetCollectionsData {
    pub collections: Option<Connection<CollectionSummary>>,
}

operation!(
    /// All collections in the channel.
    GetCollections,
    ChannelVariables,
    GetCollectionsData,
    concat!(
        r"query GetCollections($channel: String!) {
  collections(channel: $channel, first: 100) {
    edges {
      node {",
        collection_summary_fields!(),
        r"        products(first: 1, sortBy: {field: LAST_MODIFIED_AT, direction: DESC}) {
          edges {
            node {
              updatedAt
            }
          }
        }
      }
    }
  }
}"
    )
);

#[derive(Debug, Clone, Deserialize)]
pub struct GetCollectionBySlugData {
    pub collection: Option<CollectionSummary>,
}

operation!(
    GetCollectionBySlug,
    SlugChannelVariables,
    GetCollectionBySlugData,
    concat!(
        r"query GetCollectionBySlug($slug: String!, $channel: String!) {
  collection(channel: $channel, slug: $slug) {",
        collection_summary_fields!(),
        r"    products(first: 1, sortBy: {field: LAST_MODIFIED_AT, direction: DESC}) {
      edges {
        node {
          updatedAt
        }
      }
    }
  }
}"
    )
);

#[derive(Debug, Clone, Deserialize)]
pub struct GetCategoryBySlugData {
    pub category: Option<CollectionSummary>,
}

operation!(
    GetCategoryBySlug,
    SlugChannelVariables,
    GetCategoryBySlugData,
    concat!(
        r"query GetCategoryBySlug($slug: String!, $channel: String!) {
  category(slug: $slug) {",
        collection_summary_fields!(),
        r"    products(channel: $channel, first: 1, sortBy: {field: LAST_MODIFIED_AT, direction: DESC}) {
      edges {
        node {
          updatedAt
        }
      }
    }
  }
}"
    )
);

#[derive(Debug, Clone, Deserialize)]
pub struct GetCollectionProductsBySlugData {
    pub collection: Option<ProductListFields>,
}

operation!(
    GetCollectionProductsBySlug,
    SortedProductsVariables,
    GetCollectionProductsBySlugData,
    concat!(
        r"query GetCollectionProductsBySlug($slug: String!, $channel: String!, $sortBy: ProductOrderField!, $sortDirection: OrderDirection!) {
  collection(channel: $channel, slug: $slug) {
    products(first: 100, sortBy: {field: $sortBy, direction: $sortDirection}) {
      edges {
        node {
          ...ProductDetails
        }
      }
    }
  }
}",
        product_details_fragment!(),
        variant_fragment!()
    )
);

#[derive(Debug, Clone, Deserialize)]
pub struct GetCategoryProductsBySlugData {
    pub category: Option<ProductListFields>,
}

operation!(
    GetCategoryProductsBySlug,
    SortedProductsVariables,
    GetCategoryProductsBySlugData,
    concat!(
        r"query GetCategoryProductsBySlug($slug: String!, $channel: String!, $sortBy: ProductOrderField!, $sortDirection: OrderDirection!) {
  category(slug: $slug) {
    products(channel: $channel, first: 100, sortBy: {field: $sortBy, direction: $sortDirection}) {
      edges {
        node {
          ...ProductDetails
        }
      }
    }
  }
}",
        product_details_fragment!(),
        variant_fragment!()
    )
);

// =============================================================================
// Product queries
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchProductsVariables {
    pub search: String,
    pub channel: String,
    pub sort_by: ProductOrderField,
    pub sort_direction: OrderDirection,
}

operation!(
    /// Free-text product search.
    SearchProducts,
    SearchProductsVariables,
    ProductListFields,
    concat!(
        r"query SearchProducts($search: String!, $channel: String!, $sortBy: ProductOrderField!, $sortDirection: OrderDirection!) {
  products(
    first: 100
    channel: $channel
    sortBy: {field: $sortBy, direction: $sortDirection}
    filter: {search: $search}
  ) {
    edges {
      node {
        ...ProductDetails
      }
    }
  }
}",
        product_details_fragment!(),
        variant_fragment!()
    )
);

#[derive(Debug, Clone, Serialize)]
pub struct FeaturedProductsVariables {
    pub first: i64,
    pub channel: String,
}

operation!(
    GetFeaturedProducts,
    FeaturedProductsVariables,
    ProductListFields,
    concat!(
        r"query GetFeaturedProducts($first: Int!, $channel: String!) {
  products(first: $first, channel: $channel) {
    edges {
      node {
        ...ProductDetails
      }
    }
  }
}",
        product_details_fragment!(),
        variant_fragment!()
    )
);

#[derive(Debug, Clone, Deserialize)]
pub struct GetProductBySlugData {
    pub product: Option<ProductDetails>,
}

operation!(
    GetProductBySlug,
    SlugChannelVariables,
    GetProductBySlugData,
    concat!(
        r"query GetProductBySlug($slug: String!, $channel: String!) {
  product(channel: $channel, slug: $slug) {
    ...ProductDetails
  }
}",
        product_details_fragment!(),
        variant_fragment!()
    )
);

// =============================================================================
// Content queries
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct GetPageBySlugData {
    pub page: Option<PageFields>,
}

operation!(
    GetPageBySlug,
    SlugVariables,
    GetPageBySlugData,
    r"query GetPageBySlug($slug: String!) {
  page(slug: $slug) {
    id
    title
    slug
    content
    seoTitle
    seoDescription
    created
  }
}"
);

#[derive(Debug, Clone, Deserialize)]
pub struct GetPagesData {
    pub pages: Option<Connection<PageFields>>,
}

operation!(
    GetPages,
    NoVariables,
    GetPagesData,
    r"query GetPages {
  pages(first: 10) {
    edges {
      node {
        id
        title
        slug
        content
        seoTitle
        seoDescription
        created
      }
    }
  }
}"
);

#[derive(Debug, Clone, Deserialize)]
pub struct GetMenuBySlugData {
    pub menu: Option<MenuFields>,
}

operation!(
    /// Menu tree, four levels deep.
    GetMenuBySlug,
    SlugChannelVariables,
    GetMenuBySlugData,
    concat!(
        r"query GetMenuBySlug($slug: String!, $channel: String!) {
  menu(slug: $slug, channel: $channel) {
    id
    slug
    name
    items {
      ...MenuItem
      children {
        ...MenuItem
        children {
          ...MenuItem
          children {
            ...MenuItem
          }
        }
      }
    }
  }
}",
        menu_item_fragment!()
    )
);

// =============================================================================
// Checkout queries and mutations
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutIdVariables {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetCheckoutByIdData {
    pub checkout: Option<CheckoutFields>,
}

operation!(
    GetCheckoutById,
    CheckoutIdVariables,
    GetCheckoutByIdData,
    concat!(
        r"query GetCheckoutById($id: ID!) {
  checkout(id: $id) {
    ...Checkout
  }
}",
        checkout_fragment!(),
        product_details_fragment!(),
        variant_fragment!()
    )
);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLineInput {
    pub variant_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLineUpdateInput {
    pub line_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutCreateInput {
    pub channel: String,
    pub lines: Vec<CheckoutLineInput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCheckoutVariables {
    pub input: CheckoutCreateInput,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutData {
    pub checkout_create: Option<CheckoutMutationPayload>,
}

operation!(
    CreateCheckout,
    CreateCheckoutVariables,
    CreateCheckoutData,
    concat!(
        r"mutation CreateCheckout($input: CheckoutCreateInput!) {
  checkoutCreate(input: $input) {
    errors {
      code
      message
      field
    }
    checkout {
      ...Checkout
    }
  }
}",
        checkout_fragment!(),
        product_details_fragment!(),
        variant_fragment!()
    )
);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutAddLineVariables {
    pub checkout_id: String,
    pub lines: Vec<CheckoutLineInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutAddLineData {
    pub checkout_lines_add: Option<CheckoutMutationPayload>,
}

operation!(
    CheckoutAddLine,
    CheckoutAddLineVariables,
    CheckoutAddLineData,
    concat!(
        r"mutation CheckoutAddLine($checkoutId: ID!, $lines: [CheckoutLineInput!]!) {
  checkoutLinesAdd(id: $checkoutId, lines: $lines) {
    errors {
      code
      message
      field
    }
    checkout {
      ...Checkout
    }
  }
}",
        checkout_fragment!(),
        product_details_fragment!(),
        variant_fragment!()
    )
);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutUpdateLineVariables {
    pub checkout_id: String,
    pub lines: Vec<CheckoutLineUpdateInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutUpdateLineData {
    pub checkout_lines_update: Option<CheckoutMutationPayload>,
}

operation!(
    CheckoutUpdateLine,
    CheckoutUpdateLineVariables,
    CheckoutUpdateLineData,
    concat!(
        r"mutation CheckoutUpdateLine($checkoutId: ID!, $lines: [CheckoutLineUpdateInput!]!) {
  checkoutLinesUpdate(id: $checkoutId, lines: $lines) {
    errors {
      code
      message
      field
    }
    checkout {
      ...Checkout
    }
  }
}",
        checkout_fragment!(),
        product_details_fragment!(),
        variant_fragment!()
    )
);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDeleteLineVariables {
    pub checkout_id: String,
    pub line_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDeleteLineData {
    pub checkout_lines_delete: Option<CheckoutMutationPayload>,
}

operation!(
    CheckoutDeleteLine,
    CheckoutDeleteLineVariables,
    CheckoutDeleteLineData,
    concat!(
        r"mutation CheckoutDeleteLine($checkoutId: ID!, $lineIds: [ID!]!) {
  checkoutLinesDelete(id: $checkoutId, linesIds: $lineIds) {
    errors {
      code
      message
      field
    }
    checkout {
      ...Checkout
    }
  }
}",
        checkout_fragment!(),
        product_details_fragment!(),
        variant_fragment!()
    )
);
