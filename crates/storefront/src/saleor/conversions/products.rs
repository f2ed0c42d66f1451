//! Product type conversion functions.

use saleor_storefront_core::{
    Image, Money, PriceRange, Product, ProductId, ProductOption, ProductVariant, SelectedOption,
    Seo, VariantId,
};

use super::super::queries::{
    Connection, MediaFields, ProductDetails, ProductPricingFields, SelectedAttributeFields,
    VariantFields,
};
use super::{convert_money, into_nodes, rich_text};

const IMAGE_MEDIA: &str = "IMAGE";

pub fn convert_product(product: ProductDetails) -> Product {
    let available_for_sale = product.is_available_for_purchase.unwrap_or(false);
    let description = rich_text::render(product.description.as_deref().unwrap_or_default());
    let variant_fields = product.variants.unwrap_or_default();

    let images: Vec<Image> = product
        .media
        .unwrap_or_default()
        .into_iter()
        .filter(|media| media.kind == IMAGE_MEDIA)
        .map(|media| convert_image(media, &product.name))
        .collect();

    let options = convert_options(&variant_fields);
    let price_range = convert_price_range(product.pricing.as_ref(), &variant_fields);
    let variants = variant_fields
        .into_iter()
        .map(|variant| convert_variant(variant, available_for_sale))
        .collect();

    let seo = Seo {
        title: product
            .seo_title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| product.name.clone()),
        description: product.seo_description.unwrap_or_default(),
    };

    Product {
        id: ProductId::new(product.id),
        handle: product.slug,
        available_for_sale,
        title: product.name,
        description: description.text,
        description_html: description.html,
        options,
        price_range,
        variants,
        featured_image: images.first().cloned(),
        images,
        seo,
        tags: product
            .collections
            .unwrap_or_default()
            .into_iter()
            .filter_map(|collection| collection.name)
            .collect(),
        updated_at: product.updated_at,
    }
}

/// Convert a product connection, preserving edge order.
pub fn convert_product_connection(connection: Connection<ProductDetails>) -> Vec<Product> {
    into_nodes(connection)
        .into_iter()
        .map(convert_product)
        .collect()
}

pub(super) fn convert_variant(variant: VariantFields, available_for_sale: bool) -> ProductVariant {
    let price = variant
        .pricing
        .and_then(|pricing| pricing.price)
        .map_or_else(|| Money::zero(String::new()), |price| convert_money(price.gross));

    ProductVariant {
        id: VariantId::new(variant.id),
        title: variant.name,
        available_for_sale,
        selected_options: convert_selected_options(&variant.attributes),
        price,
    }
}

pub(super) fn convert_selected_options(
    attributes: &[SelectedAttributeFields],
) -> Vec<SelectedOption> {
    attributes
        .iter()
        .filter_map(|attr| {
            Some(SelectedOption {
                name: attr.attribute.name.clone()?,
                value: attr.values.first()?.name.clone()?,
            })
        })
        .collect()
}

fn convert_image(media: MediaFields, product_name: &str) -> Image {
    let alt_text = if media.alt.is_empty() {
        product_name.to_string()
    } else {
        media.alt
    };

    Image {
        url: media.url,
        alt_text,
    }
}

/// Aggregate the attributes of every variant into product options.
///
/// Declared attribute choices come first, followed by any other values the
/// variants carry. Options keep the order in which they first appear.
fn convert_options(variants: &[VariantFields]) -> Vec<ProductOption> {
    let mut options: Vec<ProductOption> = Vec::new();

    for attr in variants.iter().flat_map(|variant| &variant.attributes) {
        let Some(name) = attr.attribute.name.clone() else {
            continue;
        };
        let id = attr.attribute.slug.clone().unwrap_or_else(|| name.clone());

        let index = if let Some(index) = options.iter().position(|option| option.id == id) {
            index
        } else {
            let values = attr
                .attribute
                .choices
                .iter()
                .flat_map(|choices| &choices.edges)
                .filter_map(|edge| edge.node.name.clone())
                .collect();
            options.push(ProductOption { id, name, values });
            options.len() - 1
        };

        if let Some(option) = options.get_mut(index) {
            for value in attr.values.iter().filter_map(|value| value.name.as_ref()) {
                if !option.values.contains(value) {
                    option.values.push(value.clone());
                }
            }
        }
    }

    options
}

fn convert_price_range(
    pricing: Option<&ProductPricingFields>,
    variants: &[VariantFields],
) -> PriceRange {
    let range = pricing.and_then(|pricing| pricing.price_range.as_ref());

    let start = range
        .and_then(|range| range.start.as_ref())
        .map(|start| convert_money(start.gross.clone()));
    let stop = range
        .and_then(|range| range.stop.as_ref())
        .map(|stop| convert_money(stop.gross.clone()));

    let fallback = || {
        let currency = variants
            .iter()
            .find_map(|variant| variant.pricing.as_ref()?.price.as_ref())
            .map(|price| price.gross.currency.clone())
            .unwrap_or_default();
        Money::zero(currency)
    };

    match (start, stop) {
        (Some(min), Some(max)) => PriceRange {
            min_variant_price: min,
            max_variant_price: max,
        },
        (Some(only), None) | (None, Some(only)) => PriceRange {
            min_variant_price: only.clone(),
            max_variant_price: only,
        },
        (None, None) => PriceRange {
            min_variant_price: fallback(),
            max_variant_price: fallback(),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
pub(crate) mod tests {
    use rust_decimal::Decimal;
    use serde_json::{Value, json};

    use super::*;

    pub(crate) fn product_json(slug: &str) -> Value {
        json!({
            "id": format!("UHJvZHVjdDo{slug}"),
            "slug": slug,
            "name": format!("Product {slug}"),
            "isAvailableForPurchase": true,
            "description": "{\"blocks\":[{\"type\":\"paragraph\",\"data\":{\"text\":\"Tasty\"}}]}",
            "seoTitle": "",
            "seoDescription": null,
            "pricing": {
                "priceRange": {
                    "start": { "gross": { "currency": "USD", "amount": 5.0 } },
                    "stop": { "gross": { "currency": "USD", "amount": 7.5 } }
                }
            },
            "media": [
                { "url": "https://cdn.example.com/a.png", "type": "IMAGE", "alt": "" },
                { "url": "https://youtu.be/x", "type": "VIDEO", "alt": "video" },
                { "url": "https://cdn.example.com/b.png", "type": "IMAGE", "alt": "Back" }
            ],
            "collections": [{ "name": "Summer" }, { "name": "Drinks" }],
            "updatedAt": "2024-03-01T10:00:00+00:00",
            "variants": [
                {
                    "id": format!("{slug}-small"),
                    "name": "Small",
                    "attributes": [{
                        "attribute": {
                            "slug": "size",
                            "name": "Size",
                            "choices": { "edges": [
                                { "node": { "name": "Small" } },
                                { "node": { "name": "Large" } }
                            ] }
                        },
                        "values": [{ "name": "Small" }]
                    }],
                    "pricing": { "price": { "gross": { "currency": "USD", "amount": 5.0 } } }
                },
                {
                    "id": format!("{slug}-large"),
                    "name": "Large",
                    "attributes": [{
                        "attribute": { "slug": "size", "name": "Size", "choices": null },
                        "values": [{ "name": "Large" }]
                    }, {
                        "attribute": { "slug": "flavor", "name": "Flavor", "choices": null },
                        "values": [{ "name": "Mango" }]
                    }],
                    "pricing": { "price": { "gross": { "currency": "USD", "amount": 7.5 } } }
                }
            ]
        })
    }

    fn details(slug: &str) -> ProductDetails {
        serde_json::from_value(product_json(slug)).unwrap()
    }

    #[test]
    fn test_convert_product_fields() {
        let product = convert_product(details("juice"));

        assert_eq!(product.handle, "juice");
        assert_eq!(product.title, "Product juice");
        assert!(product.available_for_sale);
        assert_eq!(product.description, "Tasty");
        assert_eq!(product.description_html, "<p>Tasty</p>");
        assert_eq!(product.tags, vec!["Summer", "Drinks"]);
        assert_eq!(product.seo.title, "Product juice");
        assert_eq!(product.seo.description, "");
    }

    #[test]
    fn test_convert_product_price_range() {
        let product = convert_product(details("juice"));

        assert_eq!(product.price_range.min_variant_price.amount, Decimal::new(5, 0));
        assert_eq!(product.price_range.max_variant_price.amount, Decimal::new(75, 1));
        assert_eq!(product.price_range.max_variant_price.currency_code, "USD");
    }

    #[test]
    fn test_convert_product_images_skip_non_image_media() {
        let product = convert_product(details("juice"));

        assert_eq!(product.images.len(), 2);
        assert_eq!(product.images[0].alt_text, "Product juice");
        assert_eq!(product.images[1].alt_text, "Back");
        assert_eq!(product.featured_image, Some(product.images[0].clone()));
    }

    #[test]
    fn test_convert_product_options_aggregate_variants() {
        let product = convert_product(details("juice"));

        assert_eq!(product.options.len(), 2);
        assert_eq!(product.options[0].id, "size");
        assert_eq!(product.options[0].values, vec!["Small", "Large"]);
        assert_eq!(product.options[1].name, "Flavor");
        assert_eq!(product.options[1].values, vec!["Mango"]);
    }

    #[test]
    fn test_convert_product_variants() {
        let product = convert_product(details("juice"));

        assert_eq!(product.variants.len(), 2);
        let large = &product.variants[1];
        assert_eq!(large.id.as_str(), "juice-large");
        assert_eq!(large.price.amount, Decimal::new(75, 1));
        assert_eq!(large.selected_options.len(), 2);
        assert_eq!(large.selected_options[1].value, "Mango");
    }

    #[test]
    fn test_convert_product_without_pricing_uses_zero() {
        let mut json = product_json("bare");
        json["pricing"] = Value::Null;
        json["variants"] = json!([]);
        let product = convert_product(serde_json::from_value(json).unwrap());

        assert_eq!(product.price_range.min_variant_price, Money::zero(""));
        assert!(product.variants.is_empty());
        assert!(product.options.is_empty());
    }

    #[test]
    fn test_convert_connection_preserves_order() {
        let json = json!({
            "edges": [
                { "node": product_json("first") },
                { "node": product_json("second") },
                { "node": product_json("third") }
            ]
        });
        let connection: Connection<ProductDetails> = serde_json::from_value(json).unwrap();

        let products = convert_product_connection(connection);

        let handles: Vec<_> = products.iter().map(|p| p.handle.as_str()).collect();
        assert_eq!(handles, vec!["first", "second", "third"]);
    }
}
