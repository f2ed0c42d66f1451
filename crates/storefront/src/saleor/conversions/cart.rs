//! Cart type conversion functions.

use saleor_storefront_core::{
    Cart, CartCost, CartId, CartLine, CartLineId, CartMerchandise, Money, VariantId,
};

use super::super::queries::{CheckoutFields, CheckoutLineFields};
use super::convert_money;
use super::products::{convert_product, convert_selected_options};

/// Convert a Saleor checkout into a cart.
pub fn convert_checkout(checkout: CheckoutFields) -> Cart {
    let cost = CartCost {
        subtotal_amount: convert_money(checkout.subtotal_price.gross),
        total_amount: convert_money(checkout.total_price.gross),
        total_tax_amount: convert_money(checkout.total_price.tax),
    };

    Cart {
        id: CartId::new(checkout.id),
        cost,
        lines: checkout.lines.into_iter().map(convert_line).collect(),
        total_quantity: clamp_quantity(checkout.quantity),
    }
}

fn convert_line(line: CheckoutLineFields) -> CartLine {
    let quantity = clamp_quantity(line.quantity);
    let variant = line.variant.variant;

    let unit_price = variant
        .pricing
        .and_then(|pricing| pricing.price)
        .map_or_else(|| Money::zero(String::new()), |price| convert_money(price.gross));

    CartLine {
        id: CartLineId::new(line.id),
        quantity,
        total_amount: unit_price.times(quantity),
        merchandise: CartMerchandise {
            id: VariantId::new(variant.id),
            title: variant.name,
            selected_options: convert_selected_options(&variant.attributes),
            product: convert_product(line.variant.product),
        },
    }
}

fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity).unwrap_or(0)
}
