//! Conversion of Saleor API responses into storefront domain records.
//!
//! Every function here is pure: missing optional fields fall back to
//! defaults instead of failing.

pub mod cart;
pub mod collections;
pub mod menus;
pub mod pages;
pub mod products;
pub mod rich_text;

use rust_decimal::Decimal;
use saleor_storefront_core::Money;

use super::queries::{Connection, MoneyFields};

pub use cart::convert_checkout;
pub use collections::convert_collection;
pub use menus::{convert_menu, flatten_menu_items};
pub use pages::convert_page;
pub use products::{convert_product, convert_product_connection};

fn convert_money(money: MoneyFields) -> Money {
    Money::new(
        Decimal::try_from(money.amount).unwrap_or_default(),
        money.currency,
    )
}

/// Collapse a connection into its nodes, preserving order.
pub fn into_nodes<T>(connection: Connection<T>) -> Vec<T> {
    connection.edges.into_iter().map(|edge| edge.node).collect()
}
