//! Cart records projected from Saleor checkouts.

use serde::{Deserialize, Serialize};

use super::catalog::{Product, SelectedOption};
use super::id::{CartId, CartLineId, VariantId};
use super::money::Money;

/// Cart totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCost {
    pub subtotal_amount: Money,
    pub total_amount: Money,
    pub total_tax_amount: Money,
}

/// The variant a cart line refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartMerchandise {
    pub id: VariantId,
    pub title: String,
    pub selected_options: Vec<SelectedOption>,
    pub product: Product,
}

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub quantity: u32,
    /// Unit price times quantity.
    pub total_amount: Money,
    pub merchandise: CartMerchandise,
}

/// A shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    pub cost: CartCost,
    pub lines: Vec<CartLine>,
    pub total_quantity: u32,
}

impl Cart {
    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
