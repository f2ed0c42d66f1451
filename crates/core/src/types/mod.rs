//! Core types for the Saleor storefront.

pub mod cart;
pub mod catalog;
pub mod content;
pub mod id;
pub mod money;

pub use cart::{Cart, CartCost, CartLine, CartMerchandise};
pub use catalog::{
    Collection, Image, PriceRange, Product, ProductOption, ProductVariant, SelectedOption, Seo,
};
pub use content::{Menu, Page};
pub use id::*;
pub use money::Money;
