//! Saleor Storefront Core - Shared domain records.
//!
//! This crate provides the flattened, framework-agnostic records that the
//! storefront hands to rendering code:
//! - Catalog records (`Product`, `Collection`) projected from the Saleor graph
//! - Content records (`Page`, `Menu`)
//! - Cart records projected from Saleor checkouts
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Records are
//! built fresh on every fetch and never mutated in place; their only identity
//! is the remote system's own IDs.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money, and the domain records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
