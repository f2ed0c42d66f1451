//! Newtype IDs for type-safe entity references.
//!
//! Saleor identifies every node with an opaque, base64-encoded global ID
//! (e.g. `UHJvZHVjdDo3Mg==`). Use the `define_id!` macro to create wrappers
//! that prevent accidentally passing a checkout line ID where a variant ID
//! is expected.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use saleor_storefront_core::define_id;
/// define_id!(WarehouseId);
/// define_id!(ChannelId);
///
/// let warehouse = WarehouseId::new("V2FyZWhvdXNlOjE=");
/// let channel = ChannelId::new("V2FyZWhvdXNlOjE=");
///
/// // These are different types, so this won't compile:
/// // let _: WarehouseId = channel;
/// assert_eq!(warehouse.as_str(), channel.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a Saleor global ID.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying global ID.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the global ID.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(VariantId);
define_id!(CollectionId);
define_id!(PageId);
define_id!(CartId);
define_id!(CartLineId);
