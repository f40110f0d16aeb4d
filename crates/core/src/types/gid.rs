//! Shopify global IDs.
//!
//! Every Storefront API object is addressed by a global ID of the form
//! `gid://shopify/<Resource>/<id>`, optionally followed by a query string
//! (cart and cart-line IDs carry `?key=...`). IDs arriving from HTML forms are
//! parsed into one of the typed wrappers below before being sent upstream, so
//! a line ID can never be passed where a variant ID is expected.

/// Prefix shared by all Shopify global IDs.
pub const GID_PREFIX: &str = "gid://shopify/";

/// Errors that can occur when parsing a global ID.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GidError {
    /// The value does not start with `gid://shopify/`.
    #[error("global id must start with {GID_PREFIX}")]
    MissingPrefix,
    /// The value addresses a different resource type.
    #[error("expected a {expected} id, got {found}")]
    WrongResource {
        /// Resource type the caller asked for.
        expected: &'static str,
        /// Resource type found in the value.
        found: String,
    },
    /// Nothing follows the resource type.
    #[error("global id is missing the resource id")]
    MissingId,
}

/// Split a global ID into `(resource, id)`; the id keeps any query string.
///
/// # Errors
///
/// Returns an error if the prefix is missing or no id follows the resource.
pub fn split_gid(value: &str) -> Result<(&str, &str), GidError> {
    let rest = value
        .trim()
        .strip_prefix(GID_PREFIX)
        .ok_or(GidError::MissingPrefix)?;
    let (resource, id) = rest.split_once('/').ok_or(GidError::MissingId)?;
    let bare = id.split('?').next().unwrap_or_default();
    if resource.is_empty() || bare.is_empty() {
        return Err(GidError::MissingId);
    }
    Ok((resource, id))
}

/// Macro to define a typed global-ID wrapper for one Shopify resource.
///
/// Creates a newtype wrapper around `String` with:
/// - `parse()` validating prefix and resource type
/// - `as_str()`, `id()` (the bare id without query string)
/// - `Display`, `FromStr`, `AsRef<str>`
/// - `Serialize`/`Deserialize` that validate on the way in
///
/// # Example
///
/// ```rust
/// # use veridian_orchard_core::define_gid;
/// define_gid!(CollectionGid, "Collection");
///
/// let id = CollectionGid::parse("gid://shopify/Collection/42").unwrap();
/// assert_eq!(id.id(), "42");
/// assert!(CollectionGid::parse("gid://shopify/Product/42").is_err());
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident, $resource:literal) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Shopify resource type addressed by this ID.
            pub const RESOURCE: &'static str = $resource;

            /// Parse a global ID, checking the resource type.
            ///
            /// # Errors
            ///
            /// Returns an error if the value is not a global ID for this resource.
            pub fn parse(value: &str) -> ::core::result::Result<Self, $crate::GidError> {
                let (resource, _) = $crate::split_gid(value)?;
                if resource != Self::RESOURCE {
                    return Err($crate::GidError::WrongResource {
                        expected: Self::RESOURCE,
                        found: resource.to_string(),
                    });
                }
                Ok(Self(value.trim().to_string()))
            }

            /// The full global ID.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The bare resource id, without prefix or query string.
            #[must_use]
            pub fn id(&self) -> &str {
                $crate::split_gid(&self.0)
                    .map(|(_, id)| id.split('?').next().unwrap_or_default())
                    .unwrap_or_default()
            }

            /// Consume and return the full global ID.
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

        impl ::core::str::FromStr for $name {
            type Err = $crate::GidError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl ::core::convert::TryFrom<String> for $name {
            type Error = $crate::GidError;

            fn try_from(value: String) -> ::core::result::Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_gid!(ProductVariantGid, "ProductVariant");
define_gid!(CartGid, "Cart");
define_gid!(CartLineGid, "CartLine");
define_gid!(AppliedGiftCardGid, "AppliedGiftCard");
