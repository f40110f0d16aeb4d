//! GraphQL query definitions for the Shopify Storefront API.
//!
//! Operations are derived from the documents under `graphql/storefront/queries`
//! against the schema subset in `graphql/storefront/schema.graphql`.

use graphql_client::GraphQLQuery;
use serde::Serialize;
use serde::de::DeserializeOwned;

// Scalar types for Shopify GraphQL schema
// Must be defined in the same module where GraphQLQuery derive is used
#[allow(clippy::upper_case_acronyms)]
type Decimal = String;
#[allow(clippy::upper_case_acronyms)]
type URL = String;
#[allow(clippy::upper_case_acronyms)]
type HTML = String;

// Layout queries
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/queries/layout.graphql",
    response_derives = "Debug, Clone"
)]
pub struct Header;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/queries/layout.graphql",
    response_derives = "Debug, Clone"
)]
pub struct Footer;

// Catalog & product queries
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/queries/products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct Catalog;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/queries/products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct Product;

// Cart query and mutations
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/queries/cart.graphql",
    response_derives = "Debug, Clone"
)]
pub struct Cart;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/queries/cart.graphql",
    response_derives = "Debug, Clone"
)]
pub struct CartCreate;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/queries/cart.graphql",
    response_derives = "Debug, Clone"
)]
pub struct CartLinesAdd;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/queries/cart.graphql",
    response_derives = "Debug, Clone"
)]
pub struct CartLinesUpdate;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/queries/cart.graphql",
    response_derives = "Debug, Clone"
)]
pub struct CartLinesRemove;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/queries/cart.graphql",
    response_derives = "Debug, Clone"
)]
pub struct CartDiscountCodesUpdate;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/queries/cart.graphql",
    response_derives = "Debug, Clone"
)]
pub struct CartGiftCardCodesUpdate;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/queries/cart.graphql",
    response_derives = "Debug, Clone"
)]
pub struct CartGiftCardCodesRemove;

/// Map a code such as `"CA"` onto a generated schema enum.
///
/// Generated enums fall back to their `Other` variant, so unknown codes still
/// reach Shopify verbatim.
pub(crate) fn schema_enum<T: DeserializeOwned>(code: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(code.to_string())).ok()
}

/// Wire name of a generated schema enum value.
pub(crate) fn enum_str<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(name)) => name,
        _ => String::new(),
    }
}
