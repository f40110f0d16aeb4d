//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                            - Redirect to the catalog
//! GET  /health                      - Health check
//!
//! # Catalog
//! GET  /collections/all             - All products (cursor paginated)
//! GET  /{locale}/collections/all    - All products in a locale context
//! GET  /products/{handle}           - Product detail
//! GET  /{locale}/products/{handle}  - Product detail in a locale context
//!
//! # Cart (HTMX fragments)
//! GET  /cart                        - Cart page
//! POST /cart/add                    - Add to cart (returns add-to-cart button)
//! GET  /cart/add-button             - Idle add-to-cart button
//! POST /cart/update                 - Update quantity (returns cart fragment)
//! POST /cart/remove                 - Remove line (returns cart fragment)
//! POST /cart/discounts              - Apply or remove a discount code
//! POST /cart/gift-cards             - Apply a gift card
//! POST /cart/gift-cards/remove      - Remove an applied gift card
//! GET  /cart/count                  - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout                    - Redirect to Shopify checkout
//!
//! # Forms (rate limited)
//! GET  /contact                     - Contact page
//! POST /contact                     - Submit contact form
//! POST /newsletter                  - Footer newsletter signup
//! ```

pub mod cart;
pub mod collections;
pub mod contact;
pub mod newsletter;
pub mod products;

use axum::{
    Router,
    http::HeaderMap,
    response::Redirect,
    routing::{get, post},
};
use veridian_orchard_core::Locale;

use crate::error::AppError;
use crate::middleware::form_rate_limiter;
use crate::state::AppState;

/// Whether the request was issued by htmx rather than a plain form post.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .is_some_and(|value| value.as_bytes().eq_ignore_ascii_case(b"true"))
}

/// Parse the `{locale}` path segment.
///
/// Unknown segments are a 404 rather than a 400: `/{locale}/...` also
/// catches arbitrary mistyped paths.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] if the segment isn't a `lang-country` pair.
pub fn parse_locale(segment: &str) -> Result<Locale, AppError> {
    Locale::parse(segment).map_err(|_| AppError::NotFound(format!("page /{segment}")))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/add-button", get(cart::add_button))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/discounts", post(cart::discounts))
        .route("/gift-cards", post(cart::gift_cards))
        .route("/gift-cards/remove", post(cart::remove_gift_card))
        .route("/count", get(cart::count))
}

/// Create the catalog routes, with and without a locale prefix.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/collections/all", get(collections::all))
        .route("/{locale}/collections/all", get(collections::all_localized))
        .route("/products/{handle}", get(products::show))
        .route("/{locale}/products/{handle}", get(products::show_localized))
}

/// Create the form routes; submissions are rate limited per client IP.
pub fn form_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/contact",
            get(contact::show).merge(post(contact::submit).layer(form_rate_limiter())),
        )
        .route(
            "/newsletter",
            post(newsletter::subscribe).layer(form_rate_limiter()),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/collections/all") }))
        .merge(catalog_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", get(cart::checkout))
        .merge(form_routes())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert("HX-Request", HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!(parse_locale("fr-ca").map(|l| l.to_string()).ok(), Some("fr-ca".to_string()));
        assert!(matches!(parse_locale("favicon.ico"), Err(AppError::NotFound(_))));
    }
}
