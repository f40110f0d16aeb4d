//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation returns the cart fragment and, on success, an
//! `HX-Trigger: cart-updated` header so the header badge refreshes. Plain
//! form posts (no JavaScript) are redirected back to `/cart`.
//!
//! The cart ID lives in the session next to the locale the shopper added
//! from; every cart query and mutation runs in that locale so prices and
//! links match the market the cart was built in. A cart that no longer
//! exists upstream is forgotten and rendered as empty.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use veridian_orchard_core::{
    AppliedGiftCardGid, CartGid, CartLineGid, Locale, ProductVariantGid,
};

use crate::components::cart::{discounts, gift_cards, summary};
use crate::components::{AddToCartView, CartBadge, CartView, Layout, load_layout};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::session;
use crate::shopify::{Cart, CartLineInput, CartLineUpdateInput, ShopifyError};
use crate::state::AppState;

use super::is_htmx;

const CART_UPDATED: (&str, &str) = ("HX-Trigger", "cart-updated");

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub cart: CartView,
}

/// Cart contents fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "cart/fragment.html")]
pub struct CartFragmentTemplate {
    pub cart: CartView,
}

/// Add-to-cart button fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "cart/add_to_cart.html")]
pub struct AddToCartTemplate {
    pub add_to_cart: AddToCartView,
}

/// Cart count badge fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "components/cart_badge.html")]
pub struct CartBadgeTemplate {
    pub badge: CartBadge,
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub variant_id: String,
    pub quantity: Option<i64>,
    /// Locale of the product page, e.g. `fr-ca`.
    pub locale: Option<String>,
}

/// Query for resetting the add-to-cart button.
#[derive(Debug, Deserialize)]
pub struct AddButtonQuery {
    pub variant_id: String,
    pub locale: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub line_id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line_id: String,
}

/// Discount form data: either a code to apply or one to remove.
#[derive(Debug, Deserialize)]
pub struct DiscountForm {
    #[serde(default)]
    pub discount_code: String,
    pub remove_code: Option<String>,
}

/// Gift card form data.
#[derive(Debug, Deserialize)]
pub struct GiftCardForm {
    #[serde(default)]
    pub gift_card_code: String,
}

/// Remove gift card form data.
#[derive(Debug, Deserialize)]
pub struct RemoveGiftCardForm {
    pub gift_card_id: String,
}

// =============================================================================
// Helpers
// =============================================================================

/// Fetch the session's cart, forgetting it if Shopify no longer has it.
async fn load_cart(
    state: &AppState,
    session: &Session,
    locale: &Locale,
) -> std::result::Result<Option<Cart>, ShopifyError> {
    let Some(cart_id) = session::cart_id(session).await else {
        return Ok(None);
    };

    match state.storefront().get_cart(locale, &cart_id).await {
        Ok(cart) => Ok(Some(cart)),
        Err(ShopifyError::NotFound(_)) => {
            tracing::info!(cart_id = %cart_id, "Stored cart no longer exists");
            session::clear_cart(session).await;
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn cart_view(cart: Option<&Cart>, locale: &Locale) -> CartView {
    cart.map_or_else(|| CartView::empty(locale), |cart| CartView::new(cart, locale))
}

async fn remember_cart(session: &Session, cart: &Cart) {
    match CartGid::parse(&cart.id) {
        Ok(cart_id) => {
            if let Err(e) = session::set_cart_id(session, &cart_id).await {
                tracing::error!(error = %e, "Failed to save cart ID to session");
            }
        }
        Err(e) => tracing::error!(error = %e, cart_id = %cart.id, "Shopify returned an invalid cart ID"),
    }
}

/// Respond to a cart mutation.
///
/// Failures leave the cart as it was: the current cart is re-fetched and
/// rendered with the error message.
async fn mutation_response(
    state: &AppState,
    session: &Session,
    headers: &HeaderMap,
    locale: &Locale,
    result: std::result::Result<Cart, ShopifyError>,
) -> Response {
    if !is_htmx(headers) {
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Cart mutation failed");
        }
        return Redirect::to("/cart").into_response();
    }

    match result {
        Ok(cart) => (
            AppendHeaders([CART_UPDATED]),
            CartFragmentTemplate {
                cart: CartView::new(&cart, locale),
            },
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Cart mutation failed");
            let message = e.customer_message();
            let cart = match load_cart(state, session, locale).await {
                Ok(cart) => cart_view(cart.as_ref(), locale),
                Err(fetch_error) => {
                    tracing::error!(error = %fetch_error, "Failed to re-fetch cart");
                    CartView::empty(locale)
                }
            };
            CartFragmentTemplate {
                cart: cart.with_error(message),
            }
            .into_response()
        }
    }
}

/// Response when a mutation arrives with no cart to apply it to.
fn no_cart_response(headers: &HeaderMap, locale: &Locale) -> Response {
    if is_htmx(headers) {
        CartFragmentTemplate {
            cart: CartView::empty(locale),
        }
        .into_response()
    } else {
        Redirect::to("/cart").into_response()
    }
}

fn bad_request(e: impl std::fmt::Display) -> AppError {
    AppError::BadRequest(e.to_string())
}

/// Locale posted with a form, or the session's when none was sent.
async fn requested_locale(session: &Session, raw: Option<&str>) -> Result<Locale> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Locale::parse(raw).map_err(bad_request),
        None => Ok(session::locale(session).await),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CartShowTemplate> {
    let locale = session::locale(&session).await;
    let (layout, cart) = tokio::join!(
        load_layout(&state, &locale, "/cart", "Cart"),
        load_cart(&state, &session, &locale),
    );

    Ok(CartShowTemplate {
        layout,
        cart: cart_view(cart?.as_ref(), &locale),
    })
}

/// Add item to cart (HTMX).
///
/// Creates a new cart if one doesn't exist, or if the stored one has
/// expired. Returns the add-to-cart button in its "Added!" state.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let variant_id = ProductVariantGid::parse(&form.variant_id).map_err(bad_request)?;
    let quantity = form.quantity.unwrap_or(1).max(1);
    let locale = requested_locale(&session, form.locale.as_deref()).await?;
    let line = CartLineInput::new(variant_id.clone(), quantity);
    let storefront = state.storefront();

    add_breadcrumb(
        "cart",
        "Add to cart",
        Some(&[("variant_id", variant_id.as_str())][..]),
    );

    let result = match session::cart_id(&session).await {
        Some(cart_id) => match storefront.add_lines(&locale, &cart_id, vec![line.clone()]).await {
            Err(e) => match storefront.get_cart(&locale, &cart_id).await {
                Err(ShopifyError::NotFound(_)) => {
                    session::clear_cart(&session).await;
                    storefront.create_cart(&locale, vec![line]).await
                }
                _ => Err(e),
            },
            ok => ok,
        },
        None => storefront.create_cart(&locale, vec![line]).await,
    };

    if let Ok(cart) = &result {
        remember_cart(&session, cart).await;
        if let Err(e) = session::set_locale(&session, &locale).await {
            tracing::error!(error = %e, "Failed to save cart locale to session");
        }
    }

    if !is_htmx(&headers) {
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Failed to add item to cart");
        }
        return Ok(Redirect::to("/cart").into_response());
    }

    let button = AddToCartView::for_variant(Some(&variant_id), true, &locale);
    Ok(match result {
        Ok(_) => (
            AppendHeaders([CART_UPDATED]),
            AddToCartTemplate {
                add_to_cart: button.added(),
            },
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to add item to cart");
            AddToCartTemplate {
                add_to_cart: button.with_error(e.customer_message()),
            }
            .into_response()
        }
    })
}

/// Idle add-to-cart button; loaded two seconds after "Added!".
#[instrument(skip(session))]
pub async fn add_button(
    session: Session,
    Query(query): Query<AddButtonQuery>,
) -> Result<AddToCartTemplate> {
    let variant_id = ProductVariantGid::parse(&query.variant_id).map_err(bad_request)?;
    let locale = requested_locale(&session, query.locale.as_deref()).await?;
    Ok(AddToCartTemplate {
        add_to_cart: AddToCartView::for_variant(Some(&variant_id), true, &locale),
    })
}

/// Update cart line quantity (HTMX). A quantity of zero removes the line.
#[instrument(skip(state, session, headers))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let line_id = CartLineGid::parse(&form.line_id).map_err(bad_request)?;
    if form.quantity < 0 {
        return Err(AppError::BadRequest("quantity must not be negative".to_string()));
    }
    let locale = session::locale(&session).await;
    let Some(cart_id) = session::cart_id(&session).await else {
        return Ok(no_cart_response(&headers, &locale));
    };

    let result = state
        .storefront()
        .update_lines(
            &locale,
            &cart_id,
            vec![CartLineUpdateInput {
                id: line_id,
                quantity: form.quantity,
            }],
        )
        .await;

    Ok(mutation_response(&state, &session, &headers, &locale, result).await)
}

/// Remove a cart line (HTMX).
#[instrument(skip(state, session, headers))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let line_id = CartLineGid::parse(&form.line_id).map_err(bad_request)?;
    let locale = session::locale(&session).await;
    let Some(cart_id) = session::cart_id(&session).await else {
        return Ok(no_cart_response(&headers, &locale));
    };

    let result = state
        .storefront()
        .remove_lines(&locale, &cart_id, vec![line_id])
        .await;

    Ok(mutation_response(&state, &session, &headers, &locale, result).await)
}

/// Apply or remove a discount code (HTMX).
///
/// Shopify replaces the whole list, so the codes sent are computed from the
/// cart's currently applicable codes.
#[instrument(skip(state, session, headers))]
pub async fn discounts(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<DiscountForm>,
) -> Result<Response> {
    let locale = session::locale(&session).await;
    let Some(cart) = load_cart(&state, &session, &locale).await? else {
        return Ok(no_cart_response(&headers, &locale));
    };
    let cart_id = CartGid::parse(&cart.id).map_err(|e| AppError::Internal(e.to_string()))?;

    let codes = match form.remove_code.as_deref() {
        Some(code) => discounts::codes_after_remove(&cart.discount_codes, code),
        None => discounts::codes_after_apply(&cart.discount_codes, &form.discount_code),
    };

    let result = state
        .storefront()
        .update_discount_codes(&locale, &cart_id, codes)
        .await;

    Ok(mutation_response(&state, &session, &headers, &locale, result).await)
}

/// Apply a gift card code (HTMX).
///
/// Codes are remembered in the session only once Shopify accepts them.
#[instrument(skip(state, session, headers, form))]
pub async fn gift_cards(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<GiftCardForm>,
) -> Result<Response> {
    let locale = session::locale(&session).await;
    let Some(cart_id) = session::cart_id(&session).await else {
        return Ok(no_cart_response(&headers, &locale));
    };

    let saved = session::gift_card_codes(&session).await;
    let codes = gift_cards::codes_to_send(&saved, &form.gift_card_code);

    let result = state
        .storefront()
        .update_gift_card_codes(&locale, &cart_id, codes)
        .await;

    if let Ok(cart) = &result {
        let remembered = gift_cards::remember_code(&saved, &form.gift_card_code);
        let pruned = gift_cards::prune_codes(&remembered, &cart.applied_gift_cards);
        if let Err(e) = session::set_gift_card_codes(&session, &pruned).await {
            tracing::error!(error = %e, "Failed to save gift card codes to session");
        }
    }

    Ok(mutation_response(&state, &session, &headers, &locale, result).await)
}

/// Remove an applied gift card (HTMX).
#[instrument(skip(state, session, headers))]
pub async fn remove_gift_card(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveGiftCardForm>,
) -> Result<Response> {
    let gift_card_id = AppliedGiftCardGid::parse(&form.gift_card_id).map_err(bad_request)?;
    let locale = session::locale(&session).await;
    let Some(cart_id) = session::cart_id(&session).await else {
        return Ok(no_cart_response(&headers, &locale));
    };

    let result = state
        .storefront()
        .remove_gift_cards(&locale, &cart_id, vec![gift_card_id])
        .await;

    if let Ok(cart) = &result {
        let saved = session::gift_card_codes(&session).await;
        let pruned = gift_cards::prune_codes(&saved, &cart.applied_gift_cards);
        if let Err(e) = session::set_gift_card_codes(&session, &pruned).await {
            tracing::error!(error = %e, "Failed to save gift card codes to session");
        }
    }

    Ok(mutation_response(&state, &session, &headers, &locale, result).await)
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> CartBadgeTemplate {
    let locale = session::locale(&session).await;
    let count = match load_cart(&state, &session, &locale).await {
        Ok(cart) => Some(cart.map_or(0, |c| c.total_quantity)),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch cart for badge");
            None
        }
    };

    CartBadgeTemplate {
        badge: CartBadge::from_count(count),
    }
}

/// Redirect to Shopify checkout.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Response {
    let locale = session::locale(&session).await;
    match load_cart(&state, &session, &locale).await {
        Ok(Some(cart)) if !cart.lines.is_empty() => summary::checkout_url(&cart).map_or_else(
            || Redirect::to("/cart").into_response(),
            |url| Redirect::to(url).into_response(),
        ),
        Ok(_) => Redirect::to("/cart").into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to get cart for checkout");
            Redirect::to("/cart").into_response()
        }
    }
}
