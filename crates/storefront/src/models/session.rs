//! Session-related types.
//!
//! Visitors are anonymous; the session holds the Shopify cart ID, the gift
//! card codes applied to that cart, and the locale the cart was built in.

use tower_sessions::Session;
use veridian_orchard_core::{CartGid, Locale};

/// Session keys for cart data.
pub mod keys {
    /// Key for storing the Shopify cart ID.
    pub const CART_ID: &str = "cart_id";

    /// Key for gift card codes applied to the cart.
    pub const GIFT_CARD_CODES: &str = "gift_card_codes";

    /// Key for the locale cart queries run in, e.g. `fr-ca`.
    pub const LOCALE: &str = "locale";
}

/// Get the cart ID from the session.
///
/// IDs that no longer parse as cart GIDs are treated as absent.
pub async fn cart_id(session: &Session) -> Option<CartGid> {
    let raw = session
        .get::<String>(keys::CART_ID)
        .await
        .ok()
        .flatten()?;
    CartGid::parse(&raw).ok()
}

/// Set the cart ID in the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn set_cart_id(
    session: &Session,
    cart_id: &CartGid,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART_ID, cart_id.as_str()).await
}

/// Forget the cart and anything applied to it.
pub async fn clear_cart(session: &Session) {
    for key in [keys::CART_ID, keys::GIFT_CARD_CODES] {
        if let Err(e) = session.remove::<serde_json::Value>(key).await {
            tracing::warn!(error = %e, key, "Failed to clear session key");
        }
    }
}

/// Locale the shopper last added to the cart from.
///
/// Falls back to the default locale when unset or unparsable.
pub async fn locale(session: &Session) -> Locale {
    session
        .get::<String>(keys::LOCALE)
        .await
        .ok()
        .flatten()
        .and_then(|raw| Locale::parse(&raw).ok())
        .unwrap_or_default()
}

/// Remember the locale cart queries should run in.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn set_locale(
    session: &Session,
    locale: &Locale,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::LOCALE, locale.to_string()).await
}

/// Gift card codes previously applied to the cart.
pub async fn gift_card_codes(session: &Session) -> Vec<String> {
    session
        .get::<Vec<String>>(keys::GIFT_CARD_CODES)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Replace the remembered gift card codes.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn set_gift_card_codes(
    session: &Session,
    codes: &[String],
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::GIFT_CARD_CODES, codes).await
}
