//! Cart totals and checkout call to action.

use crate::shopify::Cart;

use super::discounts::DiscountsView;
use super::gift_cards::GiftCardsView;

/// Shown in place of the subtotal when Shopify hasn't computed one.
pub const UNAVAILABLE: &str = "-";

/// Summary panel next to the cart lines.
#[derive(Debug, Clone)]
pub struct SummaryView {
    pub subtotal: String,
    pub discounts: DiscountsView,
    pub gift_cards: GiftCardsView,
    /// Goes through our `/checkout` redirect, not Shopify directly.
    pub checkout_url: &'static str,
    pub has_checkout: bool,
}

impl SummaryView {
    #[must_use]
    pub fn new(cart: &Cart) -> Self {
        Self {
            subtotal: cart
                .cost
                .subtotal
                .as_ref()
                .map_or_else(|| UNAVAILABLE.to_string(), |m| m.display()),
            discounts: DiscountsView::new(&cart.discount_codes),
            gift_cards: GiftCardsView::new(&cart.applied_gift_cards),
            checkout_url: "/checkout",
            has_checkout: !cart.checkout_url.is_empty(),
        }
    }
}

/// Where to send the shopper for checkout, if the cart has somewhere to go.
#[must_use]
pub fn checkout_url(cart: &Cart) -> Option<&str> {
    Some(cart.checkout_url.as_str()).filter(|url| !url.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::cart::tests::sample_cart;

    #[test]
    fn test_subtotal_and_checkout() {
        let cart = sample_cart();
        let summary = SummaryView::new(&cart);
        assert_eq!(summary.subtotal, "$48.00");
        assert!(summary.has_checkout);
        assert_eq!(
            checkout_url(&cart),
            Some("https://veridian-orchard.myshopify.com/cart/c/abc")
        );
    }

    #[test]
    fn test_missing_subtotal_shows_dash() {
        let mut cart = sample_cart();
        cart.cost.subtotal = None;
        cart.checkout_url = String::new();
        let summary = SummaryView::new(&cart);
        assert_eq!(summary.subtotal, "-");
        assert!(!summary.has_checkout);
        assert!(checkout_url(&cart).is_none());
    }
}
