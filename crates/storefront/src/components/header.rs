//! Site header: logo, navigation, account and cart calls to action.

use crate::shopify::{HeaderData, Shop};

use super::menu::{MenuContext, NavLink, fallback_header_menu, nav_links};

/// Shop name shown when the header query fails.
pub const FALLBACK_SHOP_NAME: &str = "Veridian Orchard";

/// Header data used when the header query fails.
#[must_use]
pub fn fallback_header() -> HeaderData {
    HeaderData {
        shop: Shop {
            id: "gid://shopify/Shop/0".to_string(),
            name: FALLBACK_SHOP_NAME.to_string(),
            description: None,
            primary_domain_url: None,
        },
        menu: Some(fallback_header_menu()),
    }
}

/// Header view model.
#[derive(Debug, Clone)]
pub struct HeaderView {
    pub shop_name: String,
    /// Empty when the shop has no header menu; the nav is then omitted.
    pub nav_links: Vec<NavLink>,
    pub account_label: &'static str,
}

impl HeaderView {
    #[must_use]
    pub fn new(header: &HeaderData, ctx: MenuContext<'_>) -> Self {
        Self {
            shop_name: header.shop.name.clone(),
            nav_links: header
                .menu
                .as_ref()
                .map(|menu| nav_links(menu, ctx))
                .unwrap_or_default(),
            // Visitors are anonymous; there is no customer session to check
            account_label: "Sign in",
        }
    }
}

/// Cart count badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartBadge {
    /// `None` while the count is unknown; no badge is drawn.
    pub label: Option<String>,
}

impl CartBadge {
    /// Badge for a known (or unknown) cart quantity.
    #[must_use]
    pub fn from_count(count: Option<i64>) -> Self {
        let label = count.map(|count| match count {
            n if n > 9 => "9+".to_string(),
            n if n > 0 => n.to_string(),
            _ => "0".to_string(),
        });
        Self { label }
    }
}
