//! Site footer: newsletter signup, mission, contact details, quick links and
//! the policies menu.

use crate::shopify::{FooterData, HeaderData};

use super::menu::{MenuContext, NavLink, fallback_footer_menu, nav_links};

/// Support address shown in the footer and the empty cart.
pub const SUPPORT_EMAIL: &str = "support@veridian-orchard.com";

/// Footer data used when the footer query fails.
#[must_use]
pub fn fallback_footer() -> FooterData {
    FooterData {
        menu: Some(fallback_footer_menu()),
    }
}

/// A fixed link in the "Quick Links" column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickLink {
    pub title: &'static str,
    pub url: &'static str,
    pub is_active: bool,
}

const QUICK_LINKS: [(&str, &str); 4] = [
    ("Products", "/collections/all"),
    ("Our Craft", "/pages/our-craft"),
    ("Care Guide", "/pages/care-guide"),
    ("About Us", "/pages/about-us"),
];

/// Footer view model.
#[derive(Debug, Clone)]
pub struct FooterView {
    /// `None` renders "No policies available."
    pub policy_links: Option<Vec<NavLink>>,
    pub quick_links: Vec<QuickLink>,
    pub support_email: &'static str,
}

impl FooterView {
    /// Policies need both a footer menu and the shop's primary domain.
    #[must_use]
    pub fn new(footer: &FooterData, header: &HeaderData, ctx: MenuContext<'_>) -> Self {
        let policy_links = match (&footer.menu, header.shop.primary_domain_url.as_deref()) {
            (Some(menu), Some(primary)) => Some(nav_links(
                menu,
                MenuContext {
                    primary_domain_url: Some(primary),
                    ..ctx
                },
            )),
            _ => None,
        };

        let quick_links = QUICK_LINKS
            .iter()
            .map(|&(title, url)| QuickLink {
                title,
                url,
                is_active: url == ctx.current_path,
            })
            .collect();

        Self {
            policy_links,
            quick_links,
            support_email: SUPPORT_EMAIL,
        }
    }
}
