//! Navigation menus from the Shopify admin.
//!
//! Menu item URLs come back absolute (`https://shop.myshopify.com/collections`).
//! Links pointing at the store itself are reduced to their path so they stay
//! on this storefront; anything else is treated as an external link.

use url::Url;

use crate::shopify::{Menu, MenuItem};

/// What a menu needs to know about the current request and the shop.
#[derive(Debug, Clone, Copy)]
pub struct MenuContext<'a> {
    /// Storefront host, e.g. `veridian-orchard.com`.
    pub public_store_domain: &'a str,
    /// Shop primary domain, e.g. `https://veridian-orchard.com`.
    pub primary_domain_url: Option<&'a str>,
    /// Path of the page being rendered.
    pub current_path: &'a str,
}

/// A rendered navigation link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub id: String,
    pub title: String,
    pub url: String,
    pub is_external: bool,
    pub is_active: bool,
}

/// Reduce store-internal URLs to their path.
///
/// URLs that fail to parse are returned unchanged.
#[must_use]
pub fn resolve_menu_url(
    url: &str,
    public_store_domain: &str,
    primary_domain_url: Option<&str>,
) -> String {
    let internal = [Some("myshopify.com"), Some(public_store_domain), primary_domain_url]
        .into_iter()
        .flatten()
        .filter(|needle| !needle.is_empty())
        .any(|needle| url.contains(needle));

    if !internal {
        return url.to_string();
    }

    Url::parse(url).map_or_else(|_| url.to_string(), |parsed| parsed.path().to_string())
}

/// Links for every menu item that has a URL.
#[must_use]
pub fn nav_links(menu: &Menu, ctx: MenuContext<'_>) -> Vec<NavLink> {
    menu.items
        .iter()
        .filter_map(|item| nav_link(item, ctx))
        .collect()
}

fn nav_link(item: &MenuItem, ctx: MenuContext<'_>) -> Option<NavLink> {
    let raw = item.url.as_deref().filter(|u| !u.is_empty())?;
    let url = resolve_menu_url(raw, ctx.public_store_domain, ctx.primary_domain_url);
    let is_external = !url.starts_with('/');
    let is_active = !is_external && url == ctx.current_path;

    Some(NavLink {
        id: item.id.clone(),
        title: item.title.clone(),
        url,
        is_external,
        is_active,
    })
}

fn fallback_item(id: &str, title: &str, item_type: &str, url: &str) -> MenuItem {
    MenuItem {
        id: format!("gid://shopify/MenuItem/{id}"),
        title: title.to_string(),
        url: Some(url.to_string()),
        item_type: Some(item_type.to_string()),
        items: Vec::new(),
    }
}

/// Header menu used when the menu request fails.
#[must_use]
pub fn fallback_header_menu() -> Menu {
    Menu {
        id: "gid://shopify/Menu/199655587896".to_string(),
        items: vec![
            fallback_item("461609500728", "Collections", "HTTP", "/collections"),
            fallback_item("461609533496", "Blog", "HTTP", "/blogs/journal"),
            fallback_item("461609566264", "Policies", "HTTP", "/policies"),
            fallback_item("461609599032", "About", "PAGE", "/pages/about"),
        ],
    }
}

/// Footer (policies) menu used when the menu request fails.
#[must_use]
pub fn fallback_footer_menu() -> Menu {
    Menu {
        id: "gid://shopify/Menu/199655620664".to_string(),
        items: vec![
            fallback_item(
                "461633060920",
                "Privacy Policy",
                "SHOP_POLICY",
                "/policies/privacy-policy",
            ),
            fallback_item(
                "461633093688",
                "Refund Policy",
                "SHOP_POLICY",
                "/policies/refund-policy",
            ),
            fallback_item(
                "461633126456",
                "Shipping Policy",
                "SHOP_POLICY",
                "/policies/shipping-policy",
            ),
            fallback_item(
                "461633159224",
                "Terms of Service",
                "SHOP_POLICY",
                "/policies/terms-of-service",
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAIN: &str = "veridian-orchard.com";
    const PRIMARY: Option<&str> = Some("https://store.veridian-orchard.com");

    #[test]
    fn test_internal_urls_reduced_to_path() {
        assert_eq!(
            resolve_menu_url("https://veridian.myshopify.com/collections/all", DOMAIN, PRIMARY),
            "/collections/all"
        );
        assert_eq!(
            resolve_menu_url("https://veridian-orchard.com/pages/about?ref=nav", DOMAIN, PRIMARY),
            "/pages/about"
        );
        assert_eq!(
            resolve_menu_url("https://store.veridian-orchard.com/blogs/journal", "", PRIMARY),
            "/blogs/journal"
        );
    }

    #[test]
    fn test_external_and_relative_urls_kept() {
        assert_eq!(
            resolve_menu_url("https://partners.shopify.com/123456", DOMAIN, PRIMARY),
            "https://partners.shopify.com/123456"
        );
        assert_eq!(resolve_menu_url("/policies", DOMAIN, PRIMARY), "/policies");
    }

    #[test]
    fn test_empty_domain_does_not_match_everything() {
        assert_eq!(
            resolve_menu_url("https://example.org/garden", "", None),
            "https://example.org/garden"
        );
    }

    #[test]
    fn test_unparseable_internal_url_kept() {
        assert_eq!(
            resolve_menu_url("veridian-orchard.com/collections", DOMAIN, None),
            "veridian-orchard.com/collections"
        );
    }

    #[test]
    fn test_nav_links_skip_missing_urls_and_mark_active() {
        let mut menu = fallback_header_menu();
        menu.items[1].url = None;
        menu.items.push(fallback_item("1", "Partners", "HTTP", "https://partners.example.org"));

        let ctx = MenuContext {
            public_store_domain: DOMAIN,
            primary_domain_url: None,
            current_path: "/collections",
        };
        let links = nav_links(&menu, ctx);

        let titles: Vec<_> = links.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Collections", "Policies", "About", "Partners"]);
        assert!(links[0].is_active);
        assert!(!links[1].is_active);
        assert!(links[3].is_external);
        assert!(!links[3].is_active);
    }

    #[test]
    fn test_active_requires_exact_match() {
        let ctx = MenuContext {
            public_store_domain: DOMAIN,
            primary_domain_url: None,
            current_path: "/collections/all",
        };
        let links = nav_links(&fallback_header_menu(), ctx);
        assert!(links.iter().all(|l| !l.is_active));
    }
}
