//! View models shared by page templates.
//!
//! Route handlers turn Shopify domain types into these structs; templates
//! only ever see view models, never raw API data.

pub mod add_to_cart;
pub mod cart;
pub mod footer;
pub mod header;
pub mod menu;
pub mod product_image;
pub mod product_item;

pub use add_to_cart::{AddToCartState, AddToCartView};
pub use cart::{CartLineView, CartView};
pub use footer::FooterView;
pub use header::{CartBadge, HeaderView};
pub use menu::{MenuContext, NavLink};
pub use product_image::{ImageView, ProductImageView};
pub use product_item::{ProductItemView, product_grid};

use tracing::warn;
use veridian_orchard_core::Locale;

use crate::state::AppState;

/// Chrome around every page: header, footer and locale-aware link prefix.
#[derive(Debug, Clone)]
pub struct Layout {
    pub title: String,
    pub header: HeaderView,
    pub footer: FooterView,
    /// `""` for the default locale, e.g. `/fr-ca` otherwise.
    pub locale_prefix: String,
    /// `lang` attribute for `<html>`.
    pub lang: String,
}

/// Fetch header and footer menus concurrently and build the page layout.
///
/// Neither menu is allowed to fail the page: on error the built-in fallback
/// menus are rendered instead.
pub async fn load_layout(
    state: &AppState,
    locale: &Locale,
    current_path: &str,
    title: impl Into<String>,
) -> Layout {
    let storefront = state.storefront();
    let (header, footer) = tokio::join!(storefront.get_header(locale), storefront.get_footer(locale));

    let header = header.unwrap_or_else(|e| {
        warn!(error = %e, "Header query failed, using fallback menu");
        header::fallback_header()
    });
    let footer = footer.unwrap_or_else(|e| {
        warn!(error = %e, "Footer query failed, using fallback menu");
        footer::fallback_footer()
    });

    let ctx = MenuContext {
        public_store_domain: &state.config().public_store_domain,
        primary_domain_url: header.shop.primary_domain_url.as_deref(),
        current_path,
    };

    Layout {
        title: title.into(),
        header: HeaderView::new(&header, ctx),
        footer: FooterView::new(&footer, &header, ctx),
        locale_prefix: locale.path_prefix(),
        lang: locale.language().to_ascii_lowercase(),
    }
}
