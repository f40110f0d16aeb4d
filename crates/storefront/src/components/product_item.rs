//! Product card for listing grids.

use veridian_orchard_core::Locale;

use crate::shopify::{Image, ProductItem};

use super::product_image::ImageView;

/// Cards at positions below this load their images eagerly.
pub const EAGER_IMAGE_COUNT: usize = 8;

/// Product card view model.
#[derive(Debug, Clone)]
pub struct ProductItemView {
    pub href: String,
    pub title: String,
    pub primary_image: Option<ImageView>,
    /// Shown on hover.
    pub secondary_image: Option<ImageView>,
    pub price: Option<String>,
    /// `eager` or `lazy`.
    pub loading: &'static str,
}

impl ProductItemView {
    /// Card for the product at `index` in the grid.
    #[must_use]
    pub fn new(product: &ProductItem, locale: &Locale, index: usize, hide_price: bool) -> Self {
        let image = |img: &Image| ImageView::new(img, &product.title);

        Self {
            href: format!("{}/products/{}", locale.path_prefix(), product.handle),
            title: product.title.clone(),
            primary_image: product.featured_image.as_ref().map(image),
            secondary_image: product.images.get(1).map(image),
            price: (!hide_price).then(|| product.price_range.min_variant_price.display()),
            loading: if index < EAGER_IMAGE_COUNT { "eager" } else { "lazy" },
        }
    }
}

/// Cards for a grid, in order.
#[must_use]
pub fn product_grid(products: &[ProductItem], locale: &Locale) -> Vec<ProductItemView> {
    products
        .iter()
        .enumerate()
        .map(|(index, product)| ProductItemView::new(product, locale, index, false))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::shopify::{Money, PriceRange};

    fn image(url: &str, alt: Option<&str>) -> Image {
        Image {
            id: None,
            url: url.to_string(),
            alt_text: alt.map(String::from),
            width: None,
            height: None,
        }
    }

    fn product(handle: &str, images: Vec<Image>) -> ProductItem {
        let price = Money {
            amount: "18.5".to_string(),
            currency_code: "USD".to_string(),
        };
        ProductItem {
            id: format!("gid://shopify/Product/{handle}"),
            handle: handle.to_string(),
            title: "Snake Plant".to_string(),
            featured_image: images.first().cloned(),
            images,
            price_range: PriceRange {
                min_variant_price: price.clone(),
                max_variant_price: price,
            },
        }
    }

    #[test]
    fn test_card_links_and_alt_fallback() {
        let locale = Locale::parse("fr-ca").unwrap();
        let item = product(
            "snake-plant",
            vec![
                image("https://cdn.shopify.com/a.jpg", None),
                image("https://cdn.shopify.com/b.jpg", Some("Snake plant leaves")),
            ],
        );
        let view = ProductItemView::new(&item, &locale, 0, false);

        assert_eq!(view.href, "/fr-ca/products/snake-plant");
        assert_eq!(view.primary_image.unwrap().alt, "Snake Plant");
        assert_eq!(view.secondary_image.unwrap().alt, "Snake plant leaves");
        assert_eq!(view.price.as_deref(), Some("$18.50"));
    }

    #[test]
    fn test_hide_price_and_single_image() {
        let item = product("fern", vec![image("https://cdn.shopify.com/a.jpg", None)]);
        let view = ProductItemView::new(&item, &Locale::default(), 0, true);
        assert_eq!(view.href, "/products/fern");
        assert!(view.price.is_none());
        assert!(view.secondary_image.is_none());
    }

    #[test]
    fn test_first_eight_load_eagerly() {
        let items: Vec<_> = (0..10).map(|i| product(&format!("p{i}"), Vec::new())).collect();
        let grid = product_grid(&items, &Locale::default());
        assert!(grid[..8].iter().all(|card| card.loading == "eager"));
        assert!(grid[8..].iter().all(|card| card.loading == "lazy"));
    }
}
