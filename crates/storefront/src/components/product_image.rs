//! Product images.
//!
//! Shopify's CDN resizes on the fly via a `width` query parameter, so each
//! image is rendered with a `srcset` rather than a single full-size URL.

use url::Url;

use crate::shopify::Image;

/// Widths offered in `srcset`.
const SRCSET_WIDTHS: [u32; 4] = [200, 400, 800, 1200];

/// Alt text when a variant image has none.
pub const DEFAULT_ALT: &str = "Product Image";

/// An `<img>` ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageView {
    pub src: String,
    pub srcset: String,
    pub alt: String,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

impl ImageView {
    /// Build from a Shopify image, using `fallback_alt` when it has no alt text.
    #[must_use]
    pub fn new(image: &Image, fallback_alt: &str) -> Self {
        let srcset = SRCSET_WIDTHS
            .iter()
            .map(|w| format!("{} {w}w", sized_url(&image.url, *w)))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            src: sized_url(&image.url, 800),
            srcset,
            alt: image.alt_or(fallback_alt).to_string(),
            width: image.width,
            height: image.height,
        }
    }
}

/// Set the CDN `width` parameter, replacing any existing one and keeping the
/// rest of the query.
fn sized_url(url: &str, width: u32) -> String {
    Url::parse(url).map_or_else(
        |_| url.to_string(),
        |mut parsed| {
            let kept: Vec<(String, String)> = parsed
                .query_pairs()
                .filter(|(key, _)| key != "width")
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect();
            parsed
                .query_pairs_mut()
                .clear()
                .extend_pairs(kept)
                .append_pair("width", &width.to_string());
            parsed.to_string()
        },
    )
}

/// Image of the selected variant on the product page.
#[derive(Debug, Clone)]
pub struct ProductImageView {
    /// `None` renders an empty placeholder.
    pub image: Option<ImageView>,
}

impl ProductImageView {
    #[must_use]
    pub fn new(selected_variant_image: Option<&Image>) -> Self {
        Self {
            image: selected_variant_image.map(|image| ImageView::new(image, DEFAULT_ALT)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(alt: Option<&str>) -> Image {
        Image {
            id: Some("gid://shopify/ProductImage/1".to_string()),
            url: "https://cdn.shopify.com/s/files/1/fern.jpg?v=17".to_string(),
            alt_text: alt.map(String::from),
            width: Some(1024),
            height: Some(1024),
        }
    }

    #[test]
    fn test_alt_falls_back() {
        let view = ProductImageView::new(Some(&image(None)));
        assert_eq!(view.image.map(|i| i.alt).as_deref(), Some("Product Image"));

        let view = ProductImageView::new(Some(&image(Some("Fern in clay pot"))));
        assert_eq!(
            view.image.map(|i| i.alt).as_deref(),
            Some("Fern in clay pot")
        );
    }

    #[test]
    fn test_missing_image_is_placeholder() {
        assert!(ProductImageView::new(None).image.is_none());
    }

    #[test]
    fn test_sized_urls_keep_query() {
        let view = ImageView::new(&image(None), DEFAULT_ALT);
        assert_eq!(
            view.src,
            "https://cdn.shopify.com/s/files/1/fern.jpg?v=17&width=800"
        );
        assert!(view.srcset.starts_with(
            "https://cdn.shopify.com/s/files/1/fern.jpg?v=17&width=200 200w, "
        ));
        assert_eq!(sized_url("not a url", 200), "not a url");
    }

    #[test]
    fn test_sized_url_replaces_existing_width() {
        assert_eq!(
            sized_url("https://cdn.shopify.com/s/files/1/fern.jpg?width=100&v=17", 400),
            "https://cdn.shopify.com/s/files/1/fern.jpg?v=17&width=400"
        );
        assert_eq!(
            sized_url("https://cdn.shopify.com/s/files/1/fern.jpg?width=100", 400),
            "https://cdn.shopify.com/s/files/1/fern.jpg?width=400"
        );
    }
}
