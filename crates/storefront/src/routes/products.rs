//! Product route handlers.

use std::collections::BTreeMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use tracing::instrument;
use url::form_urlencoded;
use veridian_orchard_core::Locale;

use crate::components::{AddToCartView, Layout, ProductImageView, load_layout};
use crate::error::Result;
use crate::filters;
use crate::shopify::{Product, SelectedOption};
use crate::state::AppState;

use super::parse_locale;

/// A selectable option value, rendered as a link.
#[derive(Debug, Clone)]
pub struct OptionValueView {
    pub value: String,
    pub href: String,
    pub selected: bool,
}

/// An option group such as "Size" or "Pot".
#[derive(Debug, Clone)]
pub struct OptionView {
    pub name: String,
    pub values: Vec<OptionValueView>,
}

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub title: String,
    pub vendor: String,
    pub price: Option<String>,
    pub compare_at_price: Option<String>,
    /// Shopify-sanitized HTML.
    pub description_html: String,
    pub image: ProductImageView,
    /// Options with a single value (e.g. "Title: Default Title") are omitted.
    pub options: Vec<OptionView>,
}

impl ProductView {
    fn new(product: &Product, base_path: &str) -> Self {
        let variant = product.selected_variant.as_ref();
        let selection: BTreeMap<&str, &str> = variant
            .map(|v| {
                v.selected_options
                    .iter()
                    .map(|o| (o.name.as_str(), o.value.as_str()))
                    .collect()
            })
            .unwrap_or_default();

        let options = product
            .options
            .iter()
            .filter(|option| option.values.len() > 1)
            .map(|option| OptionView {
                name: option.name.clone(),
                values: option
                    .values
                    .iter()
                    .map(|value| OptionValueView {
                        value: value.clone(),
                        href: option_href(base_path, &selection, &option.name, value),
                        selected: selection.get(option.name.as_str()) == Some(&value.as_str()),
                    })
                    .collect(),
            })
            .collect();

        Self {
            title: product.title.clone(),
            vendor: product.vendor.clone(),
            price: variant.map(|v| v.price.display()),
            compare_at_price: variant
                .filter(|v| v.is_on_sale())
                .and_then(|v| v.compare_at_price.as_ref())
                .map(|m| m.display()),
            description_html: product.description_html.clone(),
            image: ProductImageView::new(variant.and_then(|v| v.image.as_ref())),
            options,
        }
    }
}

/// Link to the product with `name` set to `value` and the rest of the
/// current selection kept.
fn option_href(
    base_path: &str,
    selection: &BTreeMap<&str, &str>,
    name: &str,
    value: &str,
) -> String {
    let mut merged = selection.clone();
    merged.insert(name, value);

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(merged)
        .finish();
    format!("{base_path}?{query}")
}

/// Options requested in the query string, sorted by name.
fn selected_options(query: &BTreeMap<String, String>) -> Vec<SelectedOption> {
    query
        .iter()
        .filter(|(name, value)| !name.is_empty() && !value.is_empty())
        .map(|(name, value)| SelectedOption {
            name: name.clone(),
            value: value.clone(),
        })
        .collect()
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: ProductView,
    pub add_to_cart: AddToCartView,
}

/// Display a product for the default locale.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Result<ProductShowTemplate> {
    render_show(&state, &Locale::default(), &handle, &query).await
}

/// Display a product under a `/{locale}` prefix.
#[instrument(skip(state))]
pub async fn show_localized(
    State(state): State<AppState>,
    Path((locale, handle)): Path<(String, String)>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Result<ProductShowTemplate> {
    let locale = parse_locale(&locale)?;
    render_show(&state, &locale, &handle, &query).await
}

async fn render_show(
    state: &AppState,
    locale: &Locale,
    handle: &str,
    query: &BTreeMap<String, String>,
) -> Result<ProductShowTemplate> {
    let base_path = format!("{}/products/{handle}", locale.path_prefix());
    let options = selected_options(query);

    let (layout, product) = tokio::join!(
        load_layout(state, locale, &base_path, handle),
        state.storefront().get_product(locale, handle, &options),
    );
    let product = product?;

    let variant = product.selected_variant.as_ref();
    let add_to_cart = AddToCartView::for_variant(
        variant.map(|v| &v.id),
        variant.is_some_and(|v| v.available_for_sale),
        locale,
    );

    Ok(ProductShowTemplate {
        layout: Layout {
            title: product.seo.title.clone().unwrap_or_else(|| product.title.clone()),
            ..layout
        },
        product: ProductView::new(&product, &base_path),
        add_to_cart,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use veridian_orchard_core::ProductVariantGid;

    use super::*;
    use crate::shopify::{Money, ProductOption, ProductVariant, Seo};

    fn product() -> Product {
        let option = |name: &str, value: &str| SelectedOption {
            name: name.to_string(),
            value: value.to_string(),
        };
        Product {
            id: "gid://shopify/Product/3".to_string(),
            handle: "boston-fern".to_string(),
            title: "Boston Fern".to_string(),
            vendor: "Veridian Orchard".to_string(),
            description: "A lush fern.".to_string(),
            description_html: "<p>A lush fern.</p>".to_string(),
            options: vec![
                ProductOption {
                    name: "Size".to_string(),
                    values: vec!["Small".to_string(), "Large".to_string()],
                },
                ProductOption {
                    name: "Pot".to_string(),
                    values: vec!["Clay".to_string(), "Ceramic Glaze".to_string()],
                },
                ProductOption {
                    name: "Care".to_string(),
                    values: vec!["Standard".to_string()],
                },
            ],
            selected_variant: Some(ProductVariant {
                id: ProductVariantGid::parse("gid://shopify/ProductVariant/7").unwrap(),
                title: "Small / Clay".to_string(),
                available_for_sale: true,
                sku: None,
                price: Money {
                    amount: "24.0".to_string(),
                    currency_code: "CAD".to_string(),
                },
                compare_at_price: Some(Money {
                    amount: "30.0".to_string(),
                    currency_code: "CAD".to_string(),
                }),
                image: None,
                selected_options: vec![option("Size", "Small"), option("Pot", "Clay")],
            }),
            seo: Seo::default(),
        }
    }

    #[test]
    fn test_option_links_keep_selection() {
        let view = ProductView::new(&product(), "/products/boston-fern");
        assert_eq!(view.options.len(), 2);

        let size = &view.options[0];
        assert!(size.values[0].selected);
        assert_eq!(
            size.values[1].href,
            "/products/boston-fern?Pot=Clay&Size=Large"
        );

        let pot = &view.options[1];
        assert_eq!(
            pot.values[1].href,
            "/products/boston-fern?Pot=Ceramic+Glaze&Size=Small"
        );
    }

    #[test]
    fn test_sale_price_and_placeholder_image() {
        let view = ProductView::new(&product(), "/products/boston-fern");
        assert_eq!(view.price.as_deref(), Some("$24.00"));
        assert_eq!(view.compare_at_price.as_deref(), Some("$30.00"));
        assert!(view.image.image.is_none());
    }

    #[test]
    fn test_selected_options_skip_empty() {
        let query = BTreeMap::from([
            ("Size".to_string(), "Large".to_string()),
            ("Pot".to_string(), String::new()),
        ]);
        assert_eq!(
            selected_options(&query),
            vec![SelectedOption {
                name: "Size".to_string(),
                value: "Large".to_string(),
            }]
        );
    }
}
