//! Product type conversion functions.

use tracing::warn;
use veridian_orchard_core::ProductVariantGid;

use crate::shopify::types::{
    Image, Money, PageInfo, PriceRange, Product, ProductConnection, ProductItem, ProductOption,
    ProductVariant, SelectedOption, Seo,
};

use super::super::queries::{catalog, product};

impl From<catalog::CollectionItem> for ProductItem {
    fn from(item: catalog::CollectionItem) -> Self {
        Self {
            id: item.id,
            handle: item.handle,
            title: item.title,
            featured_image: item.featured_image.map(Image::from),
            images: item.images.nodes.into_iter().map(Image::from).collect(),
            price_range: PriceRange {
                min_variant_price: item.price_range.min_variant_price.into(),
                max_variant_price: item.price_range.max_variant_price.into(),
            },
        }
    }
}

impl From<catalog::CatalogProducts> for ProductConnection {
    fn from(products: catalog::CatalogProducts) -> Self {
        let page_info = products.page_info;
        Self {
            products: products.nodes.into_iter().map(ProductItem::from).collect(),
            page_info: PageInfo {
                has_previous_page: page_info.has_previous_page,
                has_next_page: page_info.has_next_page,
                start_cursor: page_info.start_cursor,
                end_cursor: page_info.end_cursor,
            },
        }
    }
}

fn convert_variant(variant: product::ProductVariantFields) -> Option<ProductVariant> {
    let id = match ProductVariantGid::parse(&variant.id) {
        Ok(id) => id,
        Err(e) => {
            warn!(id = %variant.id, error = %e, "Skipping variant with malformed ID");
            return None;
        }
    };

    Some(ProductVariant {
        id,
        title: variant.title,
        available_for_sale: variant.available_for_sale,
        sku: variant.sku,
        price: variant.price.into(),
        compare_at_price: variant.compare_at_price.map(Money::from),
        image: variant.image.map(Image::from),
        selected_options: variant
            .selected_options
            .into_iter()
            .map(|o| SelectedOption {
                name: o.name,
                value: o.value,
            })
            .collect(),
    })
}

impl From<product::ProductProduct> for Product {
    fn from(product: product::ProductProduct) -> Self {
        Self {
            id: product.id,
            handle: product.handle,
            title: product.title,
            vendor: product.vendor,
            description: product.description,
            description_html: product.description_html,
            options: product
                .options
                .into_iter()
                .map(|option| ProductOption {
                    name: option.name,
                    values: option.option_values.into_iter().map(|v| v.name).collect(),
                })
                .collect(),
            selected_variant: product
                .selected_or_first_available_variant
                .and_then(convert_variant),
            seo: Seo {
                title: product.seo.title,
                description: product.seo.description,
            },
        }
    }
}
