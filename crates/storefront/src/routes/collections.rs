//! Catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use tracing::instrument;
use veridian_orchard_core::Locale;

use crate::components::{Layout, ProductItemView, load_layout, product_grid};
use crate::error::Result;
use crate::filters;
use crate::pagination::{PaginationLinks, PaginationQuery, PaginationVariables};
use crate::state::AppState;

use super::parse_locale;

/// All-products page template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/all.html")]
pub struct CollectionsAllTemplate {
    pub layout: Layout,
    pub products: Vec<ProductItemView>,
    pub pagination: PaginationLinks,
}

/// Display all products for the default locale.
#[instrument(skip(state))]
pub async fn all(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<CollectionsAllTemplate> {
    render_all(&state, &Locale::default(), &query).await
}

/// Display all products under a `/{locale}` prefix.
#[instrument(skip(state))]
pub async fn all_localized(
    State(state): State<AppState>,
    Path(locale): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> Result<CollectionsAllTemplate> {
    let locale = parse_locale(&locale)?;
    render_all(&state, &locale, &query).await
}

async fn render_all(
    state: &AppState,
    locale: &Locale,
    query: &PaginationQuery,
) -> Result<CollectionsAllTemplate> {
    let base_path = format!("{}/collections/all", locale.path_prefix());
    let variables = PaginationVariables::from_query(query, state.config().catalog_page_size);

    let (layout, catalog) = tokio::join!(
        load_layout(state, locale, &base_path, "All Products"),
        state.storefront().get_catalog(locale, &variables),
    );
    let catalog = catalog?;

    Ok(CollectionsAllTemplate {
        pagination: PaginationLinks::new(&base_path, &catalog.page_info),
        products: product_grid(&catalog.products, locale),
        layout,
    })
}
