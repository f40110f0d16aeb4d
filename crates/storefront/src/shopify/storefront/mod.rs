//! Shopify Storefront API client implementation.
//!
//! Operations are derived with `graphql_client`; requests go out over
//! `reqwest` 0.13 with a per-request timeout.
//! Caches menus, catalog pages and products using `moka` (5-minute TTL).

mod cache;
mod conversions;

pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use graphql_client::{GraphQLQuery, Response};
use moka::future::Cache;
use secrecy::ExposeSecret;
use tracing::{debug, instrument};
use veridian_orchard_core::{AppliedGiftCardGid, CartGid, CartLineGid, Locale};

use crate::config::ShopifyStorefrontConfig;
use crate::pagination::PaginationVariables;
use crate::shopify::ShopifyError;
use crate::shopify::types::{
    Cart, CartLineInput, CartLineUpdateInput, CartUserError, FooterData, HeaderData, Product,
    ProductConnection, SelectedOption,
};

use cache::CacheValue;
use conversions::join_user_errors;
use queries::{
    Cart as CartQuery, CartCreate, CartDiscountCodesUpdate, CartGiftCardCodesRemove,
    CartGiftCardCodesUpdate, CartLinesAdd, CartLinesRemove, CartLinesUpdate, Catalog, Footer,
    Header, Product as ProductQuery, cart, cart_create, cart_discount_codes_update,
    cart_gift_card_codes_remove, cart_gift_card_codes_update, cart_lines_add, cart_lines_remove,
    cart_lines_update, catalog, footer, header, product, schema_enum,
};

/// Upper bound on a single Storefront API request, connect included.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Menu handle rendered in the header.
pub const HEADER_MENU_HANDLE: &str = "main-menu";
/// Menu handle rendered in the footer.
pub const FOOTER_MENU_HANDLE: &str = "footer";

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Provides typed access to menus, the catalog, products, and cart operations.
/// Everything except carts is cached for 5 minutes.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
    cache: Cache<String, CacheValue>,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ShopifyStorefrontConfig) -> Result<Self, ShopifyError> {
        let endpoint = format!(
            "https://{}/api/{}/graphql.json",
            config.store, config.api_version
        );

        Self::with_endpoint(endpoint, config.storefront_private_token.expose_secret())
    }

    /// Create a client for an explicit GraphQL endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        access_token: &str,
    ) -> Result<Self, ShopifyError> {
        Self::build(endpoint.into(), access_token, REQUEST_TIMEOUT)
    }

    fn build(
        endpoint: String,
        access_token: &str,
        timeout: Duration,
    ) -> Result<Self, ShopifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(StorefrontClientInner {
                client,
                endpoint,
                access_token: access_token.to_string(),
                cache,
            }),
        })
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        let request_body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            // Private access tokens use a different header than public tokens
            .header("Shopify-Storefront-Private-Token", &self.inner.access_token)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Read the body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                operation = request_body.operation_name,
                body = %truncate(&response_text, 500),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::graphql(format!(
                "HTTP {status}: {}",
                truncate(&response_text, 200)
            )));
        }

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    operation = request_body.operation_name,
                    body = %truncate(&response_text, 500),
                    "Failed to parse Shopify GraphQL response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            return Err(ShopifyError::GraphQL(
                errors.into_iter().map(Into::into).collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                operation = request_body.operation_name,
                body = %truncate(&response_text, 500),
                "Shopify GraphQL response has no data and no errors"
            );
            ShopifyError::graphql("No data in response")
        })
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Get the shop name, primary domain and header menu.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(locale = %locale))]
    pub async fn get_header(&self, locale: &Locale) -> Result<HeaderData, ShopifyError> {
        let cache_key = format!("header:{locale}");

        if let Some(CacheValue::Header(header)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for header");
            return Ok(*header);
        }

        let variables = header::Variables {
            country: schema_enum(locale.country()),
            language: schema_enum(locale.language()),
            header_menu_handle: HEADER_MENU_HANDLE.to_string(),
        };
        let header = HeaderData::from(self.execute::<Header>(variables).await?);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Header(Box::new(header.clone())))
            .await;

        Ok(header)
    }

    /// Get the footer menu.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(locale = %locale))]
    pub async fn get_footer(&self, locale: &Locale) -> Result<FooterData, ShopifyError> {
        let cache_key = format!("footer:{locale}");

        if let Some(CacheValue::Footer(footer)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for footer");
            return Ok(footer);
        }

        let variables = footer::Variables {
            country: schema_enum(locale.country()),
            language: schema_enum(locale.language()),
            footer_menu_handle: FOOTER_MENU_HANDLE.to_string(),
        };
        let footer = FooterData::from(self.execute::<Footer>(variables).await?);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Footer(footer.clone()))
            .await;

        Ok(footer)
    }

    // =========================================================================
    // Catalog & Products
    // =========================================================================

    /// Get one page of the full catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(locale = %locale))]
    pub async fn get_catalog(
        &self,
        locale: &Locale,
        pagination: &PaginationVariables,
    ) -> Result<ProductConnection, ShopifyError> {
        let cache_key = format!(
            "catalog:{locale}:{:?}:{:?}:{:?}:{:?}",
            pagination.first, pagination.last, pagination.start_cursor, pagination.end_cursor
        );

        if let Some(CacheValue::Catalog(connection)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for catalog");
            return Ok(connection);
        }

        let variables = catalog::Variables {
            country: schema_enum(locale.country()),
            language: schema_enum(locale.language()),
            first: pagination.first,
            last: pagination.last,
            start_cursor: pagination.start_cursor.clone(),
            end_cursor: pagination.end_cursor.clone(),
        };
        let data = self.execute::<Catalog>(variables).await?;
        let connection = ProductConnection::from(data.products);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Catalog(connection.clone()))
            .await;

        Ok(connection)
    }

    /// Get a product by handle, resolving the variant for `selected_options`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::NotFound`] if no product has this handle, or an
    /// error if the API request fails.
    #[instrument(skip(self, selected_options), fields(handle = %handle, locale = %locale))]
    pub async fn get_product(
        &self,
        locale: &Locale,
        handle: &str,
        selected_options: &[SelectedOption],
    ) -> Result<Product, ShopifyError> {
        let options_key = selected_options
            .iter()
            .map(|o| format!("{}={}", o.name, o.value))
            .collect::<Vec<_>>()
            .join("&");
        let cache_key = format!("product:{locale}:{handle}:{options_key}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let variables = product::Variables {
            country: schema_enum(locale.country()),
            language: schema_enum(locale.language()),
            handle: handle.to_string(),
            selected_options: selected_options
                .iter()
                .map(|o| product::SelectedOptionInput {
                    name: o.name.clone(),
                    value: o.value.clone(),
                })
                .collect(),
        };
        let data = self.execute::<ProductQuery>(variables).await?;

        let product = data
            .product
            .map(Product::from)
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {handle}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Get an existing cart.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::NotFound`] if the cart no longer exists, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, locale: &Locale, cart_id: &CartGid) -> Result<Cart, ShopifyError> {
        let variables = cart::Variables {
            country: schema_enum(locale.country()),
            language: schema_enum(locale.language()),
            cart_id: cart_id.to_string(),
        };

        let data = self.execute::<CartQuery>(variables).await?;

        data.cart
            .map(Cart::from)
            .ok_or_else(|| ShopifyError::NotFound(format!("Cart not found: {cart_id}")))
    }

    /// Create a new cart holding `lines`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart creation fails or user errors are returned.
    #[instrument(skip(self, lines), fields(locale = %locale))]
    pub async fn create_cart(
        &self,
        locale: &Locale,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, ShopifyError> {
        let variables = cart_create::Variables {
            country: schema_enum(locale.country()),
            language: schema_enum(locale.language()),
            input: cart_create::CartInput {
                lines: Some(
                    lines
                        .into_iter()
                        .map(|line| cart_create::CartLineInput {
                            merchandise_id: line.merchandise_id.into_inner(),
                            quantity: Some(line.quantity),
                        })
                        .collect(),
                ),
                buyer_identity: Some(cart_create::CartBuyerIdentityInput {
                    country_code: schema_enum(locale.country()),
                }),
            },
        };

        let data = self.execute::<CartCreate>(variables).await?;
        cart_from_payload(data.cart_create.map(|p| (p.cart, p.user_errors)), "create cart")
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn add_lines(
        &self,
        locale: &Locale,
        cart_id: &CartGid,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, ShopifyError> {
        let variables = cart_lines_add::Variables {
            country: schema_enum(locale.country()),
            language: schema_enum(locale.language()),
            cart_id: cart_id.to_string(),
            lines: lines
                .into_iter()
                .map(|line| cart_lines_add::CartLineInput {
                    merchandise_id: line.merchandise_id.into_inner(),
                    quantity: Some(line.quantity),
                })
                .collect(),
        };

        let data = self.execute::<CartLinesAdd>(variables).await?;
        cart_from_payload(data.cart_lines_add.map(|p| (p.cart, p.user_errors)), "add to cart")
    }

    /// Change line quantities.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn update_lines(
        &self,
        locale: &Locale,
        cart_id: &CartGid,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, ShopifyError> {
        let variables = cart_lines_update::Variables {
            country: schema_enum(locale.country()),
            language: schema_enum(locale.language()),
            cart_id: cart_id.to_string(),
            lines: lines
                .into_iter()
                .map(|line| cart_lines_update::CartLineUpdateInput {
                    id: line.id.into_inner(),
                    quantity: Some(line.quantity),
                })
                .collect(),
        };

        let data = self.execute::<CartLinesUpdate>(variables).await?;
        cart_from_payload(data.cart_lines_update.map(|p| (p.cart, p.user_errors)), "update cart")
    }

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id))]
    pub async fn remove_lines(
        &self,
        locale: &Locale,
        cart_id: &CartGid,
        line_ids: Vec<CartLineGid>,
    ) -> Result<Cart, ShopifyError> {
        let variables = cart_lines_remove::Variables {
            country: schema_enum(locale.country()),
            language: schema_enum(locale.language()),
            cart_id: cart_id.to_string(),
            line_ids: line_ids.into_iter().map(CartLineGid::into_inner).collect(),
        };

        let data = self.execute::<CartLinesRemove>(variables).await?;
        cart_from_payload(data.cart_lines_remove.map(|p| (p.cart, p.user_errors)), "remove from cart")
    }

    /// Replace the cart's discount codes.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, discount_codes), fields(cart_id = %cart_id))]
    pub async fn update_discount_codes(
        &self,
        locale: &Locale,
        cart_id: &CartGid,
        discount_codes: Vec<String>,
    ) -> Result<Cart, ShopifyError> {
        let variables = cart_discount_codes_update::Variables {
            country: schema_enum(locale.country()),
            language: schema_enum(locale.language()),
            cart_id: cart_id.to_string(),
            discount_codes: Some(discount_codes),
        };

        let data = self.execute::<CartDiscountCodesUpdate>(variables).await?;
        cart_from_payload(data.cart_discount_codes_update.map(|p| (p.cart, p.user_errors)), "update discount codes")
    }

    /// Apply gift card codes to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, gift_card_codes), fields(cart_id = %cart_id))]
    pub async fn update_gift_card_codes(
        &self,
        locale: &Locale,
        cart_id: &CartGid,
        gift_card_codes: Vec<String>,
    ) -> Result<Cart, ShopifyError> {
        let variables = cart_gift_card_codes_update::Variables {
            country: schema_enum(locale.country()),
            language: schema_enum(locale.language()),
            cart_id: cart_id.to_string(),
            gift_card_codes,
        };

        let data = self.execute::<CartGiftCardCodesUpdate>(variables).await?;
        cart_from_payload(data.cart_gift_card_codes_update.map(|p| (p.cart, p.user_errors)), "apply gift card")
    }

    /// Remove applied gift cards by their applied-gift-card IDs.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, applied_gift_card_ids), fields(cart_id = %cart_id))]
    pub async fn remove_gift_cards(
        &self,
        locale: &Locale,
        cart_id: &CartGid,
        applied_gift_card_ids: Vec<AppliedGiftCardGid>,
    ) -> Result<Cart, ShopifyError> {
        let variables = cart_gift_card_codes_remove::Variables {
            country: schema_enum(locale.country()),
            language: schema_enum(locale.language()),
            cart_id: cart_id.to_string(),
            applied_gift_card_ids: applied_gift_card_ids
                .into_iter()
                .map(AppliedGiftCardGid::into_inner)
                .collect(),
        };

        let data = self.execute::<CartGiftCardCodesRemove>(variables).await?;
        cart_from_payload(data.cart_gift_card_codes_remove.map(|p| (p.cart, p.user_errors)), "remove gift card")
    }
}

/// Unwrap a cart mutation payload (`cart`, `userErrors`), surfacing user
/// errors first.
fn cart_from_payload<C, E>(
    payload: Option<(Option<C>, Vec<E>)>,
    action: &str,
) -> Result<Cart, ShopifyError>
where
    C: Into<Cart>,
    E: Into<CartUserError>,
{
    let Some((cart, user_errors)) = payload else {
        return Err(ShopifyError::graphql(format!("Failed to {action}")));
    };

    if !user_errors.is_empty() {
        return Err(ShopifyError::UserError(join_user_errors(
            user_errors.into_iter().map(Into::into).collect(),
        )));
    }

    cart.map(Into::into)
        .ok_or_else(|| ShopifyError::graphql(format!("Failed to {action}")))
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
